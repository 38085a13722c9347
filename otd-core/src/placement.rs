//! Putting rendered blocks into a note.

/// Replaces the first `placeholder` in `document` with `block`. Without a placeholder the
/// block is appended after a blank line. Existing text is always kept.
pub fn place_block(document: &str, placeholder: &str, block: &str) -> String {
    if !placeholder.is_empty() && document.contains(placeholder) {
        return document.replacen(placeholder, block, 1);
    }
    let mut out = document.to_string();
    if !out.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        if !out.ends_with("\n\n") {
            out.push('\n');
        }
    }
    out.push_str(block);
    if !block.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Appends `placeholder` on its own line.
pub fn insert_placeholder(document: &str, placeholder: &str) -> String {
    let mut out = document.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(placeholder);
    out.push('\n');
    out
}
