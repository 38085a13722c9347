//! Pulls the text under a single Markdown heading out of a note.

/// The lines found under a heading, joined and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    text: String,
}

impl ExtractedSection {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The heading exists but nothing (or only whitespace) is written under it.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

enum State {
    SearchingHeader,
    Collecting,
    Done,
}

/// Returns the text between the first line equal to `header` (both trimmed) and the
/// next heading line, i.e. the next line starting with `header`'s first character.
///
/// `None` means the heading isn't in the document, which is not the same as a heading
/// with nothing under it.
///
/// ```
/// # use otd_core::section::extract_section;
/// let note = "### Food\nate eggs\nlunch: salad\n### Exercise\nran 5k";
/// let food = extract_section(note, "### Food").unwrap();
/// assert_eq!(food.text(), "ate eggs\nlunch: salad");
/// ```
pub fn extract_section(document: &str, header: &str) -> Option<ExtractedSection> {
    let header = header.trim();
    let marker = header.chars().next()?;

    let mut state = State::SearchingHeader;
    let mut collected: Vec<&str> = Vec::new();

    for line in document.lines() {
        match state {
            State::SearchingHeader => {
                if line.trim() == header {
                    state = State::Collecting;
                }
            }
            State::Collecting => {
                if line.trim().starts_with(marker) {
                    state = State::Done;
                } else {
                    collected.push(line);
                }
            }
            State::Done => break,
        }
    }

    match state {
        State::SearchingHeader => None,
        State::Collecting | State::Done => Some(ExtractedSection {
            text: collected.join("\n").trim().to_string(),
        }),
    }
}
