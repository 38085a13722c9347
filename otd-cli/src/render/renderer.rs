use super::theme::OneDark;
use otd_core::AggregateError;
use termimad::{
    MadSkin,
    crossterm::style::{Color, Stylize},
};

#[derive(Clone)]
pub struct RenderOptions {
    pub use_color: bool,
}

pub struct Renderer {
    skin: MadSkin,
    opts: RenderOptions,
}

impl Renderer {
    pub fn new(config: Option<RenderOptions>) -> Self {
        Self {
            skin: OneDark::default_onedark_skin(),
            opts: config.unwrap_or(RenderOptions { use_color: true }),
        }
    }

    pub fn print_md(&self, md: &str) {
        if self.opts.use_color {
            self.skin.print_text(md);
        } else {
            println!("{md}");
        }
    }

    pub fn print_info(&self, message: &str) {
        if self.opts.use_color {
            let md = format!("|-|\n| {message} |\n|-|\n");
            self.skin.print_text(&md);
        } else {
            println!("{message}");
        }
    }

    /// Shows a block exactly as it would be written into the note.
    pub fn print_block(&self, block: &str) {
        self.print_md(block.trim_end_matches('\n'));
    }

    pub fn print_skipped(&self, skipped: &[AggregateError]) {
        if skipped.is_empty() {
            return;
        }
        self.print_md("\n# Skipped notes:");
        for error in skipped {
            match error {
                AggregateError::Fetch { title, error } => {
                    let mut title = title.to_string();
                    if self.opts.use_color {
                        title = title.with(Color::Cyan).to_string();
                    }
                    println!("* Could not read '{title}': {error:#}");
                }
            }
        }
    }
}
