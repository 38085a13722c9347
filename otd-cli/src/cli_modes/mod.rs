mod diet_mode;
mod placeholder_mode;
mod years_mode;

pub use diet_mode::diet_mode;
pub use placeholder_mode::placeholder_mode;
pub use years_mode::years_mode;

use crate::{note::Note, render::Renderer};
use anyhow::Result;
use otd_core::{OpenAiSummarizer, Otd, Outcome};

/// Builds the summarizer from the config, with `api_key` (flag or env) taking precedence.
fn summarizer(otd: &Otd, api_key: Option<&str>) -> Result<OpenAiSummarizer> {
    let key = api_key
        .or(otd.config.api_key.as_deref())
        .unwrap_or_default();
    Ok(OpenAiSummarizer::new(
        &otd.config.api_base,
        key,
        &otd.config.model,
    )?)
}

/// Writes (or, on a dry run, prints) an updated note, or explains why there was nothing
/// to write.
fn finish(
    otd: &Otd,
    renderer: &Renderer,
    note: &Note,
    outcome: Outcome,
    dry_run: bool,
    done_message: &str,
) -> Result<()> {
    match outcome {
        Outcome::Updated {
            document,
            block,
            skipped,
        } => {
            renderer.print_skipped(&skipped);
            if dry_run {
                renderer.print_block(&block);
            } else {
                note.write(&document)?;
                renderer.print_info(done_message);
            }
        }
        Outcome::InvalidTitle => renderer.print_info(&format!(
            "This command must be run from a note titled with a date in the format {}.",
            otd.config.date_format
        )),
        Outcome::NoMatches { skipped } => {
            renderer.print_skipped(&skipped);
            renderer.print_info("No matching daily notes found for that date.");
        }
        Outcome::SectionNotFound => renderer.print_info(&format!(
            "No '{}' section found in {}.",
            otd.config.food_header,
            note.path.display()
        )),
        Outcome::EmptySection => renderer.print_info(&format!(
            "Nothing is logged under '{}'.",
            otd.config.food_header
        )),
    }
    Ok(())
}
