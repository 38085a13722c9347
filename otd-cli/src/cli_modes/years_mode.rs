use super::{finish, summarizer};
use crate::{indicator::WithIndicator, note::Note, render::Renderer};
use anyhow::Result;
use otd_core::Otd;
use std::path::Path;

pub async fn years_mode(
    otd: &Otd,
    renderer: &Renderer,
    api_key: Option<&str>,
    file: &Path,
    dry_run: bool,
    raw: bool,
) -> Result<()> {
    let note = Note::read(file)?;

    let outcome = if raw {
        otd.through_the_years_raw(&note.title, &note.text).await?
    } else {
        let summarizer = summarizer(otd, api_key)?;
        let summarizer = WithIndicator::new(&summarizer, "Generating summaries...");
        otd.through_the_years(&note.title, &note.text, &summarizer)
            .await?
    };

    finish(
        otd,
        renderer,
        &note,
        outcome,
        dry_run,
        "On This Day summaries inserted.",
    )
}
