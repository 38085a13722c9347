use super::{finish, summarizer};
use crate::{indicator::WithIndicator, note::Note, render::Renderer};
use anyhow::Result;
use otd_core::Otd;
use std::path::Path;

pub async fn diet_mode(
    otd: &Otd,
    renderer: &Renderer,
    api_key: Option<&str>,
    file: &Path,
    dry_run: bool,
) -> Result<()> {
    let note = Note::read(file)?;
    let summarizer = summarizer(otd, api_key)?;
    let summarizer = WithIndicator::new(&summarizer, "Estimating nutrition...");
    let outcome = otd.diet_estimate(&note.text, &summarizer).await?;

    finish(
        otd,
        renderer,
        &note,
        outcome,
        dry_run,
        "Diet estimates inserted.",
    )
}
