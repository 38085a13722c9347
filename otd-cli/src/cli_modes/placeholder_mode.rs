use crate::{note::Note, render::Renderer};
use anyhow::Result;
use otd_core::Otd;
use std::path::Path;

pub fn placeholder_mode(otd: &Otd, renderer: &Renderer, file: &Path, diet: bool) -> Result<()> {
    let note = Note::read(file)?;
    note.write(&otd.add_placeholder(&note.text, diet))?;
    renderer.print_info(&format!("Added placeholder to {}", note.path.display()));
    Ok(())
}
