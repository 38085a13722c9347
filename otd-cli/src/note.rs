use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// A note file: its title is the file stem.
#[derive(Debug)]
pub struct Note {
    pub path: PathBuf,
    pub title: String,
    pub text: String,
}

impl Note {
    pub fn read(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            title,
            text,
        })
    }

    /// Replaces the note's content through a temporary file in the same folder, so the
    /// note is never left half written.
    pub fn write(&self, content: &str) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut file = tempfile::Builder::new()
            .prefix(".otd")
            .suffix(".md")
            .tempfile_in(dir)
            .with_context(|| format!("creating a temporary file in {}", dir.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("writing {}", file.path().display()))?;
        file.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
