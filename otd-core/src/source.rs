//! Where daily notes come from.

use anyhow::{Context, Result, bail};
use std::{
    ffi::OsStr,
    fs,
    future::Future,
    path::{Path, PathBuf},
};

/// A note that can be read later: its title (file stem) and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub title: String,
    pub path: PathBuf,
}

/// Lists notes in discovery order and reads them on demand.
///
/// Reads are independent of each other; one failing must not affect the rest.
pub trait DocumentSource {
    fn list(&self) -> Result<Vec<DocumentRef>>;

    fn read(&self, doc: &DocumentRef) -> impl Future<Output = Result<String>> + Send;
}

/// Markdown notes found (recursively) under a folder.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for DirectorySource {
    /// Paths are sorted so the same folder always yields the same order.
    fn list(&self) -> Result<Vec<DocumentRef>> {
        if !self.root.is_dir() {
            bail!("Daily notes folder not found: {}", self.root.display());
        }
        let mut paths = Vec::new();
        collect_markdown_files(&self.root, &mut paths)
            .with_context(|| format!("scanning {}", self.root.display()))?;
        paths.sort();

        Ok(paths
            .into_iter()
            .filter_map(|path| {
                let title = path.file_stem()?.to_string_lossy().into_owned();
                Some(DocumentRef { title, path })
            })
            .collect())
    }

    async fn read(&self, doc: &DocumentRef) -> Result<String> {
        tokio::fs::read_to_string(&doc.path)
            .await
            .with_context(|| format!("reading {}", doc.path.display()))
    }
}

/// Collects every `.md` file under `dir`. Symlinked folders are not entered, so a link
/// back up the tree cannot loop.
fn collect_markdown_files(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        let kind = entry.file_type()?;
        let path = entry.path();

        if kind.is_dir() {
            collect_markdown_files(&path, found)?;
        } else if kind.is_symlink() {
            if path.is_file() && is_markdown(&path) {
                found.push(path);
            }
        } else if kind.is_file() && is_markdown(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_markdown(p: &Path) -> bool {
    p.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}
