use crate::Config;
use crate::source::{DocumentRef, DocumentSource};
use crate::summarize::{SummarizeError, Summarizer};
use anyhow::{Result, anyhow};
use std::path::PathBuf;
use std::sync::Mutex;

/// Test helper to create a default `Config` for testing purposes.
///
/// This is the single source of truth for test configuration.
/// If you add a field to `Config`, you only need to update it here.
pub fn mk_config(journal_dir: PathBuf) -> Config {
    Config {
        journal_dir,
        date_format: "MMMM D, YYYY".to_string(),
        placeholder: "<!OTDI>".to_string(),
        header: "On This Day".to_string(),
        rules: String::new(),
        link_to_source: true,
        diet_placeholder: "<!OTDI diet>".to_string(),
        food_header: "### Food".to_string(),
        custom_prompt: String::new(),
        model: "gpt-4".to_string(),
        api_base: "http://localhost/v1".to_string(),
        api_key: None,
    }
}

pub fn doc(title: &str) -> DocumentRef {
    DocumentRef {
        title: title.to_string(),
        path: PathBuf::from(format!("{title}.md")),
    }
}

/// Notes kept in memory, listed in the order given.
pub struct MemorySource {
    notes: Vec<(String, String)>,
}

impl MemorySource {
    pub fn new(notes: &[(&str, &str)]) -> Self {
        Self {
            notes: notes
                .iter()
                .map(|(title, body)| (title.to_string(), body.to_string()))
                .collect(),
        }
    }
}

impl DocumentSource for MemorySource {
    fn list(&self) -> Result<Vec<DocumentRef>> {
        Ok(self.notes.iter().map(|(title, _)| doc(title)).collect())
    }

    async fn read(&self, d: &DocumentRef) -> Result<String> {
        self.notes
            .iter()
            .find(|(title, _)| *title == d.title)
            .map(|(_, body)| body.clone())
            .ok_or_else(|| anyhow!("no note titled '{}'", d.title))
    }
}

/// Replies with a canned response (or fails) and remembers every prompt.
pub struct StubSummarizer {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl StubSummarizer {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Summarizer for StubSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizeError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or(SummarizeError::NoContent)
    }
}
