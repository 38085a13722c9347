use otd_core::{SummarizeError, Summarizer};
use std::io::{self, IsTerminal};

/// Shows `message` on stderr while the wrapped summarizer works, and clears it before
/// the reply (or the failure) is handed back.
pub struct WithIndicator<'a, S> {
    inner: &'a S,
    message: &'static str,
}

impl<'a, S> WithIndicator<'a, S> {
    pub fn new(inner: &'a S, message: &'static str) -> Self {
        Self { inner, message }
    }
}

impl<S: Summarizer + Sync> Summarizer for WithIndicator<'_, S> {
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizeError> {
        let visible = io::stderr().is_terminal();
        if visible {
            eprint!("{}", self.message);
        }
        let result = self.inner.summarize(prompt).await;
        if visible {
            eprint!("\r{}\r", " ".repeat(self.message.len()));
        }
        result
    }
}
