//! The summarization capability and its responses.
//!
//! A [`Summarizer`] turns a prompt into raw text. The text is expected to hold a flat
//! JSON object; anything else is a [`SummarizeError`], which aborts the operation.

use crate::aggregate::YearContentMap;
use crate::prompt::SYSTEM_PROMPT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("no API key configured (set `api_key` in the config or OPENAI_API_KEY)")]
    MissingApiKey,
    #[error("API call failed: {0}")]
    Request(String),
    #[error("API call failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no valid response received from the summarizer")]
    NoContent,
    #[error("failed to parse JSON from the summarizer response: {0}")]
    Malformed(String),
    #[error("the summarizer returned an empty result")]
    Empty,
    #[error("'{0}' is not a year")]
    NotAYear(String),
}

pub trait Summarizer {
    fn summarize(&self, prompt: &str) -> impl Future<Output = Result<String, SummarizeError>> + Send;
}

/// Reads a flat JSON object (optionally wrapped in a Markdown code fence) into key/value
/// text. Numbers and booleans keep their JSON spelling; nested values are rejected.
pub fn parse_key_value(raw: &str) -> Result<BTreeMap<String, String>, SummarizeError> {
    let payload = strip_code_fence(raw);
    let value: Value =
        serde_json::from_str(payload).map_err(|e| SummarizeError::Malformed(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(SummarizeError::Malformed("expected a JSON object".to_string()));
    };
    if object.is_empty() {
        return Err(SummarizeError::Empty);
    }

    object
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(SummarizeError::Malformed(format!(
                        "value for '{key}' is not text: {other}"
                    )));
                }
            };
            Ok((key, text))
        })
        .collect()
}

/// Like [`parse_key_value`], but every key has to be a year.
pub fn parse_year_summaries(raw: &str) -> Result<YearContentMap, SummarizeError> {
    parse_key_value(raw)?
        .into_iter()
        .map(|(key, summary)| match key.trim().parse::<i32>() {
            Ok(year) => Ok((year, summary)),
            Err(_) => Err(SummarizeError::NotAYear(key)),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|pairs| pairs.into_iter().collect())
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string line (```json).
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Chat-completions client for OpenAI-compatible APIs.
#[derive(Debug, Clone)]
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiSummarizer {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Result<Self, SummarizeError> {
        if api_key.trim().is_empty() {
            return Err(SummarizeError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| SummarizeError::Request(e.to_string()))?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
        })
    }
}

impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizeError> {
        let url = format!("{}/chat/completions", self.api_base);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.2,
        };
        debug!(%url, model = %self.model, "calling summarizer");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Malformed(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(SummarizeError::NoContent)
    }
}
