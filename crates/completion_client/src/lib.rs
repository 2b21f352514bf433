// crates/completion_client/src/lib.rs

//! Client for an OpenAI-style text-completion endpoint.
//!
//! The driver only depends on the [`Completer`] trait; [`OpenAiCompleter`]
//! is the production implementation, tests substitute their own.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-davinci-003";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Turns a prompt into completion text.
pub trait Completer {
    /// Returns the text of the first candidate, untrimmed.
    fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Every failure of the completion service. Callers treat all variants the
/// same way: the run stops and nothing is written.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion service responded with status {0}")]
    Status(u16),

    #[error("Completion response contained no choices")]
    NoChoices,
}

/// Fixed request parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionSettings {
    /// Base URL without the `/completions` suffix.
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl CompletionSettings {
    pub fn completions_url(&self) -> String {
        format!("{}/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    n: u32,
    max_tokens: u32,
    prompt: &'a str,
}

impl<'a> CompletionRequest<'a> {
    // Deterministic sampling, a single candidate.
    fn new(settings: &'a CompletionSettings, prompt: &'a str) -> Self {
        Self {
            model: &settings.model,
            temperature: 0.0,
            n: 1,
            max_tokens: settings.max_tokens,
            prompt,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

/// [`Completer`] that talks to `POST {base_url}/completions` with a bearer token.
pub struct OpenAiCompleter {
    client: Client,
    token: String,
    settings: CompletionSettings,
}

impl OpenAiCompleter {
    pub fn new(token: impl Into<String>, settings: CompletionSettings) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            token: token.into(),
            settings,
        })
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }
}

impl Completer for OpenAiCompleter {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = self.settings.completions_url();
        log::debug!("POST {} (model {})", url, self.settings.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&CompletionRequest::new(&self.settings, prompt))
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            log::debug!("completion service answered {}", status);
            return Err(CompletionError::Status(status.as_u16()));
        }

        let body: CompletionResponse = response.json()?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(CompletionError::NoChoices)
    }
}
