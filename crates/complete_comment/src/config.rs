// crates/complete_comment/src/config.rs

use std::env;
use std::time::Duration;

use completion_client::CompletionSettings;
use thiserror::Error;

pub const TOKEN_VAR: &str = "OPENAI_TOKEN";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const MAX_TOKENS_VAR: &str = "OPENAI_MAX_TOKENS";
pub const TIMEOUT_VAR: &str = "OPENAI_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Must set the OPENAI_TOKEN env var")]
    MissingToken,

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration, resolved once at startup and passed down.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Bearer credential for the completion service.
    pub token: String,
    pub completion: CompletionSettings,
}

impl AppConfig {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = get(TOKEN_VAR).ok_or(ConfigError::MissingToken)?;

        let mut completion = CompletionSettings::default();
        if let Some(base_url) = get(BASE_URL_VAR) {
            completion.base_url = base_url;
        }
        if let Some(model) = get(MODEL_VAR) {
            completion.model = model;
        }
        if let Some(raw) = get(MAX_TOKENS_VAR) {
            completion.max_tokens = parse_number(MAX_TOKENS_VAR, &raw)?;
        }
        if let Some(raw) = get(TIMEOUT_VAR) {
            // 0 disables the timeout.
            completion.timeout = match parse_number(TIMEOUT_VAR, &raw)? {
                0 => None,
                secs => Some(Duration::from_secs(u64::from(secs))),
            };
        }

        Ok(Self { token, completion })
    }
}

fn parse_number(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
