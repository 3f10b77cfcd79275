//! Run settings shared by every role call.
//!
//! Built once at startup and passed by reference into the execution service.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set; add it to your environment or a .env file")]
    MissingApiKey(&'static str),
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct RunConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Whole-request timeout for one call to the backend.
    pub timeout: Duration,
    /// Retries per stage before a turn is abandoned.
    pub max_retries: usize,
    pub retry_backoff: Duration,
    /// Upper bound on model/tool round trips within one role call.
    pub max_tool_rounds: usize,
    /// Seeds the tool RNG. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_backoff: Duration::from_millis(1000),
            max_tool_rounds: 10,
            seed: None,
        }
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;

        let mut config = Self::new(api_key.trim());

        if let Some(model) = lookup("GALACTIC_MODEL").filter(|m| !m.is_empty()) {
            config.model = model;
        }
        if let Some(url) = lookup("GALACTIC_BASE_URL").filter(|u| !u.is_empty()) {
            config.base_url = url;
        }
        if let Some(secs) = number(&lookup, "GALACTIC_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = number(&lookup, "GALACTIC_MAX_RETRIES")? {
            config.max_retries = n as usize;
        }
        if let Some(ms) = number(&lookup, "GALACTIC_RETRY_BACKOFF_MS")? {
            config.retry_backoff = Duration::from_millis(ms);
        }
        if let Some(n) = number(&lookup, "GALACTIC_MAX_TOOL_ROUNDS")? {
            config.max_tool_rounds = n as usize;
        }
        config.seed = number(&lookup, "GALACTIC_SEED")?;

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn number(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .field("seed", &self.seed)
            .finish()
    }
}
