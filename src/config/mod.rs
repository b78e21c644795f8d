use crate::media::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TOKEN_ENV: &str = "TWITTER_API_KEY";
const NUMBERED_TOKEN_ENVS: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TwitterConfig {
    pub bearer_tokens: Vec<String>,
    pub api_base_url: String,
    pub max_retries: u32,
    pub base_backoff_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            bearer_tokens: Vec::new(),
            api_base_url: crate::media::API_BASE_URL.to_string(),
            max_retries: policy.max_retries,
            base_backoff_seconds: policy.base_backoff.as_secs(),
            request_timeout_seconds: 30,
        }
    }
}

impl TwitterConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_backoff: Duration::from_secs(self.base_backoff_seconds),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// File tokens first, then `TWITTER_API_KEY` and `TWITTER_API_KEY_1..5`.
    /// Blank values and repeats are dropped.
    pub fn bearer_tokens<F>(&self, env: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = std::iter::once(TOKEN_ENV.to_string())
            .chain((1..=NUMBERED_TOKEN_ENVS).map(|i| format!("{TOKEN_ENV}_{i}")))
            .filter_map(|name| env(&name));

        let mut tokens: Vec<String> = Vec::new();
        for token in self.bearer_tokens.iter().cloned().chain(from_env) {
            let token = token.trim().to_string();
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        tokens
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub twitter: TwitterConfig,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path))
    }

    pub fn get_logging_format(&self) -> &str {
        &self.logging.format
    }
}
