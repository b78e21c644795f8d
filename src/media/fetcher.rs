use super::{
    transport::{ApiRequest, ApiResponse, HttpTransport, Sleeper},
    types::{MediaQueryResult, PostReference},
};
use crate::utils::{describe_header, parse_retry_after};
use anyhow::{bail, Result};
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const API_BASE_URL: &str = "https://api.twitter.com";
const MEDIA_EXPANSIONS: &str = "attachments.media_keys";
const MEDIA_FIELDS: &str = "media_key,type,url,preview_image_url,variants";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_retries: u32,
    /// Wait used when a 429 carries no usable `retry-after`.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_secs(15),
        }
    }
}

/// Bearer tokens handed out round-robin, one per attempt.
pub struct TokenPool {
    tokens: Vec<String>,
    next: AtomicUsize,
}

impl TokenPool {
    pub fn new(tokens: Vec<String>) -> Result<Self> {
        if tokens.is_empty() {
            bail!("Missing bearer token: set TWITTER_API_KEY or twitter.bearer_tokens");
        }
        Ok(Self {
            tokens,
            next: AtomicUsize::new(0),
        })
    }

    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    fn next_token(&self) -> &str {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.tokens.len();
        &self.tokens[index]
    }
}

/// Why a fetch produced no response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("still rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("post not found (404)")]
    NotFound,

    #[error("post is private or deleted (403)")]
    Forbidden,

    #[error("HTTP error {0}")]
    Http(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

enum AttemptOutcome {
    Success(MediaQueryResult),
    RateLimited(Duration),
    Fatal(FetchFailure),
}

pub struct MediaFetcher {
    transport: Box<dyn HttpTransport>,
    sleeper: Box<dyn Sleeper>,
    tokens: TokenPool,
    base_url: String,
    policy: RetryPolicy,
}

impl MediaFetcher {
    pub fn new(
        transport: Box<dyn HttpTransport>,
        sleeper: Box<dyn Sleeper>,
        tokens: TokenPool,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            sleeper,
            tokens,
            base_url: API_BASE_URL.to_string(),
            policy,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Requests the post with its media expansion.
    ///
    /// Only a 429 consumes retry budget: the loop waits for `retry-after` (or
    /// the base backoff) and tries again. Any other HTTP error, network error
    /// or undecodable body ends the fetch on the spot.
    pub async fn fetch(&self, post: &PostReference) -> Result<MediaQueryResult, FetchFailure> {
        let max_retries = self.policy.max_retries;

        for attempt in 1..=max_retries {
            info!("Attempt {}: Requesting media for post {}", attempt, post);

            match self.attempt(post).await {
                AttemptOutcome::Success(result) => return Ok(result),
                AttemptOutcome::RateLimited(wait) => {
                    if attempt < max_retries {
                        warn!(
                            "Rate limit reached. Retrying after {} seconds...",
                            wait.as_secs()
                        );
                        self.sleeper.sleep(wait).await;
                    } else {
                        warn!("Rate limit reached on final attempt {}", attempt);
                    }
                }
                AttemptOutcome::Fatal(failure) => {
                    error!("Fetching post {} failed: {}", post, failure);
                    return Err(failure);
                }
            }
        }

        Err(FetchFailure::RateLimited {
            attempts: max_retries,
        })
    }

    async fn attempt(&self, post: &PostReference) -> AttemptOutcome {
        let request = self.request_for(post);

        let response = match self.transport.get(&request).await {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Fatal(FetchFailure::Transport(format!("{e:#}"))),
        };

        match response.status {
            200..=399 => self.decode(&response),
            429 => AttemptOutcome::RateLimited(parse_retry_after(
                response.header("retry-after"),
                self.policy.base_backoff,
            )),
            404 => AttemptOutcome::Fatal(FetchFailure::NotFound),
            403 => AttemptOutcome::Fatal(FetchFailure::Forbidden),
            status => AttemptOutcome::Fatal(FetchFailure::Http(status)),
        }
    }

    fn request_for(&self, post: &PostReference) -> ApiRequest {
        ApiRequest {
            url: format!("{}/2/tweets/{}", self.base_url.trim_end_matches('/'), post),
            query: vec![
                ("expansions".to_string(), MEDIA_EXPANSIONS.to_string()),
                ("media.fields".to_string(), MEDIA_FIELDS.to_string()),
            ],
            headers: vec![(
                "Authorization".to_string(),
                format!("Bearer {}", self.tokens.next_token()),
            )],
        }
    }

    fn decode(&self, response: &ApiResponse) -> AttemptOutcome {
        info!(
            "Rate limit remaining: {}, resets at: {}",
            describe_header(response.header("x-rate-limit-remaining")),
            describe_header(response.header("x-rate-limit-reset"))
        );

        let result: MediaQueryResult = match serde_json::from_str(&response.body) {
            Ok(result) => result,
            Err(e) => return AttemptOutcome::Fatal(FetchFailure::Decode(e.to_string())),
        };

        for api_error in result.errors() {
            warn!(
                "API reported: {} {}",
                api_error.title.as_deref().unwrap_or("error"),
                api_error.detail.as_deref().unwrap_or_default()
            );
        }
        if let Some(data) = &result.data {
            debug!("Post {:?} text: {:?}", data.id, data.text);
        }

        AttemptOutcome::Success(result)
    }
}
