use std::{env::var, fmt};

use anyhow::{Context, Result};

pub const TWITTER_API_BASE_URL: &str = "https://api.twitter.com";
pub const TWITTER_STREAM_BASE_URL: &str = "https://stream.twitter.com";

/// The four OAuth 1.0a secrets of a user-context app.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    /// Load the secrets from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            consumer_key: var("TWITTER_CONSUMER_KEY").with_context(|| "TWITTER_CONSUMER_KEY")?,
            consumer_secret: var("TWITTER_CONSUMER_SECRET")
                .with_context(|| "TWITTER_CONSUMER_SECRET")?,
            access_token: var("TWITTER_ACCESS_TOKEN").with_context(|| "TWITTER_ACCESS_TOKEN")?,
            access_token_secret: var("TWITTER_ACCESS_TOKEN_SECRET")
                .with_context(|| "TWITTER_ACCESS_TOKEN_SECRET")?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Endpoints the clients talk to.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub api_url: String,
    pub stream_url: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_url: TWITTER_API_BASE_URL.to_string(),
            stream_url: TWITTER_STREAM_BASE_URL.to_string(),
        }
    }
}

impl TwitterConfig {
    /// Defaults, overridden by `TWITTER_API_URL` / `TWITTER_STREAM_URL` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: var("TWITTER_API_URL").unwrap_or(defaults.api_url),
            stream_url: var("TWITTER_STREAM_URL").unwrap_or(defaults.stream_url),
        }
    }

    pub(crate) fn api_endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_url.trim_end_matches('/'))
    }

    pub(crate) fn stream_endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.stream_url.trim_end_matches('/'))
    }
}
