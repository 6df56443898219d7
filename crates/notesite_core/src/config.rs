//! Data API connection settings.
//!
//! # Responsibility
//! - Hold the base URL, bearer credential and request timeout used by
//!   [`crate::api::client::ApiClient`].
//! - Read those settings from the process environment.
//!
//! # Invariants
//! - `base_url` is an absolute `http`/`https` URL without a trailing slash.
//! - `bearer_token` is never empty and never appears in `Debug` output.

use reqwest::Url;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::time::Duration;

/// Environment variable holding the data API base URL.
pub const ENV_BASE_URL: &str = "WORKER_HOST";
/// Environment variable holding the static bearer credential.
pub const ENV_BEARER_TOKEN: &str = "API_BEARER_TOKEN";
/// Optional environment variable overriding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "API_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration error for missing or malformed settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is unset or blank.
    Missing(&'static str),
    /// Setting is present but unusable.
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
            Self::Invalid { key, message } => write!(f, "invalid setting `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Immutable connection settings for the data API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    bearer_token: String,
    timeout: Duration,
}

impl ApiConfig {
    /// Builds a validated config with the default timeout.
    ///
    /// # Errors
    /// - `base_url` is not an absolute `http`/`https` URL.
    /// - `bearer_token` is blank.
    pub fn new(base_url: &str, bearer_token: &str) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url)?;
        let bearer_token = bearer_token.trim();
        if bearer_token.is_empty() {
            return Err(ConfigError::Missing(ENV_BEARER_TOKEN));
        }
        Ok(Self {
            base_url,
            bearer_token: bearer_token.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Reads `WORKER_HOST`, `API_BEARER_TOKEN` and `API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] but over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        let bearer_token = lookup(ENV_BEARER_TOKEN)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_BEARER_TOKEN))?;
        let mut config = Self::new(&base_url, &bearer_token)?;

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: ENV_TIMEOUT_SECS,
                    message: format!("expected a positive integer, got `{raw}`"),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Debug for ApiConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn normalize_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Missing(ENV_BASE_URL));
    }
    let parsed = Url::parse(trimmed).map_err(|err| ConfigError::Invalid {
        key: ENV_BASE_URL,
        message: format!("`{trimmed}` is not a valid URL: {err}"),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: ENV_BASE_URL,
            message: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}
