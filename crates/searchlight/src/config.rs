//! Client Configuration
//!
//! Holds the connection settings for a remote search engine: host URL,
//! API key, and timeout/polling defaults. The configuration is immutable
//! once a [`crate::Client`] has been built from it.

use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the engine host URL.
pub const ENV_HOST: &str = "SEARCHLIGHT_HOST";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "SEARCHLIGHT_API_KEY";

/// Default timeout applied to every HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default interval between task status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default deadline for waiting on a task to reach a terminal status.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a search engine connection
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the engine, e.g. `http://127.0.0.1:7700`
    pub host_url: String,
    /// API key sent as a bearer token (optional for unsecured instances)
    pub api_key: Option<String>,
    /// Timeout for each outbound HTTP request
    pub timeout: Duration,
    /// Interval between polls in [`crate::Client::wait_for_task`]
    pub poll_interval: Duration,
    /// Deadline for [`crate::Client::wait_for_task`]
    pub poll_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the given host URL with defaults.
    pub fn new(host_url: impl Into<String>) -> Self {
        Self {
            host_url: host_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Reads the configuration from `SEARCHLIGHT_HOST` / `SEARCHLIGHT_API_KEY`.
    ///
    /// A missing host is a startup-time configuration error; a missing or
    /// empty API key simply leaves the connection unauthenticated.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var(ENV_HOST)
            .map_err(|_| Error::Configuration(format!("{ENV_HOST} is not set")))?;

        let mut config = Self::new(host);
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        Ok(config)
    }

    /// Sets the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the task polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the task polling deadline
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Validates the host URL and returns it normalized (no trailing slash).
    pub(crate) fn normalized_host(&self) -> Result<String> {
        let trimmed = self.host_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::Configuration("host URL must not be empty".to_string()));
        }

        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));
        match rest {
            Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
            Some(_) => Err(Error::Configuration(format!(
                "host URL is missing a host: {trimmed}"
            ))),
            None => Err(Error::Configuration(format!(
                "host URL must start with http:// or https://: {trimmed}"
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
