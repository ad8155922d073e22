//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client can start against a local
//! backend with zero configuration.

use std::time::Duration;

use hoodlink_shared::constants::{
    DEFAULT_API_URL, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PREMIUM_SELECTION_ATTEMPTS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend API.
    /// Env: `HOODLINK_API_URL`
    /// Default: `http://127.0.0.1:9090`
    pub api_url: String,

    /// Timeout applied to every backend request.
    /// Env: `HOODLINK_REQUEST_TIMEOUT_SECS`
    /// Default: 15 seconds.
    pub request_timeout: Duration,

    /// How often the state is reconciled while watching.
    /// Env: `HOODLINK_POLL_INTERVAL_MS`
    /// Default: 1000 ms.
    pub poll_interval: Duration,

    /// How many times subscription processing may try to pick a premium
    /// profile before giving up (minimum 1).
    /// Env: `HOODLINK_PREMIUM_SELECTION_ATTEMPTS`
    /// Default: 3.
    pub premium_selection_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            premium_selection_attempts: DEFAULT_PREMIUM_SELECTION_ATTEMPTS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("HOODLINK_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }

        if let Some(val) = lookup("HOODLINK_REQUEST_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %val,
                    "Invalid HOODLINK_REQUEST_TIMEOUT_SECS, using default"
                ),
            }
        }

        if let Some(val) = lookup("HOODLINK_POLL_INTERVAL_MS") {
            match val.parse::<u64>() {
                Ok(ms) if ms > 0 => config.poll_interval = Duration::from_millis(ms),
                _ => tracing::warn!(
                    value = %val,
                    "Invalid HOODLINK_POLL_INTERVAL_MS, using default"
                ),
            }
        }

        if let Some(val) = lookup("HOODLINK_PREMIUM_SELECTION_ATTEMPTS") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => config.premium_selection_attempts = n,
                _ => tracing::warn!(
                    value = %val,
                    "Invalid HOODLINK_PREMIUM_SELECTION_ATTEMPTS, using default"
                ),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}
