//! Configuration for the outbound lookup HTTP client
//!
//! Defaults describe a single-shot call bounded by a five second timeout.
//! Retries are opt-in through the environment.

use crate::services::lookup_client::LookupClientConfig;
use std::env;

impl LookupClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout_seconds = env::var("LOOKUP_CLIENT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_seconds);

        let connect_timeout_seconds = env::var("LOOKUP_CLIENT_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.connect_timeout_seconds);

        let max_retries = env::var("LOOKUP_CLIENT_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_retries);

        let initial_delay_ms = env::var("LOOKUP_CLIENT_RETRY_INITIAL_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.initial_delay_ms);

        let max_delay_ms = env::var("LOOKUP_CLIENT_RETRY_MAX_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_delay_ms);

        // Comma-separated status codes, e.g. "502,503"
        let retry_on_status = env::var("LOOKUP_CLIENT_RETRY_ON_STATUS")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|s| s.trim().parse::<u16>().ok())
                    .collect()
            })
            .unwrap_or(defaults.retry_on_status);

        Self {
            timeout_seconds,
            connect_timeout_seconds,
            max_retries,
            initial_delay_ms,
            max_delay_ms,
            retry_on_status,
        }
    }
}
