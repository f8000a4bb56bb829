//! IP geolocation lookup configuration.

use std::env;

pub const DEFAULT_IP_ANALYSIS_BASE_URL: &str = "https://ip.django-vue-admin.com";

/// Configuration for the remote IP analysis service
#[derive(Clone, Debug)]
pub struct IpAnalysisConfig {
    /// When false every lookup returns the empty record without a network call
    pub enabled: bool,
    pub base_url: String,
}

impl Default for IpAnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_IP_ANALYSIS_BASE_URL.to_string(),
        }
    }
}

impl IpAnalysisConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let enabled = env::var("ENABLE_LOGIN_ANALYSIS_LOG")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let base_url = env::var("IP_ANALYSIS_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_IP_ANALYSIS_BASE_URL.to_string());

        Self { enabled, base_url }
    }
}
