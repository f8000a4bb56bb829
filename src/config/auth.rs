//! Token authentication configuration.

use std::env;
use tracing::warn;

/// Configuration for access/refresh token handling
///
/// An empty secret disables token authentication; every token strategy
/// then resolves to the anonymous user.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl_seconds: 60 * 60,           // 1 hour
            refresh_token_ttl_seconds: 7 * 24 * 60 * 60, // 7 days
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("JWT_SECRET is not set, token authentication is disabled");
                defaults.jwt_secret
            }
        };

        let access_token_ttl_seconds = env::var("JWT_ACCESS_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.access_token_ttl_seconds);

        let refresh_token_ttl_seconds = env::var("JWT_REFRESH_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.refresh_token_ttl_seconds);

        Self {
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_auth_config_defaults_without_secret() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::remove_var("JWT_SECRET");
            env::remove_var("JWT_ACCESS_TTL_SECONDS");
            env::remove_var("JWT_REFRESH_TTL_SECONDS");
        }

        let config = AuthConfig::from_env();
        assert!(config.jwt_secret.is_empty());
        assert_eq!(config.access_token_ttl_seconds, 3600);
        assert_eq!(config.refresh_token_ttl_seconds, 604800);
    }

    #[test]
    fn test_auth_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("JWT_SECRET", "s3cret");
            env::set_var("JWT_ACCESS_TTL_SECONDS", "60");
            env::set_var("JWT_REFRESH_TTL_SECONDS", "not-a-number");
        }

        let config = AuthConfig::from_env();
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.access_token_ttl_seconds, 60);
        assert_eq!(config.refresh_token_ttl_seconds, 604800);

        unsafe {
            env::remove_var("JWT_SECRET");
            env::remove_var("JWT_ACCESS_TTL_SECONDS");
            env::remove_var("JWT_REFRESH_TTL_SECONDS");
        }
    }
}
