//! Configuration for the Bazaar API service.

use bazaar_auth_core::AuthConfig;
use std::time::Duration;

/// Bazaar API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Redis URL for the session and catalog cache
    pub redis_url: String,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Request timeout
    pub request_timeout: Duration,

    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Database and cache
        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let redis_url = var("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".to_string());

        // Server port
        let http_port = var("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        // Token secrets
        let access_secret =
            var("JWT_ACCESS_SECRET").ok_or(ConfigError::Missing("JWT_ACCESS_SECRET"))?;
        let refresh_secret =
            var("JWT_REFRESH_SECRET").ok_or(ConfigError::Missing("JWT_REFRESH_SECRET"))?;

        // Runtime mode decides the cookie Secure attribute
        let production = var("APP_ENV")
            .or_else(|| var("NODE_ENV"))
            .is_some_and(|mode| mode.eq_ignore_ascii_case("production"));

        // Request timeout (default 30 seconds)
        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = var("METRICS_ENABLED")
            .unwrap_or_else(|| "true".to_string())
            .parse()
            .unwrap_or(true);

        let auth = AuthConfig::try_new(access_secret, refresh_secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_secure_cookies(production);

        Ok(Self {
            http_port,
            database_url,
            redis_url,
            auth,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
