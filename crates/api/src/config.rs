use std::time::Duration;

use ridgeline_core::feed::{FeedSettings, HydrationFailurePolicy, DEFAULT_HYDRATION_TIMEOUT};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Hydration deadline and failure policy of the feed.
    pub feed: FeedSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `FEED_HYDRATION_TIMEOUT_MS`     | `5000`                  |
    /// | `FEED_HYDRATION_FAILURE_POLICY` | `omit`                  |
    ///
    /// See [`JwtConfig::from_env`] for the JWT variables.
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let feed = feed_settings_from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            feed,
        }
    }
}

fn feed_settings_from_env() -> FeedSettings {
    let hydration_timeout = std::env::var("FEED_HYDRATION_TIMEOUT_MS")
        .ok()
        .map(|v| {
            v.parse::<u64>()
                .expect("FEED_HYDRATION_TIMEOUT_MS must be a valid u64")
        })
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_HYDRATION_TIMEOUT);

    let hydration_failure_policy = std::env::var("FEED_HYDRATION_FAILURE_POLICY")
        .ok()
        .map(|v| {
            v.parse::<HydrationFailurePolicy>()
                .unwrap_or_else(|e| panic!("FEED_HYDRATION_FAILURE_POLICY: {e}"))
        })
        .unwrap_or_default();

    FeedSettings {
        hydration_timeout,
        hydration_failure_policy,
    }
}
