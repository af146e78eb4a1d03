//! Client configuration
//!
//! The backend base URL and HTTP timeout can be overridden through the
//! `DAY0_API_BASE_URL` and `DAY0_HTTP_TIMEOUT_SECS` environment variables
//! (a `.env` file is honored when present).

use crate::error::{AppError, Result};
use std::time::Duration;
use url::Url;

/// Default backend base URL for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL
    pub base_url: Url,

    /// Per-request timeout. The FX alert stream is exempt since it is a
    /// long-lived connection.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = match std::env::var("DAY0_API_BASE_URL") {
            Ok(raw) => Url::parse(&raw)
                .map_err(|e| AppError::Config(format!("invalid DAY0_API_BASE_URL: {}", e)))?,
            Err(_) => Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        };

        let timeout = match std::env::var("DAY0_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    AppError::Config(format!("invalid DAY0_HTTP_TIMEOUT_SECS: {}", raw))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
