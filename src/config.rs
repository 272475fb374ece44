//! Configuration for the analysis pipeline.
//!
//! Configuration can be set via environment variables:
//! - `SCORER_URL` - Required. Endpoint of the external scoring service
//!   (the full URL the task batch is POSTed to).
//! - `SCORER_TIMEOUT_SECS` - Optional. Round-trip timeout for one scoring
//!   request. Defaults to `30`.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scoring service endpoint URL
    pub scorer_url: String,

    /// Timeout for one scoring round trip
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `SCORER_URL` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let scorer_url = std::env::var("SCORER_URL")
            .map_err(|_| ConfigError::MissingEnvVar("SCORER_URL".to_string()))?;

        let timeout_secs: u64 = std::env::var("SCORER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("SCORER_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            scorer_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build a configuration directly, for callers that don't use env vars.
    pub fn new(scorer_url: impl Into<String>) -> Self {
        Self {
            scorer_url: scorer_url.into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}
