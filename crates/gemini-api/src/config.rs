//! Configuration for the Gemini API client.

use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for the Gemini API client.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for authentication.
    pub api_key: Option<String>,
    /// Base URL for the REST API (default: <https://generativelanguage.googleapis.com>).
    pub base_url: String,
    /// Model identifier (default: `gemini-1.5-flash`).
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Minimum delay enforced between consecutive requests.
    pub min_request_interval: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: crate::GEMINI_BASE_URL.to_string(),
            model: crate::DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
            min_request_interval: Duration::from_secs(1),
            user_agent: format!("gemini-api-rust/{}", crate::VERSION),
        }
    }
}

impl Config {
    /// Create a new configuration with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Create a configuration from the `GEMINI_API_KEY` environment
    /// variable.
    ///
    /// A missing or empty variable is an error; callers treat it as
    /// fatal at startup.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(Error::MissingApiKey),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the minimum delay between requests.
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check if a credential is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.has_credentials());
        assert_eq!(config.base_url, crate::GEMINI_BASE_URL);
        assert_eq!(config.model, crate::DEFAULT_MODEL);
        assert_eq!(config.min_request_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_builder() {
        let config = Config::new("key")
            .with_model("gemini-1.5-pro")
            .with_base_url("http://localhost:9090")
            .with_timeout(Duration::from_secs(5))
            .with_min_request_interval(Duration::from_millis(250));

        assert!(config.has_credentials());
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.base_url, "http://localhost:9090");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.min_request_interval, Duration::from_millis(250));
    }
}
