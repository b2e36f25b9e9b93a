//! Client configuration.
//!
//! Built explicitly and passed to `ApiClient::from_config`; there is no
//! process-wide client. Environment variables are read once at construction:
//!
//! - `AXABSENT_API_URL`: base URL including the `/api` prefix
//! - `AXABSENT_TIMEOUT_MS`: client-wide request timeout in milliseconds

use crate::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const ENV_API_URL: &str = "AXABSENT_API_URL";
pub const ENV_TIMEOUT_MS: &str = "AXABSENT_TIMEOUT_MS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid API URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Invalid timeout '{0}': expected a positive number of milliseconds")]
    InvalidTimeout(String),
}

/// Settings for a backend connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL including the API prefix
    pub base_url: Url,

    /// Client-wide request timeout (default: 10s)
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL) {
            config = config.with_base_url(&url)?;
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
            config = config.with_timeout_ms(&ms)?;
        }
        Ok(config)
    }

    /// Replaces the base URL. Only http(s) URLs are accepted.
    pub fn with_base_url(mut self, value: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            value: value.to_string(),
            reason,
        };
        let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        self.base_url = url;
        Ok(self)
    }

    /// Replaces the timeout from a millisecond string.
    pub fn with_timeout_ms(mut self, value: &str) -> Result<Self, ConfigError> {
        let ms: u64 = value
            .trim()
            .parse()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| ConfigError::InvalidTimeout(value.to_string()))?;
        self.timeout = Duration::from_millis(ms);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://axabsent.example.org/api"),
            (ENV_TIMEOUT_MS, "2500"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.host_str(), Some("axabsent.example.org"));
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_invalid_values() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_MS, "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".into()));

        assert!(ClientConfig::default().with_timeout_ms("0").is_err());
        assert!(ClientConfig::default().with_base_url("not a url").is_err());
        assert!(ClientConfig::default().with_base_url("ftp://host/api").is_err());
    }
}
