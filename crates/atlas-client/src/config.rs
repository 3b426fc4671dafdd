//! Client configuration
//!
//! Defaults point at a local Atlas server; `from_env` overrides them from
//! `ATLAS_*` environment variables.

use crate::version::ApiVersion;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}' (expected {expected})")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Configuration error: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Connection and polling settings for an [`AtlasClient`](crate::AtlasClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server root, e.g. `http://atlas.example.com:21000`
    pub base_url: String,
    /// Server version the client assumes when gating resources
    pub version: ApiVersion,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Default polling interval for `wait()` in seconds
    pub poll_interval_secs: u64,
    /// Default polling timeout for `wait()` in seconds
    pub poll_timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    pub fn with_polling(mut self, interval_secs: u64, timeout_secs: u64) -> Self {
        self.poll_interval_secs = interval_secs;
        self.poll_timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("ATLAS_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(version) = env::var("ATLAS_VERSION") {
            config.version = version.parse()?;
        }

        if let Ok(timeout) = env::var("ATLAS_REQUEST_TIMEOUT") {
            config.request_timeout_secs = Some(parse_seconds("request_timeout_secs", &timeout)?);
        }

        if let Ok(interval) = env::var("ATLAS_POLL_INTERVAL") {
            config.poll_interval_secs = parse_seconds("poll_interval_secs", &interval)?;
        }

        if let Ok(timeout) = env::var("ATLAS_POLL_TIMEOUT") {
            config.poll_timeout_secs = parse_seconds("poll_timeout_secs", &timeout)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|err| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            value: self.base_url.clone(),
            expected: format!("absolute URL ({err})"),
        })?;

        if self.poll_interval_secs == 0 {
            return Err(ConfigError::invalid("poll_interval_secs must be greater than zero"));
        }
        if self.poll_timeout_secs == 0 {
            return Err(ConfigError::invalid("poll_timeout_secs must be greater than zero"));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::invalid("request_timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    /// Root of the versioned REST API
    pub fn api_url(&self) -> String {
        format!("{}/api/atlas/v2", self.base_url.trim_end_matches('/'))
    }

    /// Root of the admin REST API
    pub fn admin_url(&self) -> String {
        format!("{}/api/atlas/admin", self.base_url.trim_end_matches('/'))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:21000".to_string(),
            version: ApiVersion::default(),
            request_timeout_secs: None,
            poll_interval_secs: 15,
            poll_timeout_secs: 3600,
        }
    }
}

fn parse_seconds(field: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: "whole number of seconds".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "ATLAS_BASE_URL",
        "ATLAS_VERSION",
        "ATLAS_REQUEST_TIMEOUT",
        "ATLAS_POLL_INTERVAL",
        "ATLAS_POLL_TIMEOUT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_match_polling_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(15));
        assert_eq!(config.poll_timeout(), Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn api_urls_ignore_trailing_slash() {
        let config = ClientConfig::new("http://atlas:21000/");
        assert_eq!(config.api_url(), "http://atlas:21000/api/atlas/v2");
        assert_eq!(config.admin_url(), "http://atlas:21000/api/atlas/admin");
    }

    #[test]
    fn validate_rejects_relative_base_url() {
        let error = ClientConfig::new("/api/atlas").validate();
        assert!(error.is_err());
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let config = ClientConfig::default().with_polling(0, 10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::invalid("poll_interval_secs must be greater than zero"))
        );
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://atlas:21000", "version": "1.2"}"#)
                .unwrap();
        assert_eq!(config.version, ApiVersion::new(1, 2, 0));
        assert_eq!(config.poll_interval_secs, 15);
    }

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        clear_env();
        env::set_var("ATLAS_BASE_URL", "https://catalog.internal:21443");
        env::set_var("ATLAS_VERSION", "2.3.0");
        env::set_var("ATLAS_POLL_INTERVAL", "5");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://catalog.internal:21443");
        assert_eq!(config.version, ApiVersion::new(2, 3, 0));
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.poll_timeout_secs, 3600);

        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_rejects_bad_numbers() {
        clear_env();
        env::set_var("ATLAS_POLL_TIMEOUT", "soon");

        match ClientConfig::from_env() {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "poll_timeout_secs")
            }
            other => panic!("Expected invalid value error, got {other:?}"),
        }

        clear_env();
    }
}
