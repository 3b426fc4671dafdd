//! Subscriber setup for applications that do not install their own
//!
//! The client only emits `tracing` events; this module is a convenience for
//! scripts and tools. `RUST_LOG` takes precedence over the configured filter.

use crate::config::ConfigError;
use crate::error::AtlasResult;
use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"atlas_client=debug"`
    pub filter: String,
    /// JSON lines instead of plain text
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "atlas_client=info".to_string(),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    pub fn development() -> Self {
        Self {
            filter: "atlas_client=debug".to_string(),
            json_format: false,
        }
    }

    pub fn production() -> Self {
        Self {
            filter: "atlas_client=info".to_string(),
            json_format: true,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

/// Install a global subscriber writing to stdout.
///
/// Fails when the filter does not parse or a subscriber is already set.
pub fn init_logging(config: LoggingConfig) -> AtlasResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|err| ConfigError::InvalidValue {
            field: "filter".to_string(),
            value: config.filter.clone(),
            expected: format!("a tracing filter directive ({})", err),
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_format {
        registry
            .with(Layer::new().with_writer(io::stdout).json())
            .try_init()
    } else {
        registry.with(Layer::new().with_writer(io::stdout)).try_init()
    };
    installed.map_err(|err| ConfigError::invalid(format!("Could not install subscriber: {}", err)))?;

    tracing::debug!(
        "Logging initialized (filter: {}, format: {})",
        config.filter,
        if config.json_format { "JSON" } else { "text" }
    );
    Ok(())
}
