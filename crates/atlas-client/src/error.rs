//! Error types for the Atlas client
//!
//! Client-side validation, polling outcomes and transport failures all
//! surface as [`AtlasError`].

use crate::config::ConfigError;
use crate::model::QueryableModel;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Atlas client errors
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Bad request: {method} {url} - {message}")]
    BadRequest {
        url: String,
        method: String,
        message: String,
    },

    #[error("Not found: {method} {url} - {message}")]
    NotFound {
        url: String,
        method: String,
        message: String,
    },

    #[error("Conflict: {method} {url} - {message}")]
    Conflict {
        url: String,
        method: String,
        message: String,
    },

    #[error("Server error ({status}): {method} {url} - {message}")]
    ServerError {
        url: String,
        method: String,
        status: u16,
        message: String,
    },

    #[error("Request timed out: {method} {url}")]
    RequestTimeout { url: String, method: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Client error: {message}")]
    Client { message: String },

    #[error("{type_name} has no field or relationship named '{field}'")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    #[error("Long-running task failed: {type_name} {}", .identifier.as_deref().unwrap_or("(unknown)"))]
    Failed {
        type_name: &'static str,
        identifier: Option<String>,
        model: Option<Box<QueryableModel>>,
    },

    #[error("Timed out after {}s: {message}", .timeout.as_secs())]
    Timeout { timeout: Duration, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AtlasError {
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    pub fn bad_request(
        url: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::BadRequest {
            url: url.into(),
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Builds a polling failure carrying the model that entered the failed state.
    pub fn failed(model: &QueryableModel) -> Self {
        Self::Failed {
            type_name: model.type_name(),
            identifier: model.cached_identifier(),
            model: Some(Box::new(model.clone())),
        }
    }

    /// The model carried by a polling failure, if any.
    pub fn failed_model(&self) -> Option<&QueryableModel> {
        match self {
            Self::Failed { model, .. } => model.as_deref(),
            _ => None,
        }
    }

    /// Whether the error came back from the server rather than from the client.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. }
                | Self::NotFound { .. }
                | Self::Conflict { .. }
                | Self::ServerError { .. }
                | Self::RequestTimeout { .. }
                | Self::Network { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for AtlasError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|url| url.to_string()).unwrap_or_default();
        if err.is_timeout() {
            return Self::RequestTimeout {
                url,
                method: String::new(),
            };
        }
        Self::network(err.to_string())
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
