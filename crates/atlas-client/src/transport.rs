//! HTTP transport seam
//!
//! Models and collections never talk to reqwest directly; they go through
//! [`Transport`] so tests can script server replies.

use crate::config::{ClientConfig, ConfigError};
use crate::error::{AtlasError, AtlasResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, error};

/// HTTP verbs used against the Atlas REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Ordered query parameters. Keys may repeat.
pub type QueryParams = Vec<(String, String)>;

/// Sends one request and returns the decoded JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        url: &str,
        params: &[(String, String)],
        data: Option<&Value>,
    ) -> AtlasResult<Value>;

    async fn get(&self, url: &str, params: &[(String, String)]) -> AtlasResult<Value> {
        self.request(Method::Get, url, params, None).await
    }

    async fn post(&self, url: &str, data: &Value) -> AtlasResult<Value> {
        self.request(Method::Post, url, &[], Some(data)).await
    }

    async fn put(&self, url: &str, data: &Value) -> AtlasResult<Value> {
        self.request(Method::Put, url, &[], Some(data)).await
    }

    async fn delete(
        &self,
        url: &str,
        params: &[(String, String)],
        data: Option<&Value>,
    ) -> AtlasResult<Value> {
        self.request(Method::Delete, url, params, data).await
    }
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> AtlasResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            AtlasError::from(ConfigError::invalid(format!(
                "Failed to create HTTP client: {}",
                e
            )))
        })?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client, e.g. one carrying auth headers.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        params: &[(String, String)],
        data: Option<&Value>,
    ) -> AtlasResult<Value> {
        debug!("{} {} params={:?}", method, url, params);

        let mut request = self.client.request(method.into(), url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = data {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AtlasError::RequestTimeout {
                    url: url.to_string(),
                    method: method.to_string(),
                }
            } else {
                AtlasError::from(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("{} {} failed with {}", method, url, status);
            return Err(status_error(status, method, url, body));
        }

        parse_body(&body)
    }
}

/// Map a non-success status onto the error taxonomy.
pub(crate) fn status_error(status: StatusCode, method: Method, url: &str, body: String) -> AtlasError {
    let url = url.to_string();
    let method = method.to_string();
    let message = error_message(&body);

    match status {
        StatusCode::BAD_REQUEST => AtlasError::BadRequest {
            url,
            method,
            message,
        },
        StatusCode::NOT_FOUND => AtlasError::NotFound {
            url,
            method,
            message,
        },
        StatusCode::CONFLICT => AtlasError::Conflict {
            url,
            method,
            message,
        },
        status if status.is_server_error() => AtlasError::ServerError {
            url,
            method,
            status: status.as_u16(),
            message,
        },
        status => AtlasError::client(format!("HTTP {}: {} {} - {}", status, method, url, message)),
    }
}

/// Atlas reports failures as `{"errorMessage": ...}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("errorMessage")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Empty bodies (204, DELETE) decode to an empty object.
pub(crate) fn parse_body(body: &str) -> AtlasResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_str(body)?)
}
