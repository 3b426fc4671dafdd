#![allow(dead_code)]

use async_trait::async_trait;
use atlas_client::{
    ApiVersion, AtlasClient, AtlasError, AtlasResult, ClientConfig, EventBus, Method, Transport,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const BASE: &str = "http://atlas.test:21000";
pub const API: &str = "http://atlas.test:21000/api/atlas/v2";

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Replays scripted replies per (method, url). The last reply for a key
/// repeats; unscripted requests get a 404. Every request yields once before
/// replying so concurrent callers interleave.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: Method, url: impl Into<String>, body: Value) -> &Self {
        self.push(method, url.into(), Reply::Json(body))
    }

    pub fn fail(&self, method: Method, url: impl Into<String>, status: u16) -> &Self {
        self.push(method, url.into(), Reply::Status(status))
    }

    fn push(&self, method: Method, url: String, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method, url))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method && call.url == url)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        params: &[(String, String)],
        data: Option<&Value>,
    ) -> AtlasResult<Value> {
        self.calls.lock().unwrap().push(Call {
            method,
            url: url.to_string(),
            params: params.to_vec(),
            body: data.cloned(),
        });

        tokio::task::yield_now().await;

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(&(method, url.to_string())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(status_error(status, method, url)),
            None => Err(status_error(404, method, url)),
        }
    }
}

fn status_error(status: u16, method: Method, url: &str) -> AtlasError {
    let url = url.to_string();
    let method = method.to_string();
    let message = "scripted failure".to_string();
    match status {
        400 => AtlasError::BadRequest {
            url,
            method,
            message,
        },
        404 => AtlasError::NotFound {
            url,
            method,
            message,
        },
        409 => AtlasError::Conflict {
            url,
            method,
            message,
        },
        status => AtlasError::ServerError {
            url,
            method,
            status,
            message,
        },
    }
}

/// Client over `transport` with its own event bus
pub fn client(transport: Arc<MockTransport>) -> AtlasClient {
    client_with_bus(transport, Arc::new(EventBus::new()))
}

pub fn client_with_bus(transport: Arc<MockTransport>, bus: Arc<EventBus>) -> AtlasClient {
    AtlasClient::with_transport(ClientConfig::new(BASE), transport)
        .unwrap()
        .with_event_bus(bus)
}

pub fn client_at_version(transport: Arc<MockTransport>, version: &str) -> AtlasClient {
    let version: ApiVersion = version.parse().unwrap();
    AtlasClient::with_transport(ClientConfig::new(BASE).with_version(version), transport)
        .unwrap()
        .with_event_bus(Arc::new(EventBus::new()))
}
