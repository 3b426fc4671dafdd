//! Polling for long-running server operations
//!
//! [`Pollable::wait`] refreshes a resource every `interval` until it reports
//! finished or failed, or until `timeout` runs out.

use crate::client::AtlasClient;
use crate::error::{AtlasError, AtlasResult};
use crate::events::{evented, EventBus, EventKind, EventState, Evented};
use crate::model::spec::{ModelSpec, PollSpec};
use crate::model::QueryableModel;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Status values of Atlas async requests
pub const REQUEST_POLL: PollSpec = PollSpec {
    status_field: "status",
    finished: &["COMPLETED"],
    failed: &["FAILED", "ABORTED", "TIMEDOUT"],
};

/// Server-side asynchronous request resource
pub static ASYNC_REQUEST: ModelSpec = ModelSpec::queryable("Request", "requests")
    .ancestors(&["Request", "QueryableModel", "Model"])
    .primary_key("id")
    .fields(&["id", "status", "progress", "message", "createdAt", "updatedAt"])
    .poll(REQUEST_POLL);

/// A resource whose state is polled until it settles.
#[async_trait]
pub trait Pollable: Evented + Sized {
    /// Bus receiving the wait events
    fn event_bus(&self) -> Arc<EventBus> {
        EventBus::global()
    }

    fn default_interval(&self) -> Duration {
        DEFAULT_INTERVAL
    }

    fn default_timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    fn has_failed(&self) -> bool;

    fn is_finished(&self) -> bool;

    async fn refresh(&self) -> AtlasResult<()>;

    /// Error reported once `has_failed` holds
    fn failure(&self) -> AtlasError;

    /// Poll until finished.
    ///
    /// Each tick checks failure before completion. A tick whose sleep would
    /// run past the deadline ends the wait with [`AtlasError::Timeout`], so
    /// at most `floor(timeout / interval)` refreshes happen. Missing or zero
    /// durations fall back to the defaults.
    async fn wait(&self, interval: Option<Duration>, timeout: Option<Duration>) -> AtlasResult<()> {
        let interval = interval
            .filter(|interval| !interval.is_zero())
            .unwrap_or_else(|| self.default_interval());
        let timeout = timeout
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or_else(|| self.default_timeout());

        let bus = self.event_bus();
        evented(&bus, self, EventKind::Wait, poll_until_settled(self, &bus, interval, timeout)).await
    }
}

async fn poll_until_settled<P: Pollable>(
    target: &P,
    bus: &EventBus,
    interval: Duration,
    timeout: Duration,
) -> AtlasResult<()> {
    let end = Instant::now() + timeout;
    loop {
        if target.has_failed() {
            return Err(target.failure());
        }
        if target.is_finished() {
            return Ok(());
        }
        if Instant::now() + interval > end {
            break;
        }

        bus.publish(target, EventKind::Wait, EventState::Progress);
        debug!(
            "{} not finished, polling again in {:?}",
            target.type_name(),
            interval
        );
        sleep(interval).await;
        target.refresh().await?;
    }

    Err(AtlasError::Timeout {
        timeout,
        message: "Long-running task failed to complete".to_string(),
    })
}

/// Handle on an asynchronous server operation started by a request.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    model: QueryableModel,
    poll: PollSpec,
}

impl PendingRequest {
    pub(crate) fn from_descriptor(
        client: AtlasClient,
        spec: &'static ModelSpec,
        descriptor: Value,
    ) -> Self {
        let poll = spec.poll.unwrap_or(REQUEST_POLL);
        Self {
            model: QueryableModel::detached(client, spec, descriptor),
            poll,
        }
    }

    pub fn model(&self) -> &QueryableModel {
        &self.model
    }

    pub fn status(&self) -> Option<String> {
        self.model
            .data()
            .get(self.poll.status_field)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

impl Evented for PendingRequest {
    fn type_name(&self) -> &'static str {
        self.model.type_name()
    }

    fn ancestors(&self) -> &'static [&'static str] {
        self.model.spec().ancestors
    }
}

#[async_trait]
impl Pollable for PendingRequest {
    fn event_bus(&self) -> Arc<EventBus> {
        self.model.client().events()
    }

    fn default_interval(&self) -> Duration {
        self.model.client().config().poll_interval()
    }

    fn default_timeout(&self) -> Duration {
        self.model.client().config().poll_timeout()
    }

    fn has_failed(&self) -> bool {
        self.poll.has_failed(&self.model.data())
    }

    fn is_finished(&self) -> bool {
        self.poll.is_finished(&self.model.data())
    }

    async fn refresh(&self) -> AtlasResult<()> {
        self.model.refresh().await
    }

    fn failure(&self) -> AtlasError {
        AtlasError::failed(&self.model)
    }
}
