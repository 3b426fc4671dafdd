//! Lifecycle event bus
//!
//! Callbacks are registered per (type tag, event kind, state). Publishing
//! walks the source's ancestor list from most to least specific, so a
//! handler registered for `QueryableModel` also sees glossary events.

use crate::error::AtlasResult;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Phase of an evented operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventState {
    /// Wildcard used when subscribing; never published
    Any,
    Started,
    Failed,
    Finished,
    Progress,
}

/// Operations that publish events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Wait,
    Load,
    Create,
    Update,
    PartialUpdate,
    Delete,
    Detailed,
    FetchCategories,
    FetchCategoriesHeaders,
    FetchTerms,
    FetchTermsHeaders,
    FetchRelated,
    FetchAssignedEntities,
    AssignEntities,
    UpdateAssignedEntities,
    DeleteAssignedEntities,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Wait => "wait",
            EventKind::Load => "load",
            EventKind::Create => "create",
            EventKind::Update => "update",
            EventKind::PartialUpdate => "partial_update",
            EventKind::Delete => "delete",
            EventKind::Detailed => "detailed",
            EventKind::FetchCategories => "fetch_categories",
            EventKind::FetchCategoriesHeaders => "fetch_categories_headers",
            EventKind::FetchTerms => "fetch_terms",
            EventKind::FetchTermsHeaders => "fetch_terms_headers",
            EventKind::FetchRelated => "fetch_related",
            EventKind::FetchAssignedEntities => "fetch_assigned_entities",
            EventKind::AssignEntities => "assign_entities",
            EventKind::UpdateAssignedEntities => "update_assigned_entities",
            EventKind::DeleteAssignedEntities => "delete_assigned_entities",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can be the source of an event.
pub trait Evented: Send + Sync {
    /// Type tag of the source
    fn type_name(&self) -> &'static str;

    /// Type tags to match against, most specific first. Starts with
    /// [`type_name`](Evented::type_name).
    fn ancestors(&self) -> &'static [&'static str];
}

/// A published event
pub struct Event<'a> {
    pub source: &'a dyn Evented,
    pub kind: EventKind,
    pub state: EventState,
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("source", &self.source.type_name())
            .field("kind", &self.kind)
            .field("state", &self.state)
            .finish()
    }
}

pub type EventCallback = Arc<dyn Fn(&Event<'_>) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EventKey {
    type_name: String,
    kind: EventKind,
    state: EventState,
}

impl EventKey {
    fn new(type_name: &str, kind: EventKind, state: EventState) -> Self {
        Self {
            type_name: type_name.to_string(),
            kind,
            state,
        }
    }
}

static GLOBAL: Lazy<Arc<EventBus>> = Lazy::new(|| Arc::new(EventBus::new()));

/// Registry of event callbacks
#[derive(Default)]
pub struct EventBus {
    handlers: DashMap<EventKey, Vec<EventCallback>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// The process-wide bus used by clients that were not given one.
    pub fn global() -> Arc<EventBus> {
        GLOBAL.clone()
    }

    /// Register `callback` for `(type_name, kind, state)`. `None` subscribes
    /// to every state. Callbacks fire in registration order.
    pub fn subscribe<F>(
        &self,
        type_name: impl Into<String>,
        kind: EventKind,
        state: Option<EventState>,
        callback: F,
    ) where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        let key = EventKey {
            type_name: type_name.into(),
            kind,
            state: state.unwrap_or(EventState::Any),
        };
        debug!("Subscribing to {} {:?} on {}", kind, key.state, key.type_name);
        self.handlers
            .entry(key)
            .or_default()
            .push(Arc::new(callback));
    }

    pub fn publish(&self, source: &dyn Evented, kind: EventKind, state: EventState) {
        if self.handlers.is_empty() {
            return;
        }

        let callbacks = self.resolve(source.ancestors(), kind, state);
        if callbacks.is_empty() {
            return;
        }

        let event = Event {
            source,
            kind,
            state,
        };
        for callback in callbacks {
            callback(&event);
        }
    }

    /// Exact state match anywhere in the hierarchy wins over a wildcard.
    fn resolve(
        &self,
        ancestors: &[&'static str],
        kind: EventKind,
        state: EventState,
    ) -> Vec<EventCallback> {
        for type_name in ancestors {
            if let Some(found) = self.handlers.get(&EventKey::new(type_name, kind, state)) {
                return found.value().clone();
            }
        }

        for type_name in ancestors {
            if let Some(found) = self
                .handlers
                .get(&EventKey::new(type_name, kind, EventState::Any))
            {
                return found.value().clone();
            }
        }

        Vec::new()
    }

    /// Number of registered callbacks across all keys
    pub fn handler_count(&self) -> usize {
        self.handlers.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn clear(&self) {
        self.handlers.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// Subscribe on the process-wide bus.
pub fn subscribe<F>(
    type_name: impl Into<String>,
    kind: EventKind,
    state: Option<EventState>,
    callback: F,
) where
    F: Fn(&Event<'_>) + Send + Sync + 'static,
{
    GLOBAL.subscribe(type_name, kind, state, callback);
}

/// Publish on the process-wide bus.
pub fn publish(source: &dyn Evented, kind: EventKind, state: EventState) {
    GLOBAL.publish(source, kind, state);
}

/// Run `operation`, publishing Started before it and Failed (on error)
/// then Finished after it.
pub async fn evented<T, F>(
    bus: &EventBus,
    source: &dyn Evented,
    kind: EventKind,
    operation: F,
) -> AtlasResult<T>
where
    F: Future<Output = AtlasResult<T>>,
{
    bus.publish(source, kind, EventState::Started);
    let result = operation.await;
    if result.is_err() {
        bus.publish(source, kind, EventState::Failed);
    }
    bus.publish(source, kind, EventState::Finished);
    result
}
