//! URL-backed models
//!
//! A `QueryableModel` starts with whatever data its parent handed it and
//! fetches its canonical representation the first time a read needs
//! something it does not hold.

use crate::client::AtlasClient;
use crate::collection::queryable::CollectionShared;
use crate::collection::{DependentCollection, QueryableCollection, RelatedCollection};
use crate::error::{AtlasError, AtlasResult};
use crate::events::{evented, EventKind, EventState, Evented};
use crate::model::spec::{ModelKind, ModelSpec, Relationship};
use crate::model::state::LoadState;
use crate::pollable::{PendingRequest, Pollable};
use crate::response::{collection_items, parse_envelope};
use crate::transport::QueryParams;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, warn};

/// Handle to one URL-backed resource. Clones share state.
#[derive(Clone)]
pub struct QueryableModel {
    inner: Arc<ModelInner>,
}

struct ModelInner {
    client: AtlasClient,
    spec: &'static ModelSpec,
    parent: Option<Weak<CollectionShared>>,
    /// URL that `<primary key value>` is appended to when no href is known
    item_base: Option<String>,
    state: Mutex<ModelState>,
    /// Held for the duration of a fetch so cloned handles share one request
    fetch: AsyncMutex<()>,
}

#[derive(Default)]
struct ModelState {
    data: Map<String, Value>,
    href: Option<String>,
    load_state: LoadState,
    relationships: HashMap<&'static str, RelatedCollection>,
    request: Option<PendingRequest>,
}

/// Non-owning reference to a model, held by its relationship collections
#[derive(Clone)]
pub struct WeakModel(Weak<ModelInner>);

impl WeakModel {
    pub fn upgrade(&self) -> Option<QueryableModel> {
        self.0.upgrade().map(|inner| QueryableModel { inner })
    }
}

impl fmt::Debug for WeakModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakModel")
    }
}

impl QueryableModel {
    pub(crate) fn new(
        client: AtlasClient,
        spec: &'static ModelSpec,
        parent: Option<Weak<CollectionShared>>,
        item_base: Option<String>,
        href: Option<String>,
        data: Map<String, Value>,
    ) -> Self {
        let state = ModelState {
            data: spec.filter_fields(data),
            href: href.filter(|href| !href.is_empty()),
            ..ModelState::default()
        };

        Self {
            inner: Arc::new(ModelInner {
                client,
                spec,
                parent,
                item_base,
                state: Mutex::new(state),
                fetch: AsyncMutex::new(()),
            }),
        }
    }

    /// A model outside any collection, e.g. an async request descriptor.
    /// Its URL is the descriptor's `href` or `<root>/<path>/<id>`.
    pub fn detached(client: AtlasClient, spec: &'static ModelSpec, response: Value) -> Self {
        let root = if spec.admin_api {
            client.admin_url()
        } else {
            client.api_url()
        };
        let item_base = format!("{}/{}", root, spec.canonical_item_path());
        let model = Self::new(client, spec, None, Some(item_base), None, Map::new());
        model.load(response);
        model
    }

    fn state(&self) -> MutexGuard<'_, ModelState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_load_state(&self, load_state: LoadState) {
        self.state().load_state = load_state;
    }

    pub fn spec(&self) -> &'static ModelSpec {
        self.inner.spec
    }

    pub fn client(&self) -> &AtlasClient {
        &self.inner.client
    }

    pub fn type_name(&self) -> &'static str {
        self.inner.spec.type_name
    }

    pub fn load_state(&self) -> LoadState {
        self.state().load_state.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.state().load_state.is_loaded()
    }

    /// Snapshot of the locally held fields. Never fetches.
    pub fn data(&self) -> Map<String, Value> {
        self.state().data.clone()
    }

    pub fn href(&self) -> Option<String> {
        self.state().href.clone()
    }

    /// Primary key value if already held. Never fetches.
    pub fn cached_identifier(&self) -> Option<String> {
        let key = self.inner.spec.primary_key?;
        identifier_of(&self.state().data, key)
    }

    /// Primary key value, inflating when it is not held yet.
    pub async fn identifier(&self) -> AtlasResult<Option<String>> {
        if self.inner.spec.primary_key.is_none() {
            return Ok(None);
        }
        if let Some(identifier) = self.cached_identifier() {
            return Ok(Some(identifier));
        }
        self.inflate().await?;
        Ok(self.cached_identifier())
    }

    /// The resource URL: the known href, else `<item base>/<identifier>`.
    pub fn url(&self) -> AtlasResult<String> {
        let state = self.state();
        if let Some(href) = &state.href {
            return Ok(href.clone());
        }

        let Some(key) = self.inner.spec.primary_key else {
            return Err(AtlasError::client("Not able to determine object URL"));
        };

        match (identifier_of(&state.data, key), &self.inner.item_base) {
            (Some(identifier), Some(base)) => Ok(format!("{}/{}", base, identifier)),
            (Some(_), None) => Err(AtlasError::client("Not able to determine object URL")),
            (None, _) => {
                let message = insufficient_data_message(key);
                error!("{}", message);
                Err(AtlasError::client(message))
            }
        }
    }

    fn parent_collection(&self) -> Option<QueryableCollection> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(QueryableCollection::from_shared)
    }

    /// Fetch the canonical representation unless already loaded.
    ///
    /// A transport failure does not propagate: the model keeps its local
    /// data and is marked [`LoadState::Failed`]. Use [`refresh`](Self::refresh)
    /// when fresh data is required. Concurrent calls through cloned handles
    /// wait for the fetch already in flight instead of sending their own.
    pub async fn inflate(&self) -> AtlasResult<()> {
        if self.is_loaded() {
            return Ok(());
        }

        let _fetch = self.inner.fetch.lock().await;
        {
            let mut state = self.state();
            if state.load_state.is_loaded() {
                return Ok(());
            }
            state.load_state = LoadState::Loading;
        }

        let url = match self.url() {
            Ok(url) => url,
            Err(err) => {
                self.set_load_state(LoadState::Unloaded);
                return Err(err);
            }
        };

        debug!("Lazy-loading {} from {}", self.type_name(), url);
        match self.client().transport().get(&url, &[]).await {
            Ok(response) => {
                self.load(response);
                self.set_load_state(LoadState::Loaded);
            }
            Err(err) => {
                warn!(
                    "Could not inflate {} from {}, keeping local data: {}",
                    self.type_name(),
                    url,
                    err
                );
                self.set_load_state(LoadState::Failed {
                    reason: err.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Re-fetch from the server. Errors propagate and leave the previous
    /// state in place.
    pub async fn refresh(&self) -> AtlasResult<()> {
        let url = self.url()?;
        let _fetch = self.inner.fetch.lock().await;
        let previous = std::mem::replace(&mut self.state().load_state, LoadState::Loading);

        debug!("Refreshing {} from {}", self.type_name(), url);
        match self.client().transport().get(&url, &[]).await {
            Ok(response) => {
                self.load(response);
                self.set_load_state(LoadState::Loaded);
                Ok(())
            }
            Err(err) => {
                self.set_load_state(previous);
                Err(err)
            }
        }
    }

    /// Merge a server response into the model.
    ///
    /// Fields the response omits are kept. Related collections that came
    /// along are cached, and an async request descriptor is captured for
    /// [`wait`](Self::wait).
    pub fn load(&self, response: Value) {
        let bus = self.client().events();
        bus.publish(self, EventKind::Load, EventState::Started);

        let envelope = parse_envelope(response, self.inner.spec);
        {
            let mut state = self.state();
            if let Some(href) = envelope.href.filter(|href| !href.is_empty()) {
                state.href = Some(href);
            }
            state.data.extend(envelope.fields);
        }

        // Built unlocked: queryable collections resolve this model's URL.
        let related: Vec<_> = envelope
            .relationships
            .into_iter()
            .map(|(rel, value)| (rel.name, self.build_related(rel, Some(value))))
            .collect();
        let request = envelope.request.and_then(|descriptor| {
            self.inner.spec.request.map(|request| {
                PendingRequest::from_descriptor(self.client().clone(), request.spec, descriptor)
            })
        });

        {
            let mut state = self.state();
            state.relationships.extend(related);
            if request.is_some() {
                state.request = request;
            }
        }

        bus.publish(self, EventKind::Load, EventState::Finished);
    }

    /// Drop the href a new member was POSTed to; afterwards the URL derives
    /// from the server-assigned identifier.
    pub(crate) fn clear_href(&self) {
        self.state().href = None;
    }

    pub(crate) fn mark_loaded(&self) {
        self.set_load_state(LoadState::Loaded);
    }

    fn build_related(&self, rel: &'static Relationship, preload: Option<Value>) -> RelatedCollection {
        let items = preload.map(|value| collection_items(value, None).0);
        match rel.spec.kind {
            ModelKind::Dependent => {
                let collection = DependentCollection::new(rel.spec);
                if let Some(items) = items {
                    collection.set_items(items);
                }
                RelatedCollection::Dependent(collection)
            }
            ModelKind::Queryable => {
                let collection = QueryableCollection::for_parent(
                    self.client().clone(),
                    rel.spec,
                    self.downgrade(),
                );
                if let Some(items) = items {
                    collection.set_items(items);
                }
                RelatedCollection::Queryable(collection)
            }
        }
    }

    /// Value of a declared field, inflating when it is not held yet.
    pub async fn field(&self, name: &str) -> AtlasResult<Option<Value>> {
        let spec = self.inner.spec;
        if !spec.fields.is_empty() && !spec.has_field(name) {
            error!("Missing attr {}: {}", spec.type_name, name);
            return Err(AtlasError::UnknownField {
                type_name: spec.type_name,
                field: name.to_string(),
            });
        }

        let held = self.state().data.contains_key(name);
        if !held {
            debug!("Lazy-loading the attribute '{}' of {}", name, spec.type_name);
            self.inflate().await?;
        }
        Ok(self.state().data.get(name).cloned())
    }

    /// [`field`](Self::field) deserialized into `T`
    pub async fn field_as<T: DeserializeOwned>(&self, name: &str) -> AtlasResult<Option<T>> {
        match self.field(name).await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// The cached collection behind a declared relationship.
    ///
    /// Dependent relationships inflate this model first since they only
    /// arrive inside its response. Queryable ones are lazily fetched from
    /// `<model url>/<path>`.
    pub async fn relationship(&self, name: &str) -> AtlasResult<RelatedCollection> {
        let spec = self.inner.spec;
        let rel = spec.relationship(name).ok_or_else(|| AtlasError::UnknownField {
            type_name: spec.type_name,
            field: name.to_string(),
        })?;

        let cached = self.state().relationships.get(rel.name).cloned();
        if let Some(collection) = cached {
            return Ok(collection);
        }

        if rel.spec.kind == ModelKind::Dependent {
            self.inflate().await?;
            let cached = self.state().relationships.get(rel.name).cloned();
            if let Some(collection) = cached {
                return Ok(collection);
            }
        }

        let collection = self.build_related(rel, None);
        let mut state = self.state();
        Ok(state
            .relationships
            .entry(rel.name)
            .or_insert(collection)
            .clone())
    }

    pub async fn to_dict(&self) -> AtlasResult<Map<String, Value>> {
        self.inflate().await?;
        Ok(self.data())
    }

    /// `{primary_key: identifier}`, the form other resources reference this one by
    pub async fn to_json_dict(&self) -> AtlasResult<Map<String, Value>> {
        let mut map = Map::new();
        if let Some(key) = self.inner.spec.primary_key {
            let identifier = self.identifier().await?;
            map.insert(
                key.to_string(),
                identifier.map(Value::String).unwrap_or(Value::Null),
            );
        }
        Ok(map)
    }

    /// Request body for create/update: declared fields under the data key,
    /// anything else at the top level. No fields resends the held data.
    pub fn generate_input(&self, fields: Map<String, Value>) -> Value {
        let spec = self.inner.spec;
        let Some(data_key) = spec.data_key else {
            debug!("No data key specified, using fields as given");
            return Value::Object(fields);
        };

        if fields.is_empty() {
            return Value::Object(self.data());
        }

        let mut nested = Map::new();
        let mut top = Map::new();
        for (key, value) in fields {
            if spec.has_field(&key) {
                nested.insert(key, value);
            } else {
                top.insert(key, value);
            }
        }
        top.insert(data_key.to_string(), Value::Object(nested));
        Value::Object(top)
    }

    /// POST this model. The primary key is server-assigned and never sent.
    pub async fn create(&self, mut fields: Map<String, Value>) -> AtlasResult<()> {
        let bus = self.client().events();
        evented(&bus, self, EventKind::Create, async {
            if let Some(key) = self.inner.spec.primary_key {
                fields.remove(key);
            }
            let data = self.generate_input(fields);
            let url = self.url()?;
            info!("Creating {} at {}", self.type_name(), url);

            let response = self.client().transport().post(&url, &data).await?;
            self.clear_href();
            self.load(response);
            self.mark_loaded();
            Ok(())
        })
        .await
    }

    /// PUT the given fields
    pub async fn update(&self, fields: Map<String, Value>) -> AtlasResult<()> {
        let bus = self.client().events();
        evented(&bus, self, EventKind::Update, async {
            let data = self.generate_input(fields);
            let url = self.url()?;
            info!("Updating {} at {}", self.type_name(), url);

            let response = self.client().transport().put(&url, &data).await?;
            self.load(response);
            Ok(())
        })
        .await
    }

    /// DELETE this model and drop it from its parent collection
    pub async fn delete(&self, params: QueryParams) -> AtlasResult<()> {
        let bus = self.client().events();
        evented(&bus, self, EventKind::Delete, async {
            let url = self.url()?;
            info!("Deleting {} at {}", self.type_name(), url);

            let response = self.client().transport().delete(&url, &params, None).await?;
            self.load(response);
            if let Some(parent) = self.parent_collection() {
                parent.remove(self);
            }
            Ok(())
        })
        .await
    }

    /// Wait for the pending async request, if any, then inflate.
    pub async fn wait(&self, interval: Option<Duration>, timeout: Option<Duration>) -> AtlasResult<()> {
        let bus = self.client().events();
        evented(&bus, self, EventKind::Wait, async {
            let pending = self.state().request.clone();
            if let Some(request) = pending {
                request.wait(interval, timeout).await?;
                self.state().request = None;
            }
            self.inflate().await
        })
        .await
    }

    pub fn pending_request(&self) -> Option<PendingRequest> {
        self.state().request.clone()
    }

    pub fn downgrade(&self) -> WeakModel {
        WeakModel(Arc::downgrade(&self.inner))
    }

    pub fn ptr_eq(&self, other: &QueryableModel) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Same model object, or same resource by identifier
    pub(crate) fn same_resource(&self, other: &QueryableModel) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.cached_identifier(), other.cached_identifier()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}

impl Evented for QueryableModel {
    fn type_name(&self) -> &'static str {
        self.inner.spec.type_name
    }

    fn ancestors(&self) -> &'static [&'static str] {
        self.inner.spec.ancestors
    }
}

impl fmt::Debug for QueryableModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("QueryableModel");
        debug.field("type", &self.inner.spec.type_name);
        if let Ok(state) = self.inner.state.try_lock() {
            debug
                .field("href", &state.href)
                .field("load_state", &state.load_state)
                .field("fields", &state.data.len());
        }
        debug.finish()
    }
}

/// Identifier rendering: strings as-is, other scalars via their JSON text
pub(crate) fn identifier_of(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn insufficient_data_message(key: &str) -> String {
    format!(
        "There is not enough data to inflate this object. Need either an href: None or a {}: None",
        key
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::events::EventBus;
    use crate::transport::{Method, Transport};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every request with the same body and counts calls.
    struct Fixed {
        body: Value,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for Fixed {
        async fn request(
            &self,
            _method: Method,
            _url: &str,
            _params: &[(String, String)],
            _data: Option<&Value>,
        ) -> AtlasResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    static COLUMN: ModelSpec = ModelSpec::dependent("Column").fields(&["name"]);
    static TABLE: ModelSpec = ModelSpec::queryable("Table", "tables")
        .primary_key("guid")
        .data_key("entity", false)
        .fields(&["guid", "name", "owner"])
        .relationships(&[Relationship {
            name: "columns",
            spec: &COLUMN,
        }]);

    fn client(body: Value) -> (AtlasClient, Arc<Fixed>) {
        let transport = Arc::new(Fixed {
            body,
            calls: AtomicUsize::new(0),
        });
        let client = AtlasClient::with_transport(ClientConfig::new("http://atlas:21000"), transport.clone())
            .unwrap()
            .with_event_bus(Arc::new(EventBus::new()));
        (client, transport)
    }

    fn model(client: &AtlasClient, data: Value) -> QueryableModel {
        QueryableModel::new(
            client.clone(),
            &TABLE,
            None,
            Some(format!("{}/tables", client.api_url())),
            None,
            data.as_object().cloned().unwrap_or_default(),
        )
    }

    #[test]
    fn initial_data_is_filtered_to_declared_fields() {
        let (client, _) = client(json!({}));
        let table = model(&client, json!({"guid": "g1", "bogus": 1}));
        assert_eq!(Value::Object(table.data()), json!({"guid": "g1"}));
    }

    #[test]
    fn url_derives_from_item_base_and_identifier() {
        let (client, _) = client(json!({}));
        let table = model(&client, json!({"guid": "g1"}));
        assert_eq!(table.url().unwrap(), "http://atlas:21000/api/atlas/v2/tables/g1");
    }

    #[test]
    fn url_without_identifier_reports_missing_data() {
        let (client, _) = client(json!({}));
        let table = model(&client, json!({"name": "orders"}));
        let message = table.url().unwrap_err().to_string();
        assert!(message.contains("There is not enough data to inflate this object"));
        assert!(message.contains("guid: None"));
    }

    #[test]
    fn generate_input_splits_declared_fields() {
        let (client, _) = client(json!({}));
        let table = model(&client, json!({"guid": "g1"}));
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("orders"));
        fields.insert("ignoreRelationships".to_string(), json!(true));

        assert_eq!(
            table.generate_input(fields),
            json!({"entity": {"name": "orders"}, "ignoreRelationships": true})
        );
        assert_eq!(table.generate_input(Map::new()), json!({"guid": "g1"}));
    }

    #[tokio::test]
    async fn load_merges_without_dropping_fields() {
        let (client, _) = client(json!({}));
        let table = model(&client, json!({"guid": "g1", "owner": "etl"}));
        table.load(json!({"entity": {"guid": "g1", "name": "orders"}}));

        let data = table.data();
        assert_eq!(data["owner"], "etl");
        assert_eq!(data["name"], "orders");
    }

    #[tokio::test]
    async fn dependent_relationship_is_precached_from_response() {
        let (client, transport) = client(json!({}));
        let table = model(&client, json!({"guid": "g1"}));
        table.load(json!({
            "entity": {"guid": "g1"},
            "columns": [{"name": "id"}, {"name": "total"}]
        }));

        let first = table.relationship("columns").await.unwrap();
        let second = table.relationship("columns").await.unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(first.as_dependent().unwrap().len(), 2);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_field_is_rejected_without_fetch() {
        let (client, transport) = client(json!({}));
        let table = model(&client, json!({"guid": "g1"}));
        match table.field("colour").await {
            Err(AtlasError::UnknownField { field, .. }) => assert_eq!(field, "colour"),
            other => panic!("Expected unknown field error, got {other:?}"),
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn to_json_dict_uses_primary_key() {
        let (client, _) = client(json!({}));
        let table = model(&client, json!({"guid": "g1"}));
        assert_eq!(Value::Object(table.to_json_dict().await.unwrap()), json!({"guid": "g1"}));
    }

    #[tokio::test]
    async fn field_as_deserializes() {
        let (client, _) = client(json!({"entity": {"guid": "g1", "name": "orders"}}));
        let table = model(&client, json!({"guid": "g1"}));
        let name: Option<String> = table.field_as("name").await.unwrap();
        assert_eq!(name.as_deref(), Some("orders"));
    }
}
