//! URL-backed, lazily loaded collections

use crate::client::AtlasClient;
use crate::collection::filter::{encode_filter_value, expand_filters};
use crate::error::{AtlasError, AtlasResult};
use crate::events::{evented, EventKind, EventState, Evented};
use crate::model::queryable::{identifier_of, QueryableModel, WeakModel};
use crate::model::spec::ModelSpec;
use crate::pollable::{PendingRequest, Pollable};
use crate::response::collection_items;
use crate::transport::QueryParams;
use crate::version::ApiVersion;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

/// Collection of [`QueryableModel`]s backed by a listing URL.
///
/// Nothing is fetched until the members are needed; `filter` only records
/// query parameters for the next fetch.
#[derive(Clone)]
pub struct QueryableCollection {
    shared: Arc<CollectionShared>,
}

pub(crate) struct CollectionShared {
    client: AtlasClient,
    spec: &'static ModelSpec,
    parent: Option<WeakModel>,
    /// Listing path replacing `spec.path`
    path: Option<String>,
    state: Mutex<CollectionState>,
    /// Held while the listing is fetched so cloned handles share one request
    fetch: AsyncMutex<()>,
}

#[derive(Default)]
struct CollectionState {
    models: Vec<QueryableModel>,
    inflated: bool,
    filter: BTreeMap<String, String>,
    request: Option<PendingRequest>,
}

impl QueryableCollection {
    fn build(
        client: AtlasClient,
        spec: &'static ModelSpec,
        parent: Option<WeakModel>,
        path: Option<String>,
    ) -> Self {
        Self {
            shared: Arc::new(CollectionShared {
                client,
                spec,
                parent,
                path,
                state: Mutex::new(CollectionState::default()),
                fetch: AsyncMutex::new(()),
            }),
        }
    }

    /// Root collection at `<api>/<spec.path>`
    pub fn new(client: AtlasClient, spec: &'static ModelSpec) -> Self {
        Self::build(client, spec, None, None)
    }

    /// Root collection listed from `path` instead of `spec.path`. Items keep
    /// their canonical URLs under `spec.item_path` / `spec.path`.
    pub fn at_path(client: AtlasClient, spec: &'static ModelSpec, path: impl Into<String>) -> Self {
        Self::build(client, spec, None, Some(path.into()))
    }

    pub(crate) fn for_parent(client: AtlasClient, spec: &'static ModelSpec, parent: WeakModel) -> Self {
        Self::build(client, spec, Some(parent), None)
    }

    pub(crate) fn from_shared(shared: Arc<CollectionShared>) -> Self {
        Self { shared }
    }

    fn state(&self) -> MutexGuard<'_, CollectionState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn spec(&self) -> &'static ModelSpec {
        self.shared.spec
    }

    pub fn client(&self) -> &AtlasClient {
        &self.shared.client
    }

    pub fn path(&self) -> &str {
        self.shared.path.as_deref().unwrap_or(self.shared.spec.path)
    }

    fn root(&self) -> AtlasResult<String> {
        if self.shared.spec.admin_api {
            return Ok(self.shared.client.admin_url());
        }
        match &self.shared.parent {
            Some(parent) => parent
                .upgrade()
                .ok_or_else(|| AtlasError::client("Parent model is no longer available"))?
                .url(),
            None => Ok(self.shared.client.api_url()),
        }
    }

    /// The listing URL
    pub fn url(&self) -> AtlasResult<String> {
        Ok(format!("{}/{}", self.root()?, self.path()))
    }

    /// URL that member identifiers are appended to
    pub fn item_base(&self) -> AtlasResult<String> {
        if self.shared.path.is_none() && self.shared.spec.item_path.is_none() {
            return self.url();
        }
        Ok(format!(
            "{}/{}",
            self.root()?,
            self.shared.spec.canonical_item_path()
        ))
    }

    /// A member that is not added to the collection yet
    pub(crate) fn model(&self, href: Option<String>, data: Map<String, Value>) -> QueryableModel {
        QueryableModel::new(
            self.shared.client.clone(),
            self.shared.spec,
            Some(Arc::downgrade(&self.shared)),
            self.item_base().ok(),
            href,
            data,
        )
    }

    fn identifier_model(&self, identifier: String) -> QueryableModel {
        let href = self
            .item_base()
            .ok()
            .map(|base| format!("{}/{}", base, identifier));
        let mut data = Map::new();
        if let Some(key) = self.shared.spec.primary_key {
            data.insert(key.to_string(), Value::String(identifier));
        }
        self.model(href, data)
    }

    fn item_model(&self, item: Value) -> QueryableModel {
        match item {
            Value::Object(map) => {
                let href = map.get("href").and_then(Value::as_str).map(str::to_string);
                let model = self.model(href, Map::new());
                model.load(Value::Object(map));
                model
            }
            Value::String(identifier) => self.identifier_model(identifier),
            other => self.identifier_model(other.to_string()),
        }
    }

    /// The member with `identifier`, synthesized and not yet fetched.
    /// The collection itself is left unchanged.
    pub fn get(&self, identifier: impl fmt::Display) -> QueryableModel {
        self.identifier_model(identifier.to_string())
    }

    /// Replace the members without a request.
    ///
    /// Objects become loaded models built from the object itself; strings and
    /// numbers become identifier-only models that fetch on first read. An
    /// empty list resets the collection.
    pub fn set_items(&self, items: Vec<Value>) -> &Self {
        if items.is_empty() {
            return self.reset();
        }

        let models = items
            .into_iter()
            .map(|item| {
                let preloaded = item.is_object();
                let model = self.item_model(item);
                if preloaded {
                    model.mark_loaded();
                }
                model
            })
            .collect();

        let mut state = self.state();
        state.models = models;
        state.inflated = true;
        drop(state);
        self
    }

    /// Record query filters for the next fetch and drop current members.
    ///
    /// Keys are prefixed with `<data_key>/` when the resource asks for it;
    /// non-string values are JSON encoded.
    pub fn filter<K, I>(&self, filters: I) -> &Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let spec = self.shared.spec;
        let encoded = filters
            .into_iter()
            .map(|(key, value)| {
                let key = key.into();
                let key = match spec.data_key {
                    Some(prefix) if spec.use_key_prefix => format!("{}/{}", prefix, key),
                    _ => key,
                };
                (key, encode_filter_value(&value))
            })
            .collect();

        let mut state = self.state();
        state.models.clear();
        state.inflated = false;
        state.filter = encoded;
        drop(state);
        self
    }

    /// Forget members and filters
    pub fn reset(&self) -> &Self {
        let mut state = self.state();
        state.models.clear();
        state.inflated = false;
        state.filter.clear();
        drop(state);
        self
    }

    pub fn filters(&self) -> BTreeMap<String, String> {
        self.state().filter.clone()
    }

    pub fn is_inflated(&self) -> bool {
        self.state().inflated
    }

    /// Refuse resources newer than the configured server
    pub fn check_version(&self) -> AtlasResult<()> {
        let min_version = self.shared.spec.min_version;
        let current = self.shared.client.version();
        if min_version > ApiVersion::OLDEST_SUPPORTED && current < min_version {
            return Err(AtlasError::client(format!(
                "Cannot access {} in version {}, it was added in version {}",
                self.url()?,
                current,
                min_version
            )));
        }
        Ok(())
    }

    /// Fetch the members unless already loaded. Concurrent callers wait for
    /// the listing already in flight.
    pub async fn inflate(&self) -> AtlasResult<()> {
        if self.is_inflated() {
            return Ok(());
        }

        let _fetch = self.shared.fetch.lock().await;
        if self.is_inflated() {
            return Ok(());
        }

        self.check_version()?;
        let url = self.url()?;
        let params = expand_filters(&self.state().filter);

        debug!(
            "Fetching {} collection from {}",
            self.shared.spec.type_name, url
        );
        let response = self.shared.client.transport().get(&url, &params).await?;
        self.load(response);
        self.state().inflated = true;
        Ok(())
    }

    /// Replace the members with the models in a listing response.
    pub fn load(&self, response: Value) {
        let bus = self.shared.client.events();
        bus.publish(self, EventKind::Load, EventState::Started);

        let request_key = self.shared.spec.request.map(|request| request.key);
        let (items, request) = collection_items(response, request_key);
        let models: Vec<_> = items.into_iter().map(|item| self.item_model(item)).collect();
        let request = request.and_then(|descriptor| {
            self.shared.spec.request.map(|spec| {
                PendingRequest::from_descriptor(self.shared.client.clone(), spec.spec, descriptor)
            })
        });

        {
            let mut state = self.state();
            state.models = models;
            if request.is_some() {
                state.request = request;
            }
        }

        bus.publish(self, EventKind::Load, EventState::Finished);
    }

    pub async fn refresh(&self) -> AtlasResult<()> {
        self.state().inflated = false;
        self.inflate().await
    }

    /// Members, fetching first if needed
    pub async fn models(&self) -> AtlasResult<Vec<QueryableModel>> {
        self.inflate().await?;
        Ok(self.cached_models())
    }

    /// Members currently held. Never fetches.
    pub fn cached_models(&self) -> Vec<QueryableModel> {
        self.state().models.clone()
    }

    pub async fn len(&self) -> AtlasResult<usize> {
        self.inflate().await?;
        Ok(self.state().models.len())
    }

    pub async fn is_empty(&self) -> AtlasResult<bool> {
        Ok(self.len().await? == 0)
    }

    pub(crate) fn push(&self, model: QueryableModel) {
        self.state().models.push(model);
    }

    /// Drop `model` (matched by identity or identifier) from the members
    pub fn remove(&self, model: &QueryableModel) {
        self.state()
            .models
            .retain(|member| !member.same_resource(model));
    }

    /// Every member as a field map, inflating members as needed
    pub async fn to_dict(&self) -> AtlasResult<Vec<Map<String, Value>>> {
        let mut dicts = Vec::new();
        for model in self.models().await? {
            dicts.push(model.to_dict().await?);
        }
        Ok(dicts)
    }

    /// POST a new member. With an identifier the request goes to
    /// `<url>/<identifier>`.
    pub async fn create(
        &self,
        identifier: Option<&str>,
        mut fields: Map<String, Value>,
    ) -> AtlasResult<QueryableModel> {
        let mut href = self.url()?;
        if let Some(identifier) = identifier {
            if let Some(key) = self.shared.spec.primary_key {
                fields.insert(key.to_string(), Value::String(identifier.to_string()));
            }
            href = format!("{}/{}", href, identifier);
        }

        info!(
            "Adding a new {} to the collection at {}",
            self.shared.spec.type_name, href
        );
        let model = self.model(Some(href), fields.clone());
        model.create(fields).await?;
        self.push(model.clone());
        Ok(model)
    }

    /// PUT `fields` to every member
    pub async fn update(&self, fields: Map<String, Value>) -> AtlasResult<()> {
        info!("Updating every {} in the collection", self.shared.spec.type_name);
        for model in self.models().await? {
            model.update(fields.clone()).await?;
        }
        Ok(())
    }

    /// DELETE every member
    pub async fn delete(&self, params: QueryParams) -> AtlasResult<()> {
        info!("Deleting every {} in the collection", self.shared.spec.type_name);
        for model in self.models().await? {
            model.delete(params.clone()).await?;
        }
        Ok(())
    }

    /// Wait for the pending async request, if any, then inflate.
    pub async fn wait(&self, interval: Option<Duration>, timeout: Option<Duration>) -> AtlasResult<()> {
        let bus = self.shared.client.events();
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

    /// Member identifiers currently held. Never fetches.
    pub fn cached_identifiers(&self) -> Vec<String> {
        let Some(key) = self.shared.spec.primary_key else {
            return Vec::new();
        };
        self.state()
            .models
            .iter()
            .filter_map(|model| identifier_of(&model.data(), key))
            .collect()
    }

    pub fn ptr_eq(&self, other: &QueryableCollection) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Evented for QueryableCollection {
    fn type_name(&self) -> &'static str {
        self.shared.spec.collection_type_name
    }

    fn ancestors(&self) -> &'static [&'static str] {
        self.shared.spec.collection_ancestors
    }
}

impl fmt::Debug for QueryableCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("QueryableCollection");
        debug
            .field("type", &self.shared.spec.type_name)
            .field("path", &self.path());
        if let Ok(state) = self.shared.state.try_lock() {
            debug
                .field("inflated", &state.inflated)
                .field("models", &state.models.len())
                .field("filter", &state.filter);
        }
        debug.finish()
    }
}
