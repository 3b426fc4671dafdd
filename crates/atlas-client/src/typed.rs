//! Record-typed resources
//!
//! [`TypedModel`] and [`TypedCollection`] wrap the dynamic model layer with
//! a [`Resource`] marker that fixes the URL layout and the serde record the
//! payloads map to.

use crate::client::AtlasClient;
use crate::collection::QueryableCollection;
use crate::error::AtlasResult;
use crate::events::{evented, EventBus, EventKind, Evented};
use crate::model::{LoadState, ModelSpec, QueryableModel};
use crate::schema::Schema;
use crate::transport::{Method, QueryParams};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Binds a resource description to its record type.
pub trait Resource: Send + Sync + 'static {
    type Schema: Schema;

    fn spec() -> &'static ModelSpec;

    /// Partial updates are PUT to `<item url>/partial` instead of the item URL
    const PARTIAL_PATH: bool = false;
}

/// A [`QueryableModel`] whose fields read as `R::Schema`
pub struct TypedModel<R: Resource> {
    model: QueryableModel,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for TypedModel<R> {
    fn clone(&self) -> Self {
        Self::from_model(self.model.clone())
    }
}

impl<R: Resource> TypedModel<R> {
    pub fn from_model(model: QueryableModel) -> Self {
        Self {
            model,
            _resource: PhantomData,
        }
    }

    pub fn model(&self) -> &QueryableModel {
        &self.model
    }

    pub fn into_model(self) -> QueryableModel {
        self.model
    }

    pub fn cached_identifier(&self) -> Option<String> {
        self.model.cached_identifier()
    }

    pub async fn identifier(&self) -> AtlasResult<Option<String>> {
        self.model.identifier().await
    }

    pub fn url(&self) -> AtlasResult<String> {
        self.model.url()
    }

    pub fn load_state(&self) -> LoadState {
        self.model.load_state()
    }

    /// The full record, fetched on first use
    pub async fn record(&self) -> AtlasResult<R::Schema> {
        self.model.inflate().await?;
        R::Schema::from_value(Value::Object(self.model.data()))
    }

    /// One field of the record, fetched when not held yet
    pub async fn get<T: DeserializeOwned>(&self, field: &str) -> AtlasResult<Option<T>> {
        self.model.field_as(field).await
    }

    /// The record as JSON, nulls included
    pub async fn to_dict(&self) -> AtlasResult<Value> {
        self.record().await?.to_dict(None, false)
    }

    fn bus(&self) -> Arc<EventBus> {
        self.model.client().events()
    }

    async fn send(&self, method: Method, url: &str, body: &Value) -> AtlasResult<()> {
        info!("{} {} at {}", method, self.model.type_name(), url);
        let response = self
            .model
            .client()
            .transport()
            .request(method, url, &[], Some(body))
            .await?;
        self.model.load(response);
        Ok(())
    }

    /// POST `record` to this model's URL. Empty values are not sent.
    pub async fn create(&self, record: &R::Schema) -> AtlasResult<()> {
        let bus = self.bus();
        evented(&bus, self, EventKind::Create, async {
            let body = record.to_dict(R::spec().data_key, true)?;
            let url = self.url()?;
            self.send(Method::Post, &url, &body).await?;
            self.model.clear_href();
            self.model.mark_loaded();
            Ok(())
        })
        .await
    }

    /// PUT the full record with `changes` applied on top
    pub async fn update(&self, changes: Map<String, Value>) -> AtlasResult<()> {
        let bus = self.bus();
        evented(&bus, self, EventKind::Update, async {
            let mut body = match self.to_dict().await? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            body.extend(changes);
            let url = self.url()?;
            self.send(Method::Put, &url, &Value::Object(body)).await
        })
        .await
    }

    /// PUT only `changes`
    pub async fn partial_update(&self, changes: Map<String, Value>) -> AtlasResult<()> {
        let bus = self.bus();
        evented(&bus, self, EventKind::PartialUpdate, async {
            let mut url = self.url()?;
            if R::PARTIAL_PATH {
                url.push_str("/partial");
            }
            self.send(Method::Put, &url, &Value::Object(changes)).await
        })
        .await
    }

    pub async fn delete(&self) -> AtlasResult<()> {
        self.model.delete(QueryParams::new()).await
    }

    pub async fn refresh(&self) -> AtlasResult<()> {
        self.model.refresh().await
    }

    pub async fn wait(&self, interval: Option<Duration>, timeout: Option<Duration>) -> AtlasResult<()> {
        self.model.wait(interval, timeout).await
    }
}

impl<R: Resource> Evented for TypedModel<R> {
    fn type_name(&self) -> &'static str {
        self.model.type_name()
    }

    fn ancestors(&self) -> &'static [&'static str] {
        self.model.spec().ancestors
    }
}

impl<R: Resource> fmt::Debug for TypedModel<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedModel").field(&self.model).finish()
    }
}

/// A [`QueryableCollection`] of [`TypedModel`]s
pub struct TypedCollection<R: Resource> {
    collection: QueryableCollection,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for TypedCollection<R> {
    fn clone(&self) -> Self {
        Self::from_collection(self.collection.clone())
    }
}

impl<R: Resource> TypedCollection<R> {
    /// Root collection at `<api>/<spec path>`
    pub fn new(client: AtlasClient) -> Self {
        Self::from_collection(QueryableCollection::new(client, R::spec()))
    }

    /// Collection listed from `path`; members keep their canonical URLs
    pub fn at_path(client: AtlasClient, path: impl Into<String>) -> Self {
        Self::from_collection(QueryableCollection::at_path(client, R::spec(), path))
    }

    pub fn from_collection(collection: QueryableCollection) -> Self {
        Self {
            collection,
            _resource: PhantomData,
        }
    }

    pub fn collection(&self) -> &QueryableCollection {
        &self.collection
    }

    pub fn client(&self) -> &AtlasClient {
        self.collection.client()
    }

    pub fn url(&self) -> AtlasResult<String> {
        self.collection.url()
    }

    /// The member with `identifier`, fetched on first read
    pub fn get(&self, identifier: impl fmt::Display) -> TypedModel<R> {
        TypedModel::from_model(self.collection.get(identifier))
    }

    pub fn set_items(&self, items: Vec<Value>) -> &Self {
        self.collection.set_items(items);
        self
    }

    pub fn filter<K, I>(&self, filters: I) -> &Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.collection.filter(filters);
        self
    }

    pub async fn inflate(&self) -> AtlasResult<()> {
        self.collection.inflate().await
    }

    pub async fn refresh(&self) -> AtlasResult<()> {
        self.collection.refresh().await
    }

    pub async fn models(&self) -> AtlasResult<Vec<TypedModel<R>>> {
        Ok(self
            .collection
            .models()
            .await?
            .into_iter()
            .map(TypedModel::from_model)
            .collect())
    }

    /// Member records as listed, without fetching each member
    pub async fn records(&self) -> AtlasResult<Vec<R::Schema>> {
        self.collection
            .models()
            .await?
            .into_iter()
            .map(|model| R::Schema::from_value(Value::Object(model.data())))
            .collect()
    }

    pub async fn len(&self) -> AtlasResult<usize> {
        self.collection.len().await
    }

    pub async fn is_empty(&self) -> AtlasResult<bool> {
        self.collection.is_empty().await
    }

    /// POST a new member built from `record`
    pub async fn create(&self, record: &R::Schema) -> AtlasResult<TypedModel<R>> {
        let href = self.collection.url()?;
        info!("Adding a new {} at {}", R::spec().type_name, href);
        let model = TypedModel::from_model(self.collection.model(Some(href), Map::new()));
        model.create(record).await?;
        self.collection.push(model.model().clone());
        Ok(model)
    }

    pub async fn wait(&self, interval: Option<Duration>, timeout: Option<Duration>) -> AtlasResult<()> {
        self.collection.wait(interval, timeout).await
    }
}

impl<R: Resource> Evented for TypedCollection<R> {
    fn type_name(&self) -> &'static str {
        self.collection.type_name()
    }

    fn ancestors(&self) -> &'static [&'static str] {
        self.collection.ancestors()
    }
}

impl<R: Resource> fmt::Debug for TypedCollection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedCollection")
            .field(&self.collection)
            .finish()
    }
}

/// Generates async getters on `TypedModel<Resource>` for declared fields.
///
/// ```ignore
/// field_accessors!(Glossary {
///     name: String => "name",
/// });
/// ```
macro_rules! field_accessors {
    ($resource:ty { $($method:ident: $ty:ty => $field:literal),* $(,)? }) => {
        impl $crate::typed::TypedModel<$resource> {
            $(
                #[doc = concat!("`", $field, "`, fetched on first access")]
                pub async fn $method(&self) -> $crate::error::AtlasResult<Option<$ty>> {
                    self.get($field).await
                }
            )*
        }
    };
}

pub(crate) use field_accessors;
