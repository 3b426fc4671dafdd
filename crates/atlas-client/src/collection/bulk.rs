//! Bulk create/update/delete in a single request

use crate::client::AtlasClient;
use crate::collection::QueryableCollection;
use crate::error::{AtlasError, AtlasResult};
use crate::events::Evented;
use crate::schema::Schema;
use crate::transport::Method;
use crate::typed::{Resource, TypedModel};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Collection endpoint accepting lists of `R::Schema` records.
pub struct BulkCollection<R: Resource> {
    collection: QueryableCollection,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for BulkCollection<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> BulkCollection<R> {
    pub fn new(client: AtlasClient) -> Self {
        Self::from_collection(QueryableCollection::new(client, R::spec()))
    }

    pub fn at_path(client: AtlasClient, path: impl Into<String>) -> Self {
        Self::from_collection(QueryableCollection::at_path(client, R::spec(), path))
    }

    fn from_collection(collection: QueryableCollection) -> Self {
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

    /// POST every record in `data`, which must serialize to a JSON list
    pub async fn create<T: Serialize + ?Sized>(&self, data: &T) -> AtlasResult<Vec<TypedModel<R>>> {
        self.send(Method::Post, data).await
    }

    /// PUT every record in `data`, which must serialize to a JSON list
    pub async fn update<T: Serialize + ?Sized>(&self, data: &T) -> AtlasResult<Vec<TypedModel<R>>> {
        self.send(Method::Put, data).await
    }

    /// DELETE with every record in `data` as the body
    pub async fn delete<T: Serialize + ?Sized>(&self, data: &T) -> AtlasResult<Vec<TypedModel<R>>> {
        self.send(Method::Delete, data).await
    }

    /// Each item is read as `R::Schema` and re-serialized without empty values.
    fn prepare<T: Serialize + ?Sized>(&self, method: Method, data: &T) -> AtlasResult<Value> {
        let Value::Array(items) = serde_json::to_value(data)? else {
            return Err(AtlasError::bad_request(
                self.collection.path(),
                method.as_str(),
                format!("Data should be a list of \"{}\"", <R::Schema as Schema>::NAME),
            ));
        };

        let data_key = R::spec().data_key;
        items
            .into_iter()
            .map(|item| R::Schema::from_value(item)?.to_dict(data_key, true))
            .collect::<AtlasResult<Vec<_>>>()
            .map(Value::Array)
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        data: &T,
    ) -> AtlasResult<Vec<TypedModel<R>>> {
        let body = self.prepare(method, data)?;
        let url = self.collection.url()?;
        debug!(
            "Bulk {} of {} at {}",
            method,
            R::spec().type_name,
            url
        );

        let response = self
            .collection
            .client()
            .transport()
            .request(method, &url, &[], Some(&body))
            .await?;
        self.collection.load(response);

        Ok(self
            .collection
            .cached_models()
            .into_iter()
            .map(TypedModel::from_model)
            .collect())
    }
}

impl<R: Resource> Evented for BulkCollection<R> {
    fn type_name(&self) -> &'static str {
        self.collection.type_name()
    }

    fn ancestors(&self) -> &'static [&'static str] {
        self.collection.ancestors()
    }
}

impl<R: Resource> fmt::Debug for BulkCollection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BulkCollection")
            .field(&self.collection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::events::EventBus;
    use crate::model::ModelSpec;
    use crate::schema::AtlasRelatedTermHeader;
    use crate::transport::Transport;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    static LINKS: ModelSpec = ModelSpec::queryable("Link", "links").primary_key("termGuid");

    struct Link;

    impl Resource for Link {
        type Schema = AtlasRelatedTermHeader;

        fn spec() -> &'static ModelSpec {
            &LINKS
        }
    }

    #[derive(Default)]
    struct Echo {
        bodies: Mutex<Vec<(Method, Value)>>,
    }

    #[async_trait]
    impl Transport for Echo {
        async fn request(
            &self,
            method: Method,
            _url: &str,
            _params: &[(String, String)],
            data: Option<&Value>,
        ) -> AtlasResult<Value> {
            let body = data.cloned().unwrap_or(Value::Null);
            self.bodies.lock().unwrap().push((method, body.clone()));
            Ok(body)
        }
    }

    fn links(transport: Arc<Echo>) -> BulkCollection<Link> {
        let client = AtlasClient::with_transport(ClientConfig::new("http://atlas:21000"), transport)
            .unwrap()
            .with_event_bus(Arc::new(EventBus::new()));
        BulkCollection::new(client)
    }

    #[tokio::test]
    async fn rejects_non_list_before_sending() {
        let transport = Arc::new(Echo::default());
        let err = links(transport.clone())
            .update(&json!({"termGuid": "t1"}))
            .await
            .unwrap_err();

        match err {
            AtlasError::BadRequest {
                url,
                method,
                message,
            } => {
                assert_eq!(url, "links");
                assert_eq!(method, "PUT");
                assert_eq!(message, "Data should be a list of \"AtlasRelatedTermHeader\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(transport.bodies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sends_cleaned_records_in_one_request() {
        let transport = Arc::new(Echo::default());
        let models = links(transport.clone())
            .create(&json!([
                {"termGuid": "t1", "description": ""},
                {"termGuid": "t2", "unknownField": 3}
            ]))
            .await
            .unwrap();

        let bodies = transport.bodies.lock().unwrap().clone();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].0, Method::Post);
        assert_eq!(bodies[0].1, json!([{"termGuid": "t1"}, {"termGuid": "t2"}]));
        assert_eq!(models.len(), 2);
        assert_eq!(models[1].cached_identifier().as_deref(), Some("t2"));
    }
}
