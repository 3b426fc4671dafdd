//! Static resource descriptors
//!
//! Every Atlas resource is described once by a `ModelSpec` static. Models and
//! collections read their URL layout, declared fields and relationships from
//! it instead of from per-type code.

use crate::version::ApiVersion;
use serde_json::{Map, Value};
use std::fmt;

/// Whether a resource has its own URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Backed by a resource URL; lazily fetched
    Queryable,
    /// Only embedded in a parent's response; never fetched
    Dependent,
}

/// Declared mapping from an attribute name to the related resource
#[derive(Clone, Copy)]
pub struct Relationship {
    pub name: &'static str,
    pub spec: &'static ModelSpec,
}

impl fmt::Debug for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relationship")
            .field("name", &self.name)
            .field("spec", &self.spec.type_name)
            .finish()
    }
}

/// Response key carrying an asynchronous server-side operation
#[derive(Clone, Copy)]
pub struct RequestSpec {
    pub key: &'static str,
    pub spec: &'static ModelSpec,
}

impl fmt::Debug for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSpec")
            .field("key", &self.key)
            .field("spec", &self.spec.type_name)
            .finish()
    }
}

/// Status conditions for resources that can be polled
#[derive(Debug, Clone, Copy)]
pub struct PollSpec {
    pub status_field: &'static str,
    pub finished: &'static [&'static str],
    pub failed: &'static [&'static str],
}

impl PollSpec {
    fn status<'a>(&self, data: &'a Map<String, Value>) -> Option<&'a str> {
        data.get(self.status_field).and_then(Value::as_str)
    }

    pub fn is_finished(&self, data: &Map<String, Value>) -> bool {
        self.status(data)
            .map(|status| self.finished.contains(&status))
            .unwrap_or(false)
    }

    pub fn has_failed(&self, data: &Map<String, Value>) -> bool {
        self.status(data)
            .map(|status| self.failed.contains(&status))
            .unwrap_or(false)
    }
}

const QUERYABLE_ANCESTORS: &[&str] = &["QueryableModel", "Model"];
const DEPENDENT_ANCESTORS: &[&str] = &["DependentModel", "Model"];
const QUERYABLE_COLLECTION_ANCESTORS: &[&str] = &["QueryableModelCollection", "ModelCollection"];
const DEPENDENT_COLLECTION_ANCESTORS: &[&str] = &["DependentModelCollection", "ModelCollection"];

/// Descriptor of one Atlas resource type.
///
/// `ancestors` and `collection_ancestors` list type tags most specific
/// first and must start with `type_name` / `collection_type_name`; the event
/// bus walks them when resolving handlers.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub type_name: &'static str,
    pub ancestors: &'static [&'static str],
    pub collection_type_name: &'static str,
    pub collection_ancestors: &'static [&'static str],
    pub kind: ModelKind,
    /// Path segment under the API root (or under the parent's URL)
    pub path: &'static str,
    /// Canonical path of single items when it differs from `path`
    pub item_path: Option<&'static str>,
    pub primary_key: Option<&'static str>,
    /// Envelope key the resource's fields are nested under
    pub data_key: Option<&'static str>,
    /// Prefix filter keys with `<data_key>/`
    pub use_key_prefix: bool,
    pub admin_api: bool,
    pub fields: &'static [&'static str],
    pub relationships: &'static [Relationship],
    pub min_version: ApiVersion,
    pub request: Option<RequestSpec>,
    pub poll: Option<PollSpec>,
}

impl ModelSpec {
    pub const fn queryable(type_name: &'static str, path: &'static str) -> Self {
        Self {
            type_name,
            ancestors: QUERYABLE_ANCESTORS,
            collection_type_name: "QueryableModelCollection",
            collection_ancestors: QUERYABLE_COLLECTION_ANCESTORS,
            kind: ModelKind::Queryable,
            path,
            item_path: None,
            primary_key: None,
            data_key: None,
            use_key_prefix: false,
            admin_api: false,
            fields: &[],
            relationships: &[],
            min_version: ApiVersion::OLDEST_SUPPORTED,
            request: None,
            poll: None,
        }
    }

    pub const fn dependent(type_name: &'static str) -> Self {
        Self {
            ancestors: DEPENDENT_ANCESTORS,
            collection_type_name: "DependentModelCollection",
            collection_ancestors: DEPENDENT_COLLECTION_ANCESTORS,
            kind: ModelKind::Dependent,
            ..Self::queryable(type_name, "")
        }
    }

    pub const fn ancestors(self, ancestors: &'static [&'static str]) -> Self {
        Self { ancestors, ..self }
    }

    pub const fn collection(
        self,
        collection_type_name: &'static str,
        collection_ancestors: &'static [&'static str],
    ) -> Self {
        Self {
            collection_type_name,
            collection_ancestors,
            ..self
        }
    }

    pub const fn item_path(self, item_path: &'static str) -> Self {
        Self {
            item_path: Some(item_path),
            ..self
        }
    }

    pub const fn primary_key(self, primary_key: &'static str) -> Self {
        Self {
            primary_key: Some(primary_key),
            ..self
        }
    }

    pub const fn data_key(self, data_key: &'static str, use_key_prefix: bool) -> Self {
        Self {
            data_key: Some(data_key),
            use_key_prefix,
            ..self
        }
    }

    pub const fn admin(self) -> Self {
        Self {
            admin_api: true,
            ..self
        }
    }

    pub const fn fields(self, fields: &'static [&'static str]) -> Self {
        Self { fields, ..self }
    }

    pub const fn relationships(self, relationships: &'static [Relationship]) -> Self {
        Self {
            relationships,
            ..self
        }
    }

    pub const fn min_version(self, min_version: ApiVersion) -> Self {
        Self {
            min_version,
            ..self
        }
    }

    pub const fn request(self, key: &'static str, spec: &'static ModelSpec) -> Self {
        Self {
            request: Some(RequestSpec { key, spec }),
            ..self
        }
    }

    pub const fn poll(self, poll: PollSpec) -> Self {
        Self {
            poll: Some(poll),
            ..self
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(&name)
    }

    pub fn relationship(&self, name: &str) -> Option<&'static Relationship> {
        self.relationships.iter().find(|rel| rel.name == name)
    }

    /// Path under which single items live
    pub fn canonical_item_path(&self) -> &'static str {
        self.item_path.unwrap_or(self.path)
    }

    /// Keep only declared fields. Specs without declared fields keep everything.
    pub fn filter_fields(&self, data: Map<String, Value>) -> Map<String, Value> {
        if self.fields.is_empty() {
            return data;
        }
        data.into_iter()
            .filter(|(key, _)| self.has_field(key))
            .collect()
    }
}
