//! Typed records for Atlas payloads
//!
//! Field names follow the REST API's camelCase JSON. Every field is
//! optional so partial server responses always deserialize.

pub mod common;
pub mod glossary;

use crate::error::AtlasResult;
use crate::response::is_truthy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub use common::{
    AtlasObjectId, AtlasRelatedCategoryHeader, AtlasRelatedObjectId, AtlasRelatedTermHeader,
    AtlasStruct, AtlasTermCategorizationHeader, Status,
};
pub use glossary::{
    AtlasGlossary, AtlasGlossaryCategory, AtlasGlossaryExtInfo, AtlasGlossaryHeader,
    AtlasGlossaryTerm,
};

/// A serde record that can be sent to Atlas.
pub trait Schema: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static {
    /// Type name used in error messages
    const NAME: &'static str;

    /// Request body for this record.
    ///
    /// With `ignore_falsy`, nulls, empty strings, empty lists, `false` and
    /// zero are dropped. Nested objects are cleaned recursively but always
    /// kept. With a `data_key` the result is wrapped as `{data_key: ...}`.
    fn to_dict(&self, data_key: Option<&str>, ignore_falsy: bool) -> AtlasResult<Value> {
        let items = match serde_json::to_value(self)? {
            Value::Object(map) => Value::Object(clean(map, ignore_falsy)),
            other => other,
        };

        Ok(match data_key {
            Some(key) => {
                let mut wrapped = Map::new();
                wrapped.insert(key.to_string(), items);
                Value::Object(wrapped)
            }
            None => items,
        })
    }

    fn from_value(value: Value) -> AtlasResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

fn clean(map: Map<String, Value>, ignore_falsy: bool) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Object(nested) => Some((key, Value::Object(clean(nested, ignore_falsy)))),
            value if !ignore_falsy || is_truthy(&value) => Some((key, value)),
            _ => None,
        })
        .collect()
}

macro_rules! schema {
    ($($record:ident),* $(,)?) => {
        $(
            impl Schema for $record {
                const NAME: &'static str = stringify!($record);
            }
        )*
    };
}

schema!(
    AtlasStruct,
    AtlasObjectId,
    AtlasRelatedCategoryHeader,
    AtlasRelatedTermHeader,
    AtlasRelatedObjectId,
    AtlasTermCategorizationHeader,
    AtlasGlossaryHeader,
    AtlasGlossary,
    AtlasGlossaryCategory,
    AtlasGlossaryTerm,
    AtlasGlossaryExtInfo,
);
