//! Response classification
//!
//! Atlas answers with a bare list, a map of items, or a single resource
//! wrapped under the resource's data key with related collections and an
//! optional async-request descriptor next to it.

use crate::model::spec::{ModelSpec, Relationship};
use serde_json::{Map, Value};

/// Python-style truthiness used for pre-caching and falsy filtering
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Split a collection response into item values plus the pending request
/// descriptor stored under `request_key`, if any.
///
/// Map values that are themselves lists (related-term maps keyed by
/// relation name) contribute each of their elements.
pub fn collection_items(response: Value, request_key: Option<&str>) -> (Vec<Value>, Option<Value>) {
    match response {
        Value::Array(items) => (items, None),
        Value::Object(mut map) => {
            let request = request_key
                .and_then(|key| map.remove(key))
                .filter(is_truthy);

            let mut items = Vec::with_capacity(map.len());
            for (_, value) in map {
                match value {
                    Value::Array(nested) => items.extend(nested),
                    other => items.push(other),
                }
            }
            (items, request)
        }
        _ => (Vec::new(), None),
    }
}

/// A single-resource response taken apart
#[derive(Debug, Default)]
pub struct Envelope {
    pub href: Option<String>,
    pub fields: Map<String, Value>,
    /// Truthy related collections that came along with the resource
    pub relationships: Vec<(&'static Relationship, Value)>,
    pub request: Option<Value>,
}

pub fn parse_envelope(response: Value, spec: &ModelSpec) -> Envelope {
    let mut map = match response {
        Value::Object(map) => map,
        _ => return Envelope::default(),
    };

    let href = match map.remove("href") {
        Some(Value::String(href)) => Some(href),
        _ => None,
    };

    let request = spec
        .request
        .and_then(|request| map.remove(request.key))
        .filter(is_truthy);

    let enveloped = spec
        .data_key
        .and_then(|key| map.remove(key))
        .and_then(|value| match value {
            Value::Object(fields) => Some(fields),
            _ => None,
        });

    match enveloped {
        Some(fields) => {
            let relationships = spec
                .relationships
                .iter()
                .filter_map(|rel| match map.remove(rel.name) {
                    Some(value) if is_truthy(&value) => Some((rel, value)),
                    _ => None,
                })
                .collect();

            Envelope {
                href,
                fields,
                relationships,
                request,
            }
        }
        None => Envelope {
            href,
            fields: map,
            relationships: Vec::new(),
            request,
        },
    }
}
