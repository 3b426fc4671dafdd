//! Query filter encoding

use crate::transport::QueryParams;
use serde_json::Value;
use std::collections::BTreeMap;

/// Strings go out verbatim, everything else as JSON text.
pub fn encode_filter_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Turn the stored filter map into request parameters.
///
/// A value holding a JSON list becomes one parameter per element
/// (`guid=a&guid=b`). Values containing `[` that are not lists, such as DSL
/// query text, are sent unchanged.
pub fn expand_filters(filters: &BTreeMap<String, String>) -> QueryParams {
    let mut params = Vec::with_capacity(filters.len());
    for (key, value) in filters {
        if value.contains('[') {
            if let Ok(items) = serde_json::from_str::<Vec<Value>>(value) {
                params.extend(items.iter().map(|item| (key.clone(), encode_filter_value(item))));
                continue;
            }
        }
        params.push((key.clone(), value.clone()));
    }
    params
}
