use crate::error::{AtlasError, AtlasResult};
use crate::model::queryable::identifier_of;
use crate::model::spec::ModelSpec;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A model embedded in its parent's response. It has no URL and is never
/// fetched; what the parent delivered is all it holds.
#[derive(Debug, Clone)]
pub struct DependentModel {
    spec: &'static ModelSpec,
    data: Arc<Map<String, Value>>,
}

impl DependentModel {
    pub fn new(spec: &'static ModelSpec, data: Map<String, Value>) -> Self {
        Self {
            spec,
            data: Arc::new(spec.filter_fields(data)),
        }
    }

    pub fn spec(&self) -> &'static ModelSpec {
        self.spec
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn field(&self, name: &str) -> AtlasResult<Option<&Value>> {
        if !self.spec.fields.is_empty() && !self.spec.has_field(name) {
            return Err(AtlasError::UnknownField {
                type_name: self.spec.type_name,
                field: name.to_string(),
            });
        }
        Ok(self.data.get(name))
    }

    pub fn identifier(&self) -> Option<String> {
        identifier_of(&self.data, self.spec.primary_key?)
    }

    pub fn to_dict(&self) -> Map<String, Value> {
        self.data.as_ref().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static CLASSIFICATION: ModelSpec = ModelSpec::dependent("Classification")
        .primary_key("typeName")
        .fields(&["typeName", "attributes"]);

    #[test]
    fn keeps_declared_fields_only() {
        let data = json!({"typeName": "PII", "attributes": {}, "entityGuid": "e1"});
        let model = DependentModel::new(&CLASSIFICATION, data.as_object().unwrap().clone());

        assert_eq!(model.identifier().as_deref(), Some("PII"));
        assert_eq!(model.field("attributes").unwrap(), Some(&json!({})));
        assert!(model.field("entityGuid").is_err());
        assert_eq!(model.to_dict().len(), 2);
    }
}
