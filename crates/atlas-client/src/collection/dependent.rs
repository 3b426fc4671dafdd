use crate::error::{AtlasError, AtlasResult};
use crate::model::{DependentModel, ModelSpec};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

/// Collection of [`DependentModel`]s materialized from a parent response.
///
/// There is no lazy loading: what the parent delivered is all it holds.
/// Reloading the parent builds a new collection.
#[derive(Debug, Clone)]
pub struct DependentCollection {
    spec: &'static ModelSpec,
    state: Arc<Mutex<DependentState>>,
}

#[derive(Debug, Default)]
struct DependentState {
    models: Vec<DependentModel>,
    inflated: bool,
}

impl DependentCollection {
    pub fn new(spec: &'static ModelSpec) -> Self {
        Self {
            spec,
            state: Arc::new(Mutex::new(DependentState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, DependentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn spec(&self) -> &'static ModelSpec {
        self.spec
    }

    /// Replace the members with models built from `items`. Non-object items
    /// are skipped; an empty list leaves the members unchanged.
    pub fn set_items(&self, items: Vec<Value>) -> &Self {
        if items.is_empty() {
            return self;
        }

        debug!("Generating {} {} models", items.len(), self.spec.type_name);
        let models = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(DependentModel::new(self.spec, map)),
                _ => None,
            })
            .collect();
        self.state().models = models;
        self
    }

    /// The single member with `identifier`.
    ///
    /// `Ok(None)` when absent; an error when more than one member matches.
    pub fn find(&self, identifier: &str) -> AtlasResult<Option<DependentModel>> {
        let state = self.state();
        let mut matches = state
            .models
            .iter()
            .filter(|model| model.identifier().as_deref() == Some(identifier));

        let found = matches.next().cloned();
        if matches.next().is_some() {
            let message = format!(
                "More than one {} with {} '{}' found in collection",
                self.spec.type_name,
                self.spec.primary_key.unwrap_or("primary key"),
                identifier
            );
            error!("{}", message);
            return Err(AtlasError::client(message));
        }
        Ok(found)
    }

    pub fn inflate(&self) -> &Self {
        self.state().inflated = true;
        self
    }

    pub fn len(&self) -> usize {
        self.inflate();
        self.state().models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn models(&self) -> Vec<DependentModel> {
        self.inflate();
        self.state().models.clone()
    }

    /// Drop members sharing `model`'s identifier
    pub fn remove(&self, model: &DependentModel) {
        let identifier = model.identifier();
        self.state()
            .models
            .retain(|member| member.identifier() != identifier);
    }

    pub fn to_dict(&self) -> Vec<Map<String, Value>> {
        self.models().iter().map(DependentModel::to_dict).collect()
    }

    pub fn ptr_eq(&self, other: &DependentCollection) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
