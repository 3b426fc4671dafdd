use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entity and relationship status values
pub struct Status;

impl Status {
    pub const ACTIVE: &'static str = "ACTIVE";
    pub const DELETED: &'static str = "DELETED";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasStruct {
    pub attributes: Option<Map<String, Value>>,
    pub type_name: Option<String>,
}

/// Reference to an entity instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasObjectId {
    pub guid: Option<String>,
    pub type_name: Option<String>,
    pub unique_attributes: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasRelatedCategoryHeader {
    pub category_guid: Option<String>,
    pub description: Option<String>,
    pub display_text: Option<String>,
    pub parent_category_guid: Option<String>,
    pub relation_guid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasRelatedTermHeader {
    pub term_guid: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub display_text: Option<String>,
    pub expression: Option<String>,
    pub relation_guid: Option<String>,
    pub source: Option<String>,
}

/// An entity reached through a relationship, e.g. one a term is assigned to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasRelatedObjectId {
    pub guid: Option<String>,
    pub type_name: Option<String>,
    pub unique_attributes: Option<Map<String, Value>>,
    pub display_text: Option<String>,
    pub entity_status: Option<String>,
    pub relationship_attributes: Option<AtlasStruct>,
    pub relationship_guid: Option<String>,
    pub relationship_status: Option<String>,
    pub relationship_type: Option<String>,
}

impl AtlasRelatedObjectId {
    /// Both the entity and the relationship are active
    pub fn is_active_relation(&self) -> bool {
        self.entity_status.as_deref() == Some(Status::ACTIVE)
            && self.relationship_status.as_deref() == Some(Status::ACTIVE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasTermCategorizationHeader {
    pub category_guid: Option<String>,
    pub description: Option<String>,
    pub display_text: Option<String>,
    pub relation_guid: Option<String>,
    pub status: Option<String>,
}
