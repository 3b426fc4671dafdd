//! Glossary records
//!
//! See the Atlas REST reference for `AtlasGlossary`, `AtlasGlossaryCategory`,
//! `AtlasGlossaryTerm` and `AtlasGlossaryExtInfo`.

use crate::schema::common::{
    AtlasRelatedCategoryHeader, AtlasRelatedObjectId, AtlasRelatedTermHeader,
    AtlasTermCategorizationHeader,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasGlossaryHeader {
    pub display_text: Option<String>,
    pub glossary_guid: Option<String>,
    pub relation_guid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasGlossary {
    pub guid: Option<String>,
    pub name: Option<String>,
    pub qualified_name: Option<String>,
    pub long_description: Option<String>,
    pub short_description: Option<String>,
    pub additional_attributes: Option<Map<String, Value>>,
    pub classifications: Option<Vec<Value>>,
    pub language: Option<String>,
    pub usage: Option<String>,
    pub terms: Option<Vec<AtlasRelatedTermHeader>>,
    pub categories: Option<Vec<AtlasRelatedCategoryHeader>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasGlossaryCategory {
    pub guid: Option<String>,
    pub name: Option<String>,
    pub qualified_name: Option<String>,
    pub long_description: Option<String>,
    pub short_description: Option<String>,
    pub additional_attributes: Option<Map<String, Value>>,
    pub classifications: Option<Vec<Value>>,
    /// Glossary the category belongs to; required on creation
    pub anchor: Option<AtlasGlossaryHeader>,
    pub terms: Option<Vec<AtlasRelatedTermHeader>>,
    pub children_categories: Option<Vec<AtlasRelatedCategoryHeader>>,
    pub parent_category: Option<AtlasRelatedCategoryHeader>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasGlossaryTerm {
    pub guid: Option<String>,
    pub name: Option<String>,
    pub qualified_name: Option<String>,
    pub long_description: Option<String>,
    pub short_description: Option<String>,
    pub additional_attributes: Option<Map<String, Value>>,
    pub classifications: Option<Vec<Value>>,
    pub abbreviation: Option<String>,
    /// Glossary the term belongs to; required on creation
    pub anchor: Option<AtlasGlossaryHeader>,
    pub antonyms: Option<Vec<AtlasRelatedTermHeader>>,
    pub assigned_entities: Option<Vec<AtlasRelatedObjectId>>,
    pub categories: Option<Vec<AtlasTermCategorizationHeader>>,
    pub classifies: Option<Vec<AtlasRelatedTermHeader>>,
    pub examples: Option<Vec<String>>,
    pub is_a: Option<Vec<AtlasRelatedTermHeader>>,
    pub preferred_terms: Option<Vec<AtlasRelatedTermHeader>>,
    pub preferred_to_terms: Option<Vec<AtlasRelatedTermHeader>>,
    pub replaced_by: Option<Vec<AtlasRelatedTermHeader>>,
    pub replacement_terms: Option<Vec<AtlasRelatedTermHeader>>,
    pub see_also: Option<Vec<AtlasRelatedTermHeader>>,
    pub synonyms: Option<Vec<AtlasRelatedTermHeader>>,
    pub translated_terms: Option<Vec<AtlasRelatedTermHeader>>,
    pub translation_terms: Option<Vec<AtlasRelatedTermHeader>>,
    pub usage: Option<String>,
    pub valid_values: Option<Vec<AtlasRelatedTermHeader>>,
    pub valid_values_for: Option<Vec<AtlasRelatedTermHeader>>,
}

/// A glossary with its categories and terms inlined, keyed by guid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtlasGlossaryExtInfo {
    #[serde(flatten)]
    pub glossary: AtlasGlossary,
    pub category_info: Option<BTreeMap<String, AtlasGlossaryCategory>>,
    pub term_info: Option<BTreeMap<String, AtlasGlossaryTerm>>,
}
