use super::{
    Glossary, GlossaryCategory, GlossaryTerm, RelatedCategoryHeader, RelatedObject,
    RelatedTermHeader,
};
use crate::error::AtlasResult;
use crate::events::{evented, EventKind};
use crate::schema::{
    AtlasGlossaryExtInfo, AtlasGlossaryHeader, AtlasRelatedCategoryHeader, AtlasRelatedObjectId,
    AtlasRelatedTermHeader, AtlasStruct, AtlasTermCategorizationHeader, Schema,
};
use crate::typed::{field_accessors, TypedModel};
use serde_json::{Map, Value};
use tracing::debug;

impl TypedModel<Glossary> {
    /// The glossary with its terms and categories inlined
    /// (`GET glossary/{guid}/detailed`)
    pub async fn detailed(&self) -> AtlasResult<AtlasGlossaryExtInfo> {
        let bus = self.model().client().events();
        evented(&bus, self, EventKind::Detailed, async {
            let url = format!("{}/detailed", self.url()?);
            debug!("Fetching detailed glossary from {}", url);
            let response = self.model().client().transport().get(&url, &[]).await?;
            self.model().load(response.clone());
            AtlasGlossaryExtInfo::from_value(response)
        })
        .await
    }
}

field_accessors!(Glossary {
    guid: String => "guid",
    name: String => "name",
    qualified_name: String => "qualifiedName",
    long_description: String => "longDescription",
    short_description: String => "shortDescription",
    additional_attributes: Map<String, Value> => "additionalAttributes",
    classifications: Vec<Value> => "classifications",
    language: String => "language",
    usage: String => "usage",
    terms: Vec<AtlasRelatedTermHeader> => "terms",
    categories: Vec<AtlasRelatedCategoryHeader> => "categories",
});

field_accessors!(GlossaryCategory {
    guid: String => "guid",
    name: String => "name",
    qualified_name: String => "qualifiedName",
    long_description: String => "longDescription",
    short_description: String => "shortDescription",
    additional_attributes: Map<String, Value> => "additionalAttributes",
    classifications: Vec<Value> => "classifications",
    anchor: AtlasGlossaryHeader => "anchor",
    terms: Vec<AtlasRelatedTermHeader> => "terms",
    children_categories: Vec<AtlasRelatedCategoryHeader> => "childrenCategories",
    parent_category: AtlasRelatedCategoryHeader => "parentCategory",
});

field_accessors!(GlossaryTerm {
    guid: String => "guid",
    name: String => "name",
    qualified_name: String => "qualifiedName",
    long_description: String => "longDescription",
    short_description: String => "shortDescription",
    additional_attributes: Map<String, Value> => "additionalAttributes",
    classifications: Vec<Value> => "classifications",
    abbreviation: String => "abbreviation",
    anchor: AtlasGlossaryHeader => "anchor",
    antonyms: Vec<AtlasRelatedTermHeader> => "antonyms",
    assigned_entities: Vec<AtlasRelatedObjectId> => "assignedEntities",
    categories: Vec<AtlasTermCategorizationHeader> => "categories",
    classifies: Vec<AtlasRelatedTermHeader> => "classifies",
    examples: Vec<String> => "examples",
    is_a: Vec<AtlasRelatedTermHeader> => "isA",
    preferred_terms: Vec<AtlasRelatedTermHeader> => "preferredTerms",
    preferred_to_terms: Vec<AtlasRelatedTermHeader> => "preferredToTerms",
    replaced_by: Vec<AtlasRelatedTermHeader> => "replacedBy",
    replacement_terms: Vec<AtlasRelatedTermHeader> => "replacementTerms",
    see_also: Vec<AtlasRelatedTermHeader> => "seeAlso",
    synonyms: Vec<AtlasRelatedTermHeader> => "synonyms",
    translated_terms: Vec<AtlasRelatedTermHeader> => "translatedTerms",
    translation_terms: Vec<AtlasRelatedTermHeader> => "translationTerms",
    usage: String => "usage",
    valid_values: Vec<AtlasRelatedTermHeader> => "validValues",
    valid_values_for: Vec<AtlasRelatedTermHeader> => "validValuesFor",
});

field_accessors!(RelatedTermHeader {
    term_guid: String => "termGuid",
    status: String => "status",
    description: String => "description",
    display_text: String => "displayText",
    expression: String => "expression",
    relation_guid: String => "relationGuid",
    source: String => "source",
});

field_accessors!(RelatedCategoryHeader {
    category_guid: String => "categoryGuid",
    description: String => "description",
    display_text: String => "displayText",
    parent_category_guid: String => "parentCategoryGuid",
    relation_guid: String => "relationGuid",
});

field_accessors!(RelatedObject {
    guid: String => "guid",
    entity_type: String => "typeName",
    unique_attributes: Map<String, Value> => "uniqueAttributes",
    display_text: String => "displayText",
    entity_status: String => "entityStatus",
    relationship_attributes: AtlasStruct => "relationshipAttributes",
    relationship_guid: String => "relationshipGuid",
    relationship_status: String => "relationshipStatus",
    relationship_type: String => "relationshipType",
});
