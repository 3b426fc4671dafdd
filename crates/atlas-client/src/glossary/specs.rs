//! URL layout of the glossary endpoints

use crate::model::ModelSpec;

const GLOSSARY_FIELDS: &[&str] = &[
    "guid",
    "name",
    "qualifiedName",
    "longDescription",
    "shortDescription",
    "additionalAttributes",
    "classifications",
    "language",
    "usage",
    "terms",
    "categories",
];

const CATEGORY_FIELDS: &[&str] = &[
    "guid",
    "name",
    "qualifiedName",
    "longDescription",
    "shortDescription",
    "additionalAttributes",
    "classifications",
    "anchor",
    "terms",
    "childrenCategories",
    "parentCategory",
];

const TERM_FIELDS: &[&str] = &[
    "guid",
    "name",
    "qualifiedName",
    "longDescription",
    "shortDescription",
    "additionalAttributes",
    "classifications",
    "abbreviation",
    "anchor",
    "antonyms",
    "assignedEntities",
    "categories",
    "classifies",
    "examples",
    "isA",
    "preferredTerms",
    "preferredToTerms",
    "replacedBy",
    "replacementTerms",
    "seeAlso",
    "synonyms",
    "translatedTerms",
    "translationTerms",
    "usage",
    "validValues",
    "validValuesFor",
];

const TERM_HEADER_FIELDS: &[&str] = &[
    "termGuid",
    "status",
    "description",
    "displayText",
    "expression",
    "relationGuid",
    "source",
];

const CATEGORY_HEADER_FIELDS: &[&str] = &[
    "categoryGuid",
    "description",
    "displayText",
    "parentCategoryGuid",
    "relationGuid",
];

const RELATED_OBJECT_FIELDS: &[&str] = &[
    "guid",
    "typeName",
    "uniqueAttributes",
    "displayText",
    "entityStatus",
    "relationshipAttributes",
    "relationshipGuid",
    "relationshipStatus",
    "relationshipType",
];

/// `glossary`, `glossary/{guid}`
pub static GLOSSARY: ModelSpec = ModelSpec::queryable("Glossary", "glossary")
    .ancestors(&["Glossary", "QueryableModelV2", "QueryableModel", "Model"])
    .collection(
        "GlossaryCollection",
        &["GlossaryCollection", "QueryableModelCollection", "ModelCollection"],
    )
    .primary_key("guid")
    .fields(GLOSSARY_FIELDS);

/// `glossary/category`, `glossary/category/{guid}`
pub static GLOSSARY_CATEGORY: ModelSpec =
    ModelSpec::queryable("GlossaryCategory", "glossary/category")
        .ancestors(&["GlossaryCategory", "QueryableModelV2", "QueryableModel", "Model"])
        .collection(
            "GlossaryCategoryCollection",
            &[
                "GlossaryCategoryCollection",
                "QueryableModelCollection",
                "ModelCollection",
            ],
        )
        .primary_key("guid")
        .fields(CATEGORY_FIELDS);

/// Bulk endpoint `glossary/categories`
pub static GLOSSARY_CATEGORIES: ModelSpec =
    ModelSpec::queryable("GlossaryCategories", "glossary/categories")
        .ancestors(&["GlossaryCategories", "QueryableModelV2", "QueryableModel", "Model"])
        .collection(
            "QueryableModelCollectionBulk",
            &[
                "QueryableModelCollectionBulk",
                "QueryableModelCollection",
                "ModelCollection",
            ],
        )
        .item_path("glossary/category")
        .primary_key("guid")
        .fields(CATEGORY_FIELDS);

/// `glossary/term`, `glossary/term/{guid}`
pub static GLOSSARY_TERM: ModelSpec = ModelSpec::queryable("GlossaryTerm", "glossary/term")
    .ancestors(&["GlossaryTerm", "QueryableModelV2", "QueryableModel", "Model"])
    .collection(
        "GlossaryTermCollection",
        &["GlossaryTermCollection", "QueryableModelCollection", "ModelCollection"],
    )
    .primary_key("guid")
    .fields(TERM_FIELDS);

/// Bulk endpoint `glossary/terms`
pub static GLOSSARY_TERMS: ModelSpec = ModelSpec::queryable("GlossaryTerms", "glossary/terms")
    .ancestors(&["GlossaryTerms", "QueryableModelV2", "QueryableModel", "Model"])
    .collection(
        "GlossaryTermsCollection",
        &[
            "GlossaryTermsCollection",
            "QueryableModelCollectionBulk",
            "QueryableModelCollection",
            "ModelCollection",
        ],
    )
    .item_path("glossary/term")
    .primary_key("guid")
    .fields(TERM_FIELDS);

/// Term header as listed under glossaries and categories; resolves to the term
pub static RELATED_TERM_HEADER: ModelSpec =
    ModelSpec::queryable("RelatedTermHeader", "glossary/term")
        .ancestors(&["RelatedTermHeader", "QueryableModelV2", "QueryableModel", "Model"])
        .primary_key("termGuid")
        .fields(TERM_HEADER_FIELDS);

/// Category header as listed under glossaries; resolves to the category
pub static RELATED_CATEGORY_HEADER: ModelSpec =
    ModelSpec::queryable("RelatedCategoryHeader", "glossary/category")
        .ancestors(&[
            "RelatedCategoryHeader",
            "QueryableModelV2",
            "QueryableModel",
            "Model",
        ])
        .primary_key("categoryGuid")
        .fields(CATEGORY_HEADER_FIELDS);

/// Entity a term is assigned to; resolves to `entity/guid/{guid}`
pub static RELATED_OBJECT: ModelSpec = ModelSpec::queryable("RelatedObject", "entity/guid")
    .ancestors(&["RelatedObject", "QueryableModelV2", "QueryableModel", "Model"])
    .primary_key("guid")
    .fields(RELATED_OBJECT_FIELDS);
