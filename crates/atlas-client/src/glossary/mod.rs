//! Business glossary: glossaries, categories and terms
//!
//! ```no_run
//! # async fn example() -> atlas_client::AtlasResult<()> {
//! use atlas_client::{AtlasClient, ClientConfig};
//!
//! let client = AtlasClient::new(ClientConfig::new("http://localhost:21000"))?;
//! let glossaries = client.glossaries();
//! for glossary in glossaries.models().await? {
//!     println!("{:?}", glossary.name().await?);
//! }
//! # Ok(())
//! # }
//! ```

mod collections;
mod models;
pub mod specs;

use crate::client::AtlasClient;
use crate::collection::BulkCollection;
use crate::model::ModelSpec;
use crate::schema::{
    AtlasGlossary, AtlasGlossaryCategory, AtlasGlossaryTerm, AtlasRelatedCategoryHeader,
    AtlasRelatedObjectId, AtlasRelatedTermHeader,
};
use crate::typed::{Resource, TypedCollection};

pub use specs::{
    GLOSSARY, GLOSSARY_CATEGORIES, GLOSSARY_CATEGORY, GLOSSARY_TERM, GLOSSARY_TERMS,
    RELATED_CATEGORY_HEADER, RELATED_OBJECT, RELATED_TERM_HEADER,
};

/// `glossary/{guid}`
pub struct Glossary;

impl Resource for Glossary {
    type Schema = AtlasGlossary;

    fn spec() -> &'static ModelSpec {
        &GLOSSARY
    }

    const PARTIAL_PATH: bool = true;
}

/// `glossary/category/{guid}`
pub struct GlossaryCategory;

impl Resource for GlossaryCategory {
    type Schema = AtlasGlossaryCategory;

    fn spec() -> &'static ModelSpec {
        &GLOSSARY_CATEGORY
    }

    const PARTIAL_PATH: bool = true;
}

/// Bulk category creation at `glossary/categories`
pub struct GlossaryCategories;

impl Resource for GlossaryCategories {
    type Schema = AtlasGlossaryCategory;

    fn spec() -> &'static ModelSpec {
        &GLOSSARY_CATEGORIES
    }
}

/// `glossary/term/{guid}`
pub struct GlossaryTerm;

impl Resource for GlossaryTerm {
    type Schema = AtlasGlossaryTerm;

    fn spec() -> &'static ModelSpec {
        &GLOSSARY_TERM
    }

    const PARTIAL_PATH: bool = true;
}

/// Bulk term creation at `glossary/terms`
pub struct GlossaryTerms;

impl Resource for GlossaryTerms {
    type Schema = AtlasGlossaryTerm;

    fn spec() -> &'static ModelSpec {
        &GLOSSARY_TERMS
    }
}

pub struct RelatedTermHeader;

impl Resource for RelatedTermHeader {
    type Schema = AtlasRelatedTermHeader;

    fn spec() -> &'static ModelSpec {
        &RELATED_TERM_HEADER
    }
}

pub struct RelatedCategoryHeader;

impl Resource for RelatedCategoryHeader {
    type Schema = AtlasRelatedCategoryHeader;

    fn spec() -> &'static ModelSpec {
        &RELATED_CATEGORY_HEADER
    }
}

/// Entity header a term is assigned to
pub struct RelatedObject;

impl Resource for RelatedObject {
    type Schema = AtlasRelatedObjectId;

    fn spec() -> &'static ModelSpec {
        &RELATED_OBJECT
    }
}

impl AtlasClient {
    pub fn glossaries(&self) -> TypedCollection<Glossary> {
        TypedCollection::new(self.clone())
    }

    pub fn glossary_categories(&self) -> TypedCollection<GlossaryCategory> {
        TypedCollection::new(self.clone())
    }

    pub fn glossary_terms(&self) -> TypedCollection<GlossaryTerm> {
        TypedCollection::new(self.clone())
    }

    pub fn glossary_categories_bulk(&self) -> BulkCollection<GlossaryCategories> {
        BulkCollection::new(self.clone())
    }

    pub fn glossary_terms_bulk(&self) -> BulkCollection<GlossaryTerms> {
        BulkCollection::new(self.clone())
    }
}
