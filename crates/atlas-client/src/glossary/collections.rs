//! Listing endpoints hanging off glossaries, categories and terms
//!
//! Each fetch returns a new collection listed from the sub-resource path;
//! the collection it was called on is left untouched.

use super::{
    Glossary, GlossaryCategory, GlossaryTerm, GlossaryTerms, RelatedCategoryHeader,
    RelatedObject, RelatedTermHeader,
};
use crate::client::AtlasClient;
use crate::collection::BulkCollection;
use crate::error::AtlasResult;
use crate::events::{evented, EventKind, Evented};
use crate::typed::{Resource, TypedCollection, TypedModel};
use serde::Serialize;

async fn fetch<R: Resource>(
    source: &dyn Evented,
    client: &AtlasClient,
    kind: EventKind,
    path: String,
) -> AtlasResult<TypedCollection<R>> {
    let bus = client.events();
    evented(&bus, source, kind, async {
        let collection = TypedCollection::<R>::at_path(client.clone(), path);
        collection.inflate().await?;
        Ok(collection)
    })
    .await
}

fn assigned_entities_path(term_guid: &str) -> String {
    format!("glossary/terms/{}/assignedEntities", term_guid)
}

impl TypedCollection<Glossary> {
    /// `GET glossary/{guid}/categories`
    pub async fn fetch_categories(
        &self,
        glossary_guid: &str,
    ) -> AtlasResult<TypedCollection<GlossaryCategory>> {
        let path = format!("glossary/{}/categories", glossary_guid);
        fetch(self, self.client(), EventKind::FetchCategories, path).await
    }

    /// `GET glossary/{guid}/categories/headers`
    pub async fn fetch_categories_headers(
        &self,
        glossary_guid: &str,
    ) -> AtlasResult<TypedCollection<RelatedCategoryHeader>> {
        let path = format!("glossary/{}/categories/headers", glossary_guid);
        fetch(self, self.client(), EventKind::FetchCategoriesHeaders, path).await
    }

    /// `GET glossary/{guid}/terms`
    pub async fn fetch_terms(
        &self,
        glossary_guid: &str,
    ) -> AtlasResult<TypedCollection<GlossaryTerm>> {
        let path = format!("glossary/{}/terms", glossary_guid);
        fetch(self, self.client(), EventKind::FetchTerms, path).await
    }

    /// `GET glossary/{guid}/terms/headers`
    pub async fn fetch_terms_headers(
        &self,
        glossary_guid: &str,
    ) -> AtlasResult<TypedCollection<RelatedTermHeader>> {
        let path = format!("glossary/{}/terms/headers", glossary_guid);
        fetch(self, self.client(), EventKind::FetchTermsHeaders, path).await
    }
}

impl TypedCollection<GlossaryCategory> {
    /// Parent and child categories (`GET glossary/category/{guid}/related`)
    pub async fn fetch_related(
        &self,
        category_guid: &str,
    ) -> AtlasResult<TypedCollection<RelatedCategoryHeader>> {
        let path = format!("glossary/category/{}/related", category_guid);
        fetch(self, self.client(), EventKind::FetchRelated, path).await
    }

    /// `GET glossary/category/{guid}/terms`
    pub async fn fetch_terms(
        &self,
        category_guid: &str,
    ) -> AtlasResult<TypedCollection<RelatedTermHeader>> {
        let path = format!("glossary/category/{}/terms", category_guid);
        fetch(self, self.client(), EventKind::FetchTerms, path).await
    }
}

impl TypedCollection<GlossaryTerm> {
    /// Terms related to the term, all relation kinds merged
    /// (`GET glossary/terms/{guid}/related`)
    pub async fn fetch_related(
        &self,
        term_guid: &str,
    ) -> AtlasResult<TypedCollection<RelatedTermHeader>> {
        let path = format!("glossary/terms/{}/related", term_guid);
        fetch(self, self.client(), EventKind::FetchRelated, path).await
    }
}

impl BulkCollection<GlossaryTerms> {
    fn assignments(&self, term_guid: &str) -> BulkCollection<RelatedObject> {
        BulkCollection::at_path(self.client().clone(), assigned_entities_path(term_guid))
    }

    /// `GET glossary/terms/{guid}/assignedEntities`
    pub async fn fetch_assigned_entities(
        &self,
        term_guid: &str,
    ) -> AtlasResult<TypedCollection<RelatedObject>> {
        fetch(
            self,
            self.client(),
            EventKind::FetchAssignedEntities,
            assigned_entities_path(term_guid),
        )
        .await
    }

    /// Assign the term to a list of entity headers
    /// (`POST glossary/terms/{guid}/assignedEntities`)
    pub async fn assign_entities<T: Serialize + ?Sized>(
        &self,
        term_guid: &str,
        data: &T,
    ) -> AtlasResult<Vec<TypedModel<RelatedObject>>> {
        let bus = self.client().events();
        evented(&bus, self, EventKind::AssignEntities, async {
            self.assignments(term_guid).create(data).await
        })
        .await
    }

    /// `PUT glossary/terms/{guid}/assignedEntities`
    pub async fn update_assigned_entities<T: Serialize + ?Sized>(
        &self,
        term_guid: &str,
        data: &T,
    ) -> AtlasResult<Vec<TypedModel<RelatedObject>>> {
        let bus = self.client().events();
        evented(&bus, self, EventKind::UpdateAssignedEntities, async {
            self.assignments(term_guid).update(data).await
        })
        .await
    }

    /// Remove the term from a list of entity headers
    /// (`DELETE glossary/terms/{guid}/assignedEntities`)
    pub async fn delete_assigned_entities<T: Serialize + ?Sized>(
        &self,
        term_guid: &str,
        data: &T,
    ) -> AtlasResult<Vec<TypedModel<RelatedObject>>> {
        let bus = self.client().events();
        evented(&bus, self, EventKind::DeleteAssignedEntities, async {
            self.assignments(term_guid).delete(data).await
        })
        .await
    }
}
