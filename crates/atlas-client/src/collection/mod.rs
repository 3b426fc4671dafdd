//! Collections of models

pub mod bulk;
pub mod dependent;
pub mod filter;
pub mod queryable;

pub use bulk::BulkCollection;
pub use dependent::DependentCollection;
pub use queryable::QueryableCollection;

/// The collection behind a relationship
#[derive(Debug, Clone)]
pub enum RelatedCollection {
    Queryable(QueryableCollection),
    Dependent(DependentCollection),
}

impl RelatedCollection {
    pub fn as_queryable(&self) -> Option<&QueryableCollection> {
        match self {
            RelatedCollection::Queryable(collection) => Some(collection),
            RelatedCollection::Dependent(_) => None,
        }
    }

    pub fn as_dependent(&self) -> Option<&DependentCollection> {
        match self {
            RelatedCollection::Dependent(collection) => Some(collection),
            RelatedCollection::Queryable(_) => None,
        }
    }

    /// Whether both handles point at the same cached collection
    pub fn ptr_eq(&self, other: &RelatedCollection) -> bool {
        match (self, other) {
            (RelatedCollection::Queryable(left), RelatedCollection::Queryable(right)) => {
                left.ptr_eq(right)
            }
            (RelatedCollection::Dependent(left), RelatedCollection::Dependent(right)) => {
                left.ptr_eq(right)
            }
            _ => false,
        }
    }
}
