//! Models over Atlas resources

pub mod dependent;
pub mod queryable;
pub mod spec;
pub mod state;

pub use dependent::DependentModel;
pub use queryable::{QueryableModel, WeakModel};
pub use spec::{ModelKind, ModelSpec, PollSpec, Relationship, RequestSpec};
pub use state::LoadState;
