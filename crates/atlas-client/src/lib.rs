//! # atlas-client
//!
//! Object models over the Apache Atlas REST API.
//!
//! ## Features
//!
//! - Lazily loaded models and collections: nothing is fetched until a read needs it
//! - Typed glossary, category and term resources with bulk endpoints
//! - Polling for long-running server operations
//! - Lifecycle events published per resource type
//! - Pluggable transport, `reqwest` by default
//!
//! ```no_run
//! # async fn example() -> atlas_client::AtlasResult<()> {
//! use atlas_client::{AtlasClient, ClientConfig};
//!
//! let client = AtlasClient::new(ClientConfig::new("http://localhost:21000"))?;
//! let term = client.glossary_terms().get("2a3b...");
//! println!("{:?}", term.name().await?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod collection;
pub mod config;
pub mod error;
pub mod events;
pub mod glossary;
pub mod model;
pub mod pollable;
pub mod response;
pub mod schema;
pub mod transport;
pub mod typed;
pub mod version;

#[cfg(feature = "subscriber")]
pub mod logging;

pub use client::AtlasClient;
pub use collection::{BulkCollection, DependentCollection, QueryableCollection, RelatedCollection};
pub use config::{ClientConfig, ConfigError};
pub use error::{AtlasError, AtlasResult};
pub use events::{Event, EventBus, EventCallback, EventKind, EventState, Evented};
pub use glossary::{
    Glossary, GlossaryCategories, GlossaryCategory, GlossaryTerm, GlossaryTerms,
    RelatedCategoryHeader, RelatedObject, RelatedTermHeader,
};
pub use model::{
    DependentModel, LoadState, ModelKind, ModelSpec, PollSpec, QueryableModel, Relationship,
    RequestSpec, WeakModel,
};
pub use pollable::{PendingRequest, Pollable};
pub use schema::Schema;
pub use transport::{HttpTransport, Method, QueryParams, Transport};
pub use typed::{Resource, TypedCollection, TypedModel};
pub use version::ApiVersion;

#[cfg(feature = "subscriber")]
pub use logging::{init_logging, LoggingConfig};
