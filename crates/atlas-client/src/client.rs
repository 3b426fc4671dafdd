//! Atlas client handle

use crate::collection::QueryableCollection;
use crate::config::ClientConfig;
use crate::error::AtlasResult;
use crate::events::EventBus;
use crate::model::spec::ModelSpec;
use crate::transport::{HttpTransport, Transport};
use crate::version::ApiVersion;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Shared handle to one Atlas server.
///
/// Cloning is cheap; every model and collection keeps a clone.
#[derive(Clone)]
pub struct AtlasClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    events: Arc<EventBus>,
}

impl AtlasClient {
    /// Create a client talking HTTP through reqwest
    pub fn new(config: ClientConfig) -> AtlasResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client from `ATLAS_*` environment variables
    pub fn from_env() -> AtlasResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> AtlasResult<Self> {
        config.validate()?;
        debug!(
            "Atlas client for {} (server version {})",
            config.base_url, config.version
        );
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                events: EventBus::global(),
            }),
        })
    }

    /// Publish lifecycle events on `events` instead of the process-wide bus
    pub fn with_event_bus(self, events: Arc<EventBus>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config: self.inner.config.clone(),
                transport: self.inner.transport.clone(),
                events,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn version(&self) -> ApiVersion {
        self.inner.config.version
    }

    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    pub fn events(&self) -> Arc<EventBus> {
        self.inner.events.clone()
    }

    /// `<base>/api/atlas/v2`
    pub fn api_url(&self) -> String {
        self.inner.config.api_url()
    }

    /// `<base>/api/atlas/admin`
    pub fn admin_url(&self) -> String {
        self.inner.config.admin_url()
    }

    /// Root collection for any resource spec
    pub fn collection(&self, spec: &'static ModelSpec) -> QueryableCollection {
        QueryableCollection::new(self.clone(), spec)
    }
}

impl fmt::Debug for AtlasClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtlasClient")
            .field("base_url", &self.inner.config.base_url)
            .field("version", &self.inner.config.version)
            .finish()
    }
}
