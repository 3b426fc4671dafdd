/// Inflation state of a model
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    /// A fetch is in flight; other handles wait for it
    Loading,
    Loaded,
    /// The implicit fetch failed and the local data stands in for the
    /// server's. Not retried until an explicit refresh.
    Failed { reason: String },
}

impl LoadState {
    /// Whether field reads may be served from local data
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}
