//! Application state for the web server.

use std::sync::Arc;

use crate::filters::Catalog;
use crate::session::SessionManager;
use crate::store::Store;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub sessions: Arc<dyn SessionManager>,
    /// Upper bound for the similar-properties endpoint.
    pub similar_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<Store>, sessions: Arc<dyn SessionManager>, similar_limit: usize) -> Self {
        Self {
            store,
            sessions,
            similar_limit,
        }
    }

    /// Fresh catalog over the current properties
    pub async fn catalog(&self) -> Catalog {
        Catalog::new(self.store.properties().await)
    }
}
