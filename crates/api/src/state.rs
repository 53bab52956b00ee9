use std::sync::Arc;

use databridge_db::MemoryStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Process-lifetime entity collections.
    pub store: Arc<MemoryStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            config: Arc::new(config),
        }
    }
}
