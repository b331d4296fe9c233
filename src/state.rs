//! Shared application state passed to every handler via Axum's `State` extractor.

use std::sync::Arc;

use crate::config::Config;

/// Shared application state for the blocksig server.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup.
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
