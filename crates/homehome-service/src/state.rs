//! Application state.

use std::sync::Arc;

use homehome_core::{EconomyConfig, ItemCatalog};
use homehome_store::RocksStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Read-only item catalog.
    pub catalog: Arc<ItemCatalog>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, catalog: ItemCatalog, config: ServiceConfig) -> Self {
        if config.service_api_key.is_none() {
            tracing::warn!("SERVICE_API_KEY not set - service endpoints will reject all calls");
        }

        Self {
            store,
            catalog: Arc::new(catalog),
            config,
        }
    }

    /// Economy tables in effect.
    #[must_use]
    pub fn economy(&self) -> &EconomyConfig {
        &self.config.economy
    }
}
