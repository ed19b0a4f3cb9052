//! homehome service - HTTP API for coins, gacha and rewards.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homehome_service::{create_router, AppState, ServiceConfig};
use homehome_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,homehome=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting homehome service");

    let mut config = ServiceConfig::from_env();
    config.load_economy()?;
    let catalog = config.load_catalog()?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        catalog_items = catalog.entries().len(),
        service_key_configured = %config.service_api_key.is_some(),
        "Service configuration loaded"
    );

    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    let state = AppState::new(store, catalog, config.clone());
    let app = create_router(state);

    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
