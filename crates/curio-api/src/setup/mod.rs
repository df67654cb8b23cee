//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use curio_core::{Config, ItemStoreKind};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment(),
        item_store = ?config.item_store,
        "Configuration loaded and validated successfully"
    );

    let pool = match config.item_store {
        ItemStoreKind::Postgres => Some(database::setup_database(&config).await?),
        ItemStoreKind::Memory => None,
    };
    let store = curio_db::create_item_store(&config, pool)?;

    let backend = storage::setup_media_backend(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), store, backend));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
