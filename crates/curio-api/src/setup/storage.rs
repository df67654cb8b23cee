//! Media backend setup

use anyhow::{Context, Result};
use curio_core::Config;
use curio_storage::{create_media_backend, MediaBackend};
use std::sync::Arc;

/// Build the one media backend shared by every request.
pub async fn setup_media_backend(config: &Config) -> Result<Arc<dyn MediaBackend>> {
    let backend = create_media_backend(config)
        .await
        .context("Failed to initialize media backend")?;
    tracing::info!(
        backend = ?backend.backend_type(),
        folder = %config.media_folder(),
        "Media backend initialized"
    );
    Ok(backend)
}
