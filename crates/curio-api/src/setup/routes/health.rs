//! Liveness check.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// The process is up and the media backend was configured.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "media_backend": state.media.backend_type(),
            "item_store": format!("{:?}", state.config.item_store).to_lowercase(),
        })),
    )
}
