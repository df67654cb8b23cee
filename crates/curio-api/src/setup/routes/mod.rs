//! Route configuration and setup.

mod health;

use crate::auth::middleware::{auth_middleware, AuthState};
use crate::constants::API_PREFIX;
use crate::handlers::items;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use curio_core::{Config, MediaBackendKind};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState::new(config.jwt_secret()));

    let item_routes = item_routes().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let mut app = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .nest(API_PREFIX, item_routes)
        .with_state(state.clone())
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"));

    if state.media.backend_type() == MediaBackendKind::Local {
        app = mount_local_uploads(app, config);
    }

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    let body_limit = config.max_upload_size_bytes() + MULTIPART_OVERHEAD_BYTES;
    tracing::info!(http_concurrency_limit, body_limit, "HTTP limits configured");

    let app = app
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn item_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/upload-media", post(items::upload_media))
        .route(
            "/items/{id}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route(
            "/items/{id}/media",
            post(items::add_item_media).delete(items::remove_item_media),
        )
}

/// Serve locally stored uploads under their public URL prefix.
fn mount_local_uploads(app: Router, config: &Config) -> Router {
    let prefix = config.local_upload_base_url().trim_end_matches('/');
    if !prefix.starts_with('/') || prefix.len() < 2 {
        tracing::warn!(
            base_url = %config.local_upload_base_url(),
            "Local upload URL is not a path on this server; files will not be served by the API"
        );
        return app;
    }

    tracing::info!(
        prefix,
        root = %config.local_upload_root(),
        "Serving local uploads"
    );
    app.nest_service(prefix, ServeDir::new(config.local_upload_root()))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS=* is not allowed in production; list the allowed origins"
            ));
        }
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
