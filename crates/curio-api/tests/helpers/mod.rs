//! Test helpers: build AppState and router for integration tests.
//!
//! Items live in the in-memory store and uploads go to a temporary directory,
//! so no database or network is needed.

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use curio_api::auth::{generate_access_token, JwtConfig};
use curio_api::constants;
use curio_api::setup::routes;
use curio_api::state::AppState;
use curio_core::config::{BaseConfig, ItemStoreKind, MediaSettings};
use curio_core::models::Requester;
use curio_core::Config;
use curio_db::InMemoryItemStore;
use curio_storage::{LocalMediaBackend, MediaBackend};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// Upload limit used by every test app
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// API path prefix for tests (e.g. `/api/v1/items`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn test_config(upload_dir: &TempDir) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 5,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
            log_format: "compact".to_string(),
        },
        item_store: ItemStoreKind::Memory,
        database_url: None,
        media: MediaSettings {
            max_upload_size_bytes: TEST_MAX_UPLOAD_BYTES,
            local_upload_root: upload_dir.path().to_string_lossy().into_owned(),
            local_upload_base_url: "/uploads".to_string(),
            media_folder: "items".to_string(),
            ..MediaSettings::default()
        },
    }
}

/// Test app backed by local disk uploads.
pub async fn setup_test_app() -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let backend = LocalMediaBackend::new(upload_dir.path(), "/uploads".to_string())
        .await
        .expect("Failed to create local backend");
    build_app(upload_dir, Arc::new(backend))
}

/// Test app with a custom media backend.
pub fn setup_test_app_with_backend(backend: Arc<dyn MediaBackend>) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    build_app(upload_dir, backend)
}

fn build_app(upload_dir: TempDir, backend: Arc<dyn MediaBackend>) -> TestApp {
    let config = test_config(&upload_dir);
    let store = Arc::new(InMemoryItemStore::new());
    let state = Arc::new(AppState::new(config.clone(), store, backend));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, upload_dir }
}

/// Bearer token for a fresh regular user
pub fn user_token() -> (Requester, String) {
    token_for(Requester::user(Uuid::new_v4()))
}

/// Bearer token for a fresh superuser
pub fn superuser_token() -> (Requester, String) {
    token_for(Requester::superuser(Uuid::new_v4()))
}

fn token_for(requester: Requester) -> (Requester, String) {
    let token = generate_access_token(&requester, &JwtConfig::new(TEST_JWT_SECRET))
        .expect("Failed to sign token");
    (requester, token)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Create an item through the API and return its JSON
pub async fn create_item(client: &TestServer, token: &str, title: &str) -> serde_json::Value {
    let response = client
        .post(&api_path("/items"))
        .add_header("Authorization", bearer(token))
        .json(&serde_json::json!({ "title": title, "description": "test item" }))
        .await;
    response.assert_status_ok();
    response.json::<serde_json::Value>()
}

/// Multipart form with a single `file` part
pub fn file_form(data: Vec<u8>, filename: &str, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(filename).mime_type(mime),
    )
}
