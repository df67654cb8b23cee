#[cfg(feature = "backend-cloud")]
use crate::CloudMediaBackend;
#[cfg(feature = "backend-local")]
use crate::LocalMediaBackend;
use crate::{MediaBackend, MediaBackendKind, StorageError, StorageResult};
use curio_core::Config;
use std::sync::Arc;

/// Create the media backend selected by configuration.
///
/// The hosted backend is used only when every cloud credential is present;
/// otherwise uploads go to local disk.
pub async fn create_media_backend(config: &Config) -> StorageResult<Arc<dyn MediaBackend>> {
    if config.media.cloud_partially_configured {
        tracing::warn!(
            "Cloud media credentials are incomplete; set CLOUD_NAME, CLOUD_KEY and CLOUD_SECRET \
             together. Falling back to local uploads"
        );
    }

    match config.media_backend() {
        #[cfg(feature = "backend-cloud")]
        MediaBackendKind::Cloud => {
            let credentials = config.media.cloud.clone().ok_or_else(|| {
                StorageError::ConfigError("Cloud media credentials not configured".to_string())
            })?;
            tracing::info!(cloud_name = %credentials.cloud_name, "Using cloud media backend");

            let backend = CloudMediaBackend::new(credentials, config.media.cloud_api_base.clone())?;
            Ok(Arc::new(backend))
        }

        #[cfg(not(feature = "backend-cloud"))]
        MediaBackendKind::Cloud => Err(StorageError::ConfigError(
            "Cloud media backend not available (backend-cloud feature not enabled)".to_string(),
        )),

        #[cfg(feature = "backend-local")]
        MediaBackendKind::Local => {
            tracing::info!(
                path = %config.local_upload_root(),
                base_url = %config.local_upload_base_url(),
                "Using local media backend"
            );

            let backend = LocalMediaBackend::new(
                config.local_upload_root(),
                config.local_upload_base_url().to_string(),
            )
            .await?;
            Ok(Arc::new(backend))
        }

        #[cfg(not(feature = "backend-local"))]
        MediaBackendKind::Local => Err(StorageError::ConfigError(
            "Local media backend not available (backend-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "backend-local", feature = "backend-cloud"))]
mod tests {
    use super::*;
    use curio_core::config::{BaseConfig, ItemStoreKind, MediaSettings};
    use curio_core::CloudCredentials;

    fn config(upload_root: &std::path::Path) -> Config {
        Config {
            base: BaseConfig {
                server_port: 8000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 30,
                jwt_secret: "a".repeat(32),
                environment: "development".to_string(),
                log_format: "compact".to_string(),
            },
            item_store: ItemStoreKind::Memory,
            database_url: None,
            media: MediaSettings {
                local_upload_root: upload_root.to_string_lossy().into_owned(),
                ..MediaSettings::default()
            },
        }
    }

    #[tokio::test]
    async fn test_local_when_cloud_missing() {
        let dir = tempfile::tempdir().unwrap();
        let backend = create_media_backend(&config(dir.path())).await.unwrap();
        assert_eq!(backend.backend_type(), MediaBackendKind::Local);
    }

    #[tokio::test]
    async fn test_partial_cloud_config_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.media.cloud_partially_configured = true;
        let backend = create_media_backend(&config).await.unwrap();
        assert_eq!(backend.backend_type(), MediaBackendKind::Local);
    }

    #[tokio::test]
    async fn test_cloud_when_fully_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.media.cloud = Some(CloudCredentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        });
        let backend = create_media_backend(&config).await.unwrap();
        assert_eq!(backend.backend_type(), MediaBackendKind::Cloud);
    }
}
