use crate::keys;
use crate::traits::{MediaBackend, StorageError, StorageResult};
use crate::MediaBackendKind;
use async_trait::async_trait;
use curio_core::models::{MediaReference, ResourceType, UploadFile, UploadResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem media backend
///
/// Files land in `{base_path}/{folder}/{uuid}{ext}` and are served by the API
/// under `{base_url}/{folder}/{uuid}{ext}`. The reference id of an upload is
/// its filesystem path.
#[derive(Clone, Debug)]
pub struct LocalMediaBackend {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaBackend {
    /// Create a new LocalMediaBackend instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for uploaded files (e.g., "uploads")
    /// * `base_url` - URL prefix the files are served under (e.g., "/uploads")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalMediaBackend {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.starts_with('/')
            || storage_key.split('/').any(|segment| segment == "..")
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside upload directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Map a reference id (a path under `base_path`) back to its storage key
    fn reference_to_key(&self, reference_id: &str) -> StorageResult<String> {
        let relative = Path::new(reference_id)
            .strip_prefix(&self.base_path)
            .map_err(|_| {
                StorageError::InvalidKey(format!(
                    "Reference {} is outside the upload directory",
                    reference_id
                ))
            })?;

        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Ok(key)
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl MediaBackend for LocalMediaBackend {
    async fn upload(&self, file: &UploadFile, folder: &str) -> StorageResult<UploadResult> {
        let folder = keys::sanitize_folder(folder)?;
        let extension = file.extension();
        let filename = keys::unique_filename(extension.as_deref());
        let key = keys::object_key(&folder, &filename);
        let path = self.key_to_path(&key)?;
        let size = file.data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut out = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        out.write_all(&file.data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        out.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(&key);
        let resource_type =
            ResourceType::from_content_type(file.content_type.as_deref().unwrap_or_default());

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            resource_type = %resource_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local media upload successful"
        );

        Ok(UploadResult {
            url,
            reference_id: path.to_string_lossy().into_owned(),
            resource_type: resource_type.as_str().to_string(),
            format: extension
                .map(|ext| ext.trim_start_matches('.').to_string())
                .unwrap_or_default(),
            bytes: size as u64,
            width: None,
            height: None,
        })
    }

    async fn delete(&self, reference: &MediaReference) -> StorageResult<bool> {
        let key = self.reference_to_key(&reference.reference_id)?;
        let path = self.key_to_path(&key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "Local media already absent");
            return Ok(false);
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local media delete successful"
        );

        Ok(true)
    }

    fn backend_type(&self) -> MediaBackendKind {
        MediaBackendKind::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn backend(dir: &Path) -> LocalMediaBackend {
        LocalMediaBackend::new(dir.join("uploads"), "/uploads".to_string())
            .await
            .unwrap()
    }

    fn upload_file(data: Vec<u8>, name: &str, content_type: &str) -> UploadFile {
        UploadFile::new(data, Some(name.to_string()), Some(content_type.to_string()))
    }

    #[tokio::test]
    async fn test_upload_writes_exact_bytes() {
        let dir = tempdir().unwrap();
        let backend = backend(dir.path()).await;

        let data: Vec<u8> = (0..70_000u32).map(|i| (i % 251) as u8).collect();
        let file = upload_file(data.clone(), "photo.PNG", "image/png");

        let result = backend.upload(&file, "items").await.unwrap();

        assert_eq!(result.resource_type, "image");
        assert_eq!(result.format, "png");
        assert_eq!(result.bytes, data.len() as u64);
        assert!(result.url.starts_with("/uploads/items/"));
        assert!(result.url.ends_with(".png"));

        let written = fs::read(&result.reference_id).await.unwrap();
        assert_eq!(written, data);
    }

    #[tokio::test]
    async fn test_upload_classifies_non_images_as_video() {
        let dir = tempdir().unwrap();
        let backend = backend(dir.path()).await;

        let file = upload_file(vec![0, 0, 0, 0x18], "clip.mp4", "video/mp4");
        let result = backend.upload(&file, "items").await.unwrap();
        assert_eq!(result.resource_kind(), Some(ResourceType::Video));

        let file = UploadFile::new(vec![1u8, 2, 3], None, None);
        let result = backend.upload(&file, "items").await.unwrap();
        assert_eq!(result.resource_type, "video");
        assert_eq!(result.format, "");
    }

    #[tokio::test]
    async fn test_unique_names_per_upload() {
        let dir = tempdir().unwrap();
        let backend = backend(dir.path()).await;
        let file = upload_file(vec![1, 2, 3], "a.gif", "image/gif");

        let first = backend.upload(&file, "items").await.unwrap();
        let second = backend.upload(&file, "items").await.unwrap();
        assert_ne!(first.url, second.url);
        assert_ne!(first.reference_id, second.reference_id);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_anything_was_removed() {
        let dir = tempdir().unwrap();
        let backend = backend(dir.path()).await;
        let file = upload_file(vec![1, 2, 3], "a.gif", "image/gif");
        let result = backend.upload(&file, "items").await.unwrap();

        let reference = MediaReference {
            reference_id: result.reference_id.clone(),
            resource_type: ResourceType::Image,
        };
        assert!(backend.delete(&reference).await.unwrap());
        assert!(!fs::try_exists(&result.reference_id).await.unwrap());
        assert!(!backend.delete(&reference).await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let backend = backend(dir.path()).await;
        let file = upload_file(vec![1, 2, 3], "a.gif", "image/gif");

        let result = backend.upload(&file, "../outside").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let reference = MediaReference {
            reference_id: "/etc/passwd".to_string(),
            resource_type: ResourceType::Image,
        };
        let result = backend.delete(&reference).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let escaped = dir.path().join("uploads/../../etc/passwd");
        let reference = MediaReference {
            reference_id: escaped.to_string_lossy().into_owned(),
            resource_type: ResourceType::Image,
        };
        let result = backend.delete(&reference).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_backend_type() {
        let dir = tempdir().unwrap();
        let backend = backend(dir.path()).await;
        assert_eq!(backend.backend_type(), MediaBackendKind::Local);
    }
}
