//! Media backend abstraction trait
//!
//! This module defines the MediaBackend trait that every media host must implement.

use crate::MediaBackendKind;
use async_trait::async_trait;
use curio_core::models::{MediaReference, UploadFile, UploadResult};
use curio_core::AppError;
use thiserror::Error;

/// Media backend operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for media backend operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) => AppError::UploadFailed(msg),
            StorageError::IoError(err) => AppError::UploadFailed(format!("IO error: {}", err)),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::DeleteFailed(msg) | StorageError::BackendError(msg) => {
                AppError::Internal(msg)
            }
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Media backend abstraction trait
///
/// Item media is handed to a backend as an already validated, fully buffered
/// file. The backend decides where it lives and reports back enough to render
/// it (`url`) and to delete it later (`reference_id` plus resource type).
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Store `file` under `folder` and describe the stored asset
    async fn upload(&self, file: &UploadFile, folder: &str) -> StorageResult<UploadResult>;

    /// Delete a previously uploaded asset.
    ///
    /// Returns `Ok(false)` when the backend reports nothing was deleted.
    async fn delete(&self, reference: &MediaReference) -> StorageResult<bool>;

    /// Get the media backend type
    fn backend_type(&self) -> MediaBackendKind;
}
