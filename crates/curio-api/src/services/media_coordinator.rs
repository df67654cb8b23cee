//! Validation, upload and the item media state machine.
//!
//! An item is in one of three media states: empty, has-image or has-video.
//! Attaching overwrites whatever was there and hands back the displaced
//! reference; detaching returns to empty. Backend deletions only happen in
//! [`ItemMediaCoordinator::purge`], after the caller has persisted the item.

use curio_core::models::{
    Item, ItemMediaType, MediaReference, ResourceType, UploadFile, UploadResult,
};
use curio_core::{AppError, MediaBackendKind};
use curio_processing::{MediaValidator, ValidatedMedia};
use curio_storage::MediaBackend;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Concurrent backend deletions issued by a single purge
const PURGE_CONCURRENCY: usize = 4;

pub struct ItemMediaCoordinator {
    backend: Arc<dyn MediaBackend>,
    validator: MediaValidator,
    folder: String,
}

impl ItemMediaCoordinator {
    pub fn new(
        backend: Arc<dyn MediaBackend>,
        max_size_bytes: u64,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            validator: MediaValidator::for_item_media(max_size_bytes),
            folder: folder.into(),
        }
    }

    pub fn backend_type(&self) -> MediaBackendKind {
        self.backend.backend_type()
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.validator.max_file_size()
    }

    /// Folder item media is uploaded into
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Reject oversized files and anything whose sniffed type is not an
    /// accepted image or video. Only a prefix of the buffer is read.
    pub fn validate(&self, file: &UploadFile) -> Result<ValidatedMedia, AppError> {
        Ok(self.validator.validate(&file.data, file.declared_size)?)
    }

    /// Validate, then hand the bytes to the configured backend.
    ///
    /// Backends see the sniffed content type, never the one the client declared.
    #[tracing::instrument(
        skip(self, file),
        fields(
            backend = ?self.backend.backend_type(),
            size_bytes = file.declared_size
        )
    )]
    pub async fn upload(&self, file: &UploadFile, folder: &str) -> Result<UploadResult, AppError> {
        let validated = self.validate(file)?;
        tracing::debug!(
            content_type = validated.content_type,
            resource_type = %validated.resource_type,
            "Upload passed validation"
        );

        let file = UploadFile {
            content_type: Some(validated.content_type.to_string()),
            ..file.clone()
        };
        let result = self.backend.upload(&file, folder).await?;

        tracing::info!(
            url = %result.url,
            resource_type = %result.resource_type,
            bytes = result.bytes,
            "Media uploaded"
        );
        Ok(result)
    }

    /// Point `item` at the uploaded media.
    ///
    /// Returns the reference of the media that was displaced, if any.
    pub fn attach_to_item(
        &self,
        item: &mut Item,
        upload: &UploadResult,
    ) -> Result<Option<MediaReference>, AppError> {
        ensure_consistent(item)?;

        let resource_type = upload.resource_kind().ok_or_else(|| {
            AppError::UnsupportedMediaType(format!(
                "Unsupported resource type {}",
                upload.resource_type
            ))
        })?;

        let displaced = current_reference(item);

        match resource_type {
            ResourceType::Image => {
                item.image_url = Some(upload.url.clone());
                item.video_url = None;
            }
            ResourceType::Video => {
                item.video_url = Some(upload.url.clone());
                item.image_url = None;
            }
        }
        item.media_type = ItemMediaType::from(resource_type);
        item.media_reference_id = Some(upload.reference_id.clone());

        Ok(displaced)
    }

    /// Clear the media fields of `item`, returning what should be purged.
    pub fn detach_from_item(&self, item: &mut Item) -> Result<Vec<MediaReference>, AppError> {
        ensure_consistent(item)?;

        if item.media_type == ItemMediaType::None {
            return Ok(Vec::new());
        }

        let reference = current_reference(item);
        if reference.is_none() {
            tracing::warn!(
                item_id = %item.id,
                "Item media has no stored reference; backend asset cannot be removed"
            );
        }

        item.media_type = ItemMediaType::None;
        item.image_url = None;
        item.video_url = None;
        item.media_reference_id = None;

        Ok(reference.into_iter().collect())
    }

    /// Best-effort backend deletion. Failures are logged and swallowed.
    pub async fn purge(&self, references: Vec<MediaReference>) {
        if references.is_empty() {
            return;
        }

        stream::iter(references)
            .map(|reference| {
                let backend = self.backend.clone();
                async move {
                    match backend.delete(&reference).await {
                        Ok(true) => {
                            tracing::debug!(
                                reference_id = %reference.reference_id,
                                "Media removed from backend"
                            );
                        }
                        Ok(false) => {
                            tracing::warn!(
                                reference_id = %reference.reference_id,
                                resource_type = %reference.resource_type,
                                "Backend reported nothing to delete"
                            );
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                reference_id = %reference.reference_id,
                                resource_type = %reference.resource_type,
                                "Failed to delete media from backend"
                            );
                        }
                    }
                }
            })
            .buffer_unordered(PURGE_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;
    }
}

fn ensure_consistent(item: &Item) -> Result<(), AppError> {
    if item.media_fields_consistent() {
        Ok(())
    } else {
        Err(AppError::InconsistentState(format!(
            "Item {} has media fields that disagree with its media type",
            item.id
        )))
    }
}

fn current_reference(item: &Item) -> Option<MediaReference> {
    let resource_type = match item.media_type {
        ItemMediaType::Image => ResourceType::Image,
        ItemMediaType::Video => ResourceType::Video,
        ItemMediaType::None => return None,
    };
    item.media_reference_id
        .clone()
        .map(|reference_id| MediaReference {
            reference_id,
            resource_type,
        })
}
