//! Multipart upload reading

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::BytesMut;
use curio_core::models::UploadFile;
use curio_core::AppError;
use curio_processing::ValidationError;

/// Name of the multipart field carrying the file
pub const FILE_FIELD: &str = "file";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Buffer the single `file` field of a multipart body.
///
/// Reading stops as soon as the accumulated size passes `max_size`, so an
/// oversized upload is never held in memory in full. Other fields are ignored.
pub async fn read_upload_file(
    mut multipart: Multipart,
    max_size: u64,
) -> Result<UploadFile, AppError> {
    let mut upload: Option<UploadFile> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            let size = (data.len() + chunk.len()) as u64;
            if size > max_size {
                tracing::debug!(size, max_size, "Multipart upload over limit, aborting read");
                return Err(ValidationError::FileTooLarge {
                    size,
                    max: max_size,
                }
                .into());
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some(UploadFile::new(data.freeze(), filename, content_type));
    }

    upload.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}
