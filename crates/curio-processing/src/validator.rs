use curio_core::models::ResourceType;
use curio_core::AppError;

use crate::sniff::detect_mime;

/// Content types accepted for item media
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
];

/// Validation errors for uploaded media
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unsupported file type: {content_type}")]
    UnsupportedType { content_type: String },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { max, .. } => AppError::PayloadTooLarge(format!(
                "File size exceeds maximum allowed size of {}MB",
                max / (1024 * 1024)
            )),
            ValidationError::UnsupportedType { content_type } => AppError::UnsupportedMediaType(
                format!("File type {} not allowed", content_type),
            ),
        }
    }
}

/// What the validator learned about an accepted upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedMedia {
    pub content_type: &'static str,
    pub resource_type: ResourceType,
}

/// Size and content-type gate applied before any upload I/O.
///
/// The content type is always sniffed from the bytes themselves.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: u64,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    /// Validator for item media with the given size limit.
    pub fn for_item_media(max_file_size: u64) -> Self {
        Self::new(
            max_file_size,
            ALLOWED_CONTENT_TYPES.iter().map(|ct| ct.to_string()).collect(),
        )
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Sniff `data` and check the result against the allow-list
    pub fn validate_content(&self, data: &[u8]) -> Result<&'static str, ValidationError> {
        let content_type = detect_mime(data);

        if !self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed == content_type)
        {
            tracing::debug!(
                content_type = %content_type,
                "Rejected upload with unsupported content type"
            );
            return Err(ValidationError::UnsupportedType {
                content_type: content_type.to_string(),
            });
        }

        Ok(content_type)
    }

    /// Size first, then content. `declared_size` is what the client sent;
    /// the buffered length is checked too in case the two disagree.
    pub fn validate(&self, data: &[u8], declared_size: u64) -> Result<ValidatedMedia, ValidationError> {
        self.validate_file_size(declared_size.max(data.len() as u64))?;
        let content_type = self.validate_content(data)?;
        Ok(ValidatedMedia {
            content_type,
            resource_type: ResourceType::from_content_type(content_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn jpeg_of_len(len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        data[..4].copy_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
        data
    }

    #[test]
    fn test_rejects_oversized_file() {
        let validator = MediaValidator::for_item_media(10 * MIB);
        let data = jpeg_of_len(15 * MIB as usize);
        assert_eq!(
            validator.validate(&data, data.len() as u64),
            Err(ValidationError::FileTooLarge {
                size: 15 * MIB,
                max: 10 * MIB
            })
        );
    }

    #[test]
    fn test_accepts_jpeg_under_limit() {
        let validator = MediaValidator::for_item_media(10 * MIB);
        let data = jpeg_of_len(5 * MIB as usize);
        let media = validator.validate(&data, data.len() as u64).unwrap();
        assert_eq!(media.content_type, "image/jpeg");
        assert_eq!(media.resource_type, ResourceType::Image);
    }

    #[test]
    fn test_file_at_exact_limit_is_accepted() {
        let validator = MediaValidator::for_item_media(1024);
        let data = jpeg_of_len(1024);
        assert!(validator.validate(&data, 1024).is_ok());
        assert!(validator.validate(&data, 1025).is_err());
    }

    #[test]
    fn test_rejects_text_named_like_an_image() {
        let validator = MediaValidator::for_item_media(10 * MIB);
        let data = b"definitely not a photo.jpg\n";
        assert_eq!(
            validator.validate(data, data.len() as u64),
            Err(ValidationError::UnsupportedType {
                content_type: "text/plain".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_empty_file_as_unsupported() {
        let validator = MediaValidator::for_item_media(10 * MIB);
        assert!(matches!(
            validator.validate(&[], 0),
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_video_classification() {
        let validator = MediaValidator::for_item_media(10 * MIB);
        let mut mov = vec![0x00, 0x00, 0x00, 0x14];
        mov.extend_from_slice(b"ftypqt  ");
        mov.extend_from_slice(&[0u8; 16]);
        let media = validator.validate(&mov, mov.len() as u64).unwrap();
        assert_eq!(media.content_type, "video/quicktime");
        assert_eq!(media.resource_type, ResourceType::Video);
    }

    #[test]
    fn test_validation_error_maps_to_app_error() {
        let err: AppError = ValidationError::FileTooLarge {
            size: 15 * MIB,
            max: 10 * MIB,
        }
        .into();
        assert!(matches!(err, AppError::PayloadTooLarge(ref msg) if msg.contains("10MB")));

        let err: AppError = ValidationError::UnsupportedType {
            content_type: "text/plain".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::UnsupportedMediaType(ref msg) if msg.contains("text/plain")));
    }
}
