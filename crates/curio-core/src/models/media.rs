use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Media attached to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "item_media_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ItemMediaType {
    #[default]
    None,
    Image,
    Video,
}

/// Classification of uploaded media, as sniffed or as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Video,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
        }
    }

    /// Infer from a MIME type: `image/*` is an image, anything else is treated as video.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.trim().to_lowercase().starts_with("image/") {
            ResourceType::Image
        } else {
            ResourceType::Video
        }
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(ResourceType::Image),
            "video" => Ok(ResourceType::Video),
            other => Err(other.to_string()),
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl From<ResourceType> for ItemMediaType {
    fn from(value: ResourceType) -> Self {
        match value {
            ResourceType::Image => ItemMediaType::Image,
            ResourceType::Video => ItemMediaType::Video,
        }
    }
}

/// What a media backend reports after a successful upload.
///
/// `resource_type` is kept as the backend's wire string; hosted backends may
/// classify files in ways the item model does not support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    pub url: String,
    /// Opaque backend identifier needed to delete the asset later
    pub reference_id: String,
    pub resource_type: String,
    pub format: String,
    pub bytes: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl UploadResult {
    pub fn resource_kind(&self) -> Option<ResourceType> {
        self.resource_type.parse().ok()
    }
}

/// Everything a backend needs to delete a previously uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReference {
    pub reference_id: String,
    pub resource_type: ResourceType,
}

/// A buffered upload as received from the client.
///
/// `filename` and `content_type` are client supplied and never trusted for
/// type checks; the leading bytes of `data` are.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub data: Bytes,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub declared_size: u64,
}

impl UploadFile {
    pub fn new(data: impl Into<Bytes>, filename: Option<String>, content_type: Option<String>) -> Self {
        let data = data.into();
        let declared_size = data.len() as u64;
        Self {
            data,
            filename,
            content_type,
            declared_size,
        }
    }

    /// Lowercased extension of the client filename, including the leading dot.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_from_content_type() {
        assert_eq!(ResourceType::from_content_type("image/png"), ResourceType::Image);
        assert_eq!(ResourceType::from_content_type("IMAGE/JPEG"), ResourceType::Image);
        assert_eq!(ResourceType::from_content_type("video/mp4"), ResourceType::Video);
        assert_eq!(
            ResourceType::from_content_type("application/octet-stream"),
            ResourceType::Video
        );
    }

    #[test]
    fn test_upload_result_resource_kind() {
        let mut result = UploadResult {
            url: "https://cdn.example.com/a.png".to_string(),
            reference_id: "items/a".to_string(),
            resource_type: "image".to_string(),
            format: "png".to_string(),
            bytes: 10,
            width: Some(1),
            height: Some(1),
        };
        assert_eq!(result.resource_kind(), Some(ResourceType::Image));

        result.resource_type = "raw".to_string();
        assert_eq!(result.resource_kind(), None);
    }

    #[test]
    fn test_upload_file_extension() {
        let file = UploadFile::new(vec![1u8, 2, 3], Some("Holiday.JPG".to_string()), None);
        assert_eq!(file.extension().as_deref(), Some(".jpg"));
        assert_eq!(file.declared_size, 3);

        let file = UploadFile::new(vec![1u8], Some("noext".to_string()), None);
        assert_eq!(file.extension(), None);

        let file = UploadFile::new(vec![1u8], None, None);
        assert_eq!(file.extension(), None);
    }
}
