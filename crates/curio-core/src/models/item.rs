use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::media::ItemMediaType;

/// Item owned by a single user, optionally carrying one image or one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub media_type: ItemMediaType,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    /// Backend reference id of the attached media; never shown to clients
    #[serde(skip_serializing, default)]
    pub media_reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// New item without media, owned by `owner_id`.
    pub fn new(owner_id: Uuid, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title,
            description,
            media_type: ItemMediaType::None,
            image_url: None,
            video_url: None,
            media_reference_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `media_type`, `image_url` and `video_url` agree with each other.
    pub fn media_fields_consistent(&self) -> bool {
        match self.media_type {
            ItemMediaType::None => {
                self.image_url.is_none()
                    && self.video_url.is_none()
                    && self.media_reference_id.is_none()
            }
            ItemMediaType::Image => self.image_url.is_some() && self.video_url.is_none(),
            ItemMediaType::Video => self.video_url.is_some() && self.image_url.is_none(),
        }
    }
}

/// Request DTO for creating an item
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct ItemCreate {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
}

/// Request DTO for updating an item; absent fields are left unchanged.
///
/// `description: null` clears the description, while omitting it keeps it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct ItemUpdate {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<String>, nullable)]
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<Option<String>>,
}

impl ItemUpdate {
    pub fn apply(self, item: &mut Item) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
    }
}

/// Maps a present field to `Some`, so an explicit `null` becomes `Some(None)`
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Page of items plus the total size of the scoped set
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemsPublic {
    pub data: Vec<Item>,
    pub count: i64,
}

/// Store-level filter produced by the access policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// `None` means unrestricted
    pub owner_id: Option<Uuid>,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        match self.owner_id {
            Some(owner) => owner == item.owner_id,
            None => true,
        }
    }
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
