//! Item lifecycle operations on behalf of an authenticated requester.
//!
//! Every operation on a single item loads it first, so a missing item is
//! reported as not found before the access policy is consulted.

use crate::services::media_coordinator::ItemMediaCoordinator;
use curio_core::models::{
    Item, ItemCreate, ItemUpdate, ItemsPublic, MediaReference, Message, Requester, UploadFile,
    UploadResult,
};
use curio_core::{AccessAction, AccessPolicy, AppError};
use curio_db::ItemStore;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_SKIP: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
    media: Arc<ItemMediaCoordinator>,
    policy: AccessPolicy,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>, media: Arc<ItemMediaCoordinator>) -> Self {
        Self {
            store,
            media,
            policy: AccessPolicy::new(),
        }
    }

    async fn load(
        &self,
        requester: &Requester,
        id: Uuid,
        action: AccessAction,
    ) -> Result<Item, AppError> {
        let item = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        if let Err(e) = self.policy.authorize(requester, item.owner_id, action) {
            tracing::debug!(
                item_id = %id,
                action = action.as_str(),
                "Access denied"
            );
            return Err(e);
        }
        Ok(item)
    }

    /// Page through the items visible to `requester`.
    #[tracing::instrument(skip(self), fields(user_id = %requester.id))]
    pub async fn list(
        &self,
        requester: &Requester,
        skip: i64,
        limit: i64,
    ) -> Result<ItemsPublic, AppError> {
        if skip < 0 || limit < 0 {
            return Err(AppError::InvalidInput(
                "skip and limit must not be negative".to_string(),
            ));
        }

        let filter = self.policy.list_scope(requester);
        let (data, count) = self.store.list(filter, skip, limit).await?;
        Ok(ItemsPublic { data, count })
    }

    #[tracing::instrument(skip(self), fields(user_id = %requester.id, item_id = %id))]
    pub async fn get(&self, requester: &Requester, id: Uuid) -> Result<Item, AppError> {
        self.load(requester, id, AccessAction::Read).await
    }

    #[tracing::instrument(skip(self, input), fields(user_id = %requester.id))]
    pub async fn create(&self, requester: &Requester, input: ItemCreate) -> Result<Item, AppError> {
        input.validate()?;

        let item = self
            .store
            .create(Item::new(requester.id, input.title, input.description))
            .await?;

        tracing::info!(item_id = %item.id, "Item created");
        Ok(item)
    }

    #[tracing::instrument(skip(self, patch), fields(user_id = %requester.id, item_id = %id))]
    pub async fn update(
        &self,
        requester: &Requester,
        id: Uuid,
        patch: ItemUpdate,
    ) -> Result<Item, AppError> {
        patch.validate()?;

        let mut item = self.load(requester, id, AccessAction::Write).await?;
        patch.apply(&mut item);
        self.store.update(item).await
    }

    /// Delete an item. Its media is purged on a best-effort basis once the
    /// row is gone.
    #[tracing::instrument(skip(self), fields(user_id = %requester.id, item_id = %id))]
    pub async fn delete(&self, requester: &Requester, id: Uuid) -> Result<Message, AppError> {
        let mut item = self.load(requester, id, AccessAction::Delete).await?;

        let references = match self.media.detach_from_item(&mut item) {
            Ok(references) => references,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping media cleanup for item");
                Vec::new()
            }
        };

        if !self.store.delete(id).await? {
            return Err(AppError::NotFound("Item not found".to_string()));
        }

        self.media.purge(references).await;

        tracing::info!("Item deleted");
        Ok(Message::new("Item deleted successfully"))
    }

    /// Upload media without attaching it to an item.
    #[tracing::instrument(skip(self, file), fields(user_id = %requester.id))]
    pub async fn upload_media(
        &self,
        requester: &Requester,
        file: UploadFile,
    ) -> Result<UploadResult, AppError> {
        self.media.upload(&file, self.media.folder()).await
    }

    /// Upload `file` and make it the item's media.
    ///
    /// Write access is checked before anything is uploaded. If the item cannot
    /// be saved afterwards the fresh upload is purged again.
    #[tracing::instrument(skip(self, file), fields(user_id = %requester.id, item_id = %id))]
    pub async fn add_media(
        &self,
        requester: &Requester,
        id: Uuid,
        file: UploadFile,
    ) -> Result<Item, AppError> {
        let mut item = self.load(requester, id, AccessAction::Write).await?;

        let upload = self.media.upload(&file, self.media.folder()).await?;
        let uploaded = upload_reference(&upload);

        let displaced = match self.media.attach_to_item(&mut item, &upload) {
            Ok(displaced) => displaced,
            Err(e) => {
                self.media.purge(uploaded.into_iter().collect()).await;
                return Err(e);
            }
        };

        let item = match self.store.update(item).await {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "Saving item failed; removing the new upload");
                self.media.purge(uploaded.into_iter().collect()).await;
                return Err(e);
            }
        };

        self.media.purge(displaced.into_iter().collect()).await;
        Ok(item)
    }

    /// Clear the item's media and purge it from the backend.
    #[tracing::instrument(skip(self), fields(user_id = %requester.id, item_id = %id))]
    pub async fn remove_media(&self, requester: &Requester, id: Uuid) -> Result<Item, AppError> {
        let mut item = self.load(requester, id, AccessAction::Write).await?;

        let references = self.media.detach_from_item(&mut item)?;
        let item = self.store.update(item).await?;

        self.media.purge(references).await;
        Ok(item)
    }
}

fn upload_reference(upload: &UploadResult) -> Option<MediaReference> {
    upload
        .resource_kind()
        .map(|resource_type| MediaReference {
            reference_id: upload.reference_id.clone(),
            resource_type,
        })
}
