use chrono::Utc;
use curio_core::models::{Item, ItemFilter};
use curio_core::AppError;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::item::ItemStore;

/// Item store kept in process memory
#[derive(Default)]
pub struct InMemoryItemStore {
    items: RwLock<HashMap<Uuid, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ItemStore for InMemoryItemStore {
    async fn get(&self, id: Uuid) -> Result<Option<Item>, AppError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: ItemFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Item>, i64), AppError> {
        let items = self.items.read().await;

        let mut scoped: Vec<&Item> = items.values().filter(|item| filter.matches(item)).collect();
        scoped.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let count = scoped.len() as i64;
        let page = scoped
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((page, count))
    }

    async fn create(&self, item: Item) -> Result<Item, AppError> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(AppError::InvalidInput(format!(
                "Item {} already exists",
                item.id
            )));
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, mut item: Item) -> Result<Item, AppError> {
        let mut items = self.items.write().await;
        let existing = items
            .get_mut(&item.id)
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        // Ownership and creation time never change through an update
        item.owner_id = existing.owner_id;
        item.created_at = existing.created_at;
        item.updated_at = Utc::now();
        *existing = item.clone();
        Ok(item)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.items.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(owner: Uuid, title: &str, age_secs: i64) -> Item {
        let mut item = Item::new(owner, title.to_string(), None);
        item.created_at = Utc::now() - Duration::seconds(age_secs);
        item
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let store = InMemoryItemStore::new();
        let created = store.create(item(Uuid::new_v4(), "Lamp", 0)).await.unwrap();

        assert_eq!(store.get(created.id).await.unwrap(), Some(created.clone()));
        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert_eq!(store.get(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_filters_before_paging() {
        let store = InMemoryItemStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.create(item(alice, "a1", 50)).await.unwrap();
        store.create(item(bob, "b1", 40)).await.unwrap();
        store.create(item(alice, "a2", 30)).await.unwrap();
        store.create(item(bob, "b2", 20)).await.unwrap();
        store.create(item(alice, "a3", 10)).await.unwrap();

        let (page, count) = store
            .list(ItemFilter { owner_id: Some(alice) }, 1, 1)
            .await
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "a2");

        let (page, count) = store.list(ItemFilter::default(), 0, 100).await.unwrap();
        assert_eq!(count, 5);
        let titles: Vec<_> = page.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "b1", "a2", "b2", "a3"]);
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let store = InMemoryItemStore::new();
        let err = store
            .update(item(Uuid::new_v4(), "ghost", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_owner_and_creation_time() {
        let store = InMemoryItemStore::new();
        let original = store.create(item(Uuid::new_v4(), "Lamp", 60)).await.unwrap();

        let mut changed = original.clone();
        changed.title = "Desk lamp".to_string();
        changed.owner_id = Uuid::new_v4();

        let updated = store.update(changed).await.unwrap();
        assert_eq!(updated.title, "Desk lamp");
        assert_eq!(updated.owner_id, original.owner_id);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
    }
}
