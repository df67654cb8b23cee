use curio_core::models::{Item, ItemFilter};
use curio_core::{AppError, Config, ItemStoreKind};
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use super::memory::InMemoryItemStore;

const ITEM_COLUMNS: &str = "id, owner_id, title, description, media_type, image_url, video_url, \
                            media_reference_id, created_at, updated_at";

/// Persistence contract for items.
///
/// Listing applies `filter` before `offset`/`limit` and reports the size of
/// the filtered set. Results are ordered by creation time, then id.
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Item>, AppError>;

    async fn list(
        &self,
        filter: ItemFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Item>, i64), AppError>;

    async fn create(&self, item: Item) -> Result<Item, AppError>;

    /// Persist every mutable column of `item`. `NotFound` if the row is gone.
    async fn update(&self, item: Item) -> Result<Item, AppError>;

    /// Returns false when no row matched
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Repository for items stored in PostgreSQL
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ItemStore for ItemRepository {
    #[tracing::instrument(skip(self), fields(db.table = "items", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as::<Postgres, Item>(&format!(
            "SELECT {} FROM items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    #[tracing::instrument(skip(self), fields(db.table = "items", db.operation = "select"))]
    async fn list(
        &self,
        filter: ItemFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Item>, i64), AppError> {
        // NULL owner filter means unrestricted
        let items = sqlx::query_as::<Postgres, Item>(&format!(
            r#"
            SELECT {}
            FROM items
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY created_at ASC, id ASC
            OFFSET $2
            LIMIT $3
            "#,
            ITEM_COLUMNS
        ))
        .bind(filter.owner_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let count = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM items WHERE ($1::uuid IS NULL OR owner_id = $1)",
        )
        .bind(filter.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((items, count))
    }

    #[tracing::instrument(skip(self, item), fields(db.table = "items", db.operation = "insert", db.record_id = %item.id))]
    async fn create(&self, item: Item) -> Result<Item, AppError> {
        let created = sqlx::query_as::<Postgres, Item>(&format!(
            r#"
            INSERT INTO items (
                id, owner_id, title, description, media_type, image_url, video_url,
                media_reference_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(item.id)
        .bind(item.owner_id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.media_type)
        .bind(&item.image_url)
        .bind(&item.video_url)
        .bind(&item.media_reference_id)
        .bind(item.created_at)
        .bind(item.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self, item), fields(db.table = "items", db.operation = "update", db.record_id = %item.id))]
    async fn update(&self, item: Item) -> Result<Item, AppError> {
        let updated = sqlx::query_as::<Postgres, Item>(&format!(
            r#"
            UPDATE items
            SET title = $2,
                description = $3,
                media_type = $4,
                image_url = $5,
                video_url = $6,
                media_reference_id = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.media_type)
        .bind(&item.image_url)
        .bind(&item.video_url)
        .bind(&item.media_reference_id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "items", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Factory function to create the item store selected by configuration
pub fn create_item_store(
    config: &Config,
    postgres_pool: Option<PgPool>,
) -> Result<Arc<dyn ItemStore>, AppError> {
    match config.item_store {
        ItemStoreKind::Postgres => {
            let pool = postgres_pool.ok_or_else(|| {
                AppError::Internal("PostgreSQL item store requires a connection pool".to_string())
            })?;
            tracing::info!("Initializing PostgreSQL item store");
            Ok(Arc::new(ItemRepository::new(pool)))
        }
        ItemStoreKind::Memory => {
            tracing::warn!("Using in-memory item store; data is lost on restart");
            Ok(Arc::new(InMemoryItemStore::new()))
        }
    }
}
