//! Repository for the `items` table.

use snapdex_core::pagination::Listing;
use snapdex_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::item::{Item, ItemDraft, ItemFilter, ItemInput};

/// Column list shared across queries. `nb_snaps` is recomputed live on
/// every read.
const COLUMNS: &str = "\
    i.id, i.collection_id, i.name, i.description, i.object_name, i.dominant_colors, \
    (SELECT COUNT(*) FROM snaps s WHERE s.item_id = i.id) AS nb_snaps, \
    i.created_at, i.updated_at";

const FILTER: &str = "WHERE ($1::UUID IS NULL OR i.collection_id = $1) \
    AND ($2::TEXT IS NULL OR i.name ILIKE '%' || $2 || '%')";

/// Provides CRUD operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Fields listing results may be ordered by.
    pub const ORDERABLE: &'static [(&'static str, &'static str)] = &[
        ("name", "i.name"),
        ("created_at", "i.created_at"),
        ("updated_at", "i.updated_at"),
    ];

    /// Default listing order.
    pub const DEFAULT_ORDER: &'static str = "i.created_at DESC";

    /// Insert a new item, returning the full row.
    pub async fn create(pool: &PgPool, draft: &ItemDraft) -> Result<Item, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_in(&mut conn, draft).await
    }

    /// Transactional insert variant, used by the moderation accept flow so
    /// the item insert and the status transition commit or roll back as one
    /// unit.
    pub async fn create_in(conn: &mut PgConnection, draft: &ItemDraft) -> Result<Item, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO items (collection_id, name, description, object_name, dominant_colors)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(draft.collection_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.object_name)
        .bind(&draft.dominant_colors)
        .fetch_one(&mut *conn)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM items i WHERE i.id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Find an item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items i WHERE i.id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the creator of the collection an item belongs to.
    ///
    /// The outer `Option` is `None` when the item does not exist; the inner
    /// one is `None` when the collection's creator account was deleted.
    pub async fn find_collection_creator(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Option<Option<DbId>>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT c.creator_id FROM items i
             JOIN collections c ON c.id = i.collection_id
             WHERE i.id = $1",
        )
        .bind(item_id)
        .fetch_optional(pool)
        .await
    }

    /// List items, optionally scoped to one collection, with the total
    /// count computed before slicing.
    pub async fn list(
        pool: &PgPool,
        collection_id: Option<DbId>,
        filter: &ItemFilter,
        order: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Listing<Item>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM items i {FILTER}");
        let count: i64 = sqlx::query_scalar(&count_query)
            .bind(collection_id)
            .bind(&filter.name)
            .fetch_one(pool)
            .await?;

        let page_query = format!("SELECT {COLUMNS} FROM items i {FILTER} {order} LIMIT $3 OFFSET $4");
        let items = sqlx::query_as::<_, Item>(&page_query)
            .bind(collection_id)
            .bind(&filter.name)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(Listing { items, count })
    }

    /// Full replacement of the client-writable fields. The parent
    /// collection never changes.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ItemInput,
    ) -> Result<Option<Item>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE items
             SET name = $2, description = $3, object_name = $4, dominant_colors = $5,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.object_name)
        .bind(&input.dominant_colors)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Delete an item (snaps and likes cascade). Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
