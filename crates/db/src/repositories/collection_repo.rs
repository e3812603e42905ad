//! Repository for the `collections` table.

use snapdex_core::pagination::Listing;
use snapdex_core::types::DbId;
use sqlx::PgPool;

use crate::models::collection::{Collection, CollectionDraft, CollectionFilter, CollectionInput};

/// Column list shared across joined queries. `nb_items` is recomputed live
/// on every read.
const COLUMNS: &str = "\
    c.id, c.name, c.description, c.object_name, c.dominant_colors, \
    c.creator_id, u.username AS creator_username, \
    (SELECT COUNT(*) FROM items i WHERE i.collection_id = c.id) AS nb_items, \
    c.created_at, c.updated_at";

const FROM: &str = "FROM collections c LEFT JOIN users u ON u.id = c.creator_id";

const FILTER: &str = "WHERE ($1::TEXT IS NULL OR c.name ILIKE '%' || $1 || '%')";

/// Provides CRUD operations for collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Fields listing results may be ordered by.
    pub const ORDERABLE: &'static [(&'static str, &'static str)] = &[
        ("name", "c.name"),
        ("created_at", "c.created_at"),
        ("updated_at", "c.updated_at"),
    ];

    /// Default listing order.
    pub const DEFAULT_ORDER: &'static str = "c.created_at DESC";

    /// Insert a new collection, returning the joined row.
    pub async fn create(pool: &PgPool, draft: &CollectionDraft) -> Result<Collection, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO collections (name, description, object_name, dominant_colors, creator_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.object_name)
        .bind(&draft.dominant_colors)
        .bind(draft.creator_id)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a collection by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE c.id = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List collections matching `filter`, with the total count computed
    /// before slicing.
    pub async fn list(
        pool: &PgPool,
        filter: &CollectionFilter,
        order: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Listing<Collection>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM collections c {FILTER}");
        let count: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.name)
            .fetch_one(pool)
            .await?;

        let page_query = format!("SELECT {COLUMNS} {FROM} {FILTER} {order} LIMIT $2 OFFSET $3");
        let items = sqlx::query_as::<_, Collection>(&page_query)
            .bind(&filter.name)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(Listing { items, count })
    }

    /// Full replacement of the client-writable fields.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CollectionInput,
    ) -> Result<Option<Collection>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE collections
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

    /// Delete a collection. Items, pending items, snaps and likes below it
    /// go with it (`ON DELETE CASCADE`). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
