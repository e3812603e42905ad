//! Repository for the `snaps` table.

use snapdex_core::pagination::Listing;
use snapdex_core::types::DbId;
use sqlx::PgPool;

use crate::models::snap::{Snap, SnapDraft, SnapInput, SnapOwners};

/// Column list shared across joined queries. Like/dislike counts are
/// recomputed live on every read.
const COLUMNS: &str = "\
    s.id, s.item_id, s.user_id, u.username AS user_username, \
    s.comment, s.object_name, s.dominant_colors, \
    (SELECT COUNT(*) FROM likes l WHERE l.snap_id = s.id AND l.liked) AS nb_likes, \
    (SELECT COUNT(*) FROM likes l WHERE l.snap_id = s.id AND NOT l.liked) AS nb_dislikes, \
    s.created_at, s.updated_at";

const FROM: &str = "FROM snaps s JOIN users u ON u.id = s.user_id";

/// Provides CRUD operations for snaps.
pub struct SnapRepo;

impl SnapRepo {
    /// Fields listing results may be ordered by.
    pub const ORDERABLE: &'static [(&'static str, &'static str)] = &[
        ("created_at", "s.created_at"),
        ("updated_at", "s.updated_at"),
    ];

    /// Default listing order.
    pub const DEFAULT_ORDER: &'static str = "s.created_at DESC";

    /// Insert a new snap, returning the joined row.
    pub async fn create(pool: &PgPool, draft: &SnapDraft) -> Result<Snap, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO snaps (item_id, user_id, comment, object_name, dominant_colors)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(draft.item_id)
        .bind(draft.user_id)
        .bind(&draft.comment)
        .bind(&draft.object_name)
        .bind(&draft.dominant_colors)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a snap by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Snap>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE s.id = $1");
        sqlx::query_as::<_, Snap>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the caller's own snap on an item (at most one per user).
    pub async fn find_by_item_and_user(
        pool: &PgPool,
        item_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Snap>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE s.item_id = $1 AND s.user_id = $2");
        sqlx::query_as::<_, Snap>(&query)
            .bind(item_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the snap's author and the creator of the collection it
    /// belongs to, for the mutation permission check.
    pub async fn find_owners(pool: &PgPool, id: DbId) -> Result<Option<SnapOwners>, sqlx::Error> {
        sqlx::query_as::<_, SnapOwners>(
            "SELECT s.user_id, c.creator_id AS collection_creator_id
             FROM snaps s
             JOIN items i ON i.id = s.item_id
             JOIN collections c ON c.id = i.collection_id
             WHERE s.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List snaps, optionally scoped to one item, with the total count
    /// computed before slicing.
    pub async fn list(
        pool: &PgPool,
        item_id: Option<DbId>,
        order: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Listing<Snap>, sqlx::Error> {
        const FILTER: &str = "WHERE ($1::UUID IS NULL OR s.item_id = $1)";

        let count_query = format!("SELECT COUNT(*) FROM snaps s {FILTER}");
        let count: i64 = sqlx::query_scalar(&count_query)
            .bind(item_id)
            .fetch_one(pool)
            .await?;

        let page_query = format!("SELECT {COLUMNS} {FROM} {FILTER} {order} LIMIT $2 OFFSET $3");
        let items = sqlx::query_as::<_, Snap>(&page_query)
            .bind(item_id)
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
        input: &SnapInput,
    ) -> Result<Option<Snap>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE snaps
             SET comment = $2, object_name = $3, dominant_colors = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.comment)
        .bind(&input.object_name)
        .bind(&input.dominant_colors)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Delete a snap (likes cascade). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM snaps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
