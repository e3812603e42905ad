//! Repository for the `likes` table.

use snapdex_core::pagination::Listing;
use snapdex_core::types::DbId;
use sqlx::PgPool;

use crate::models::like::{Like, LikeFilter};

/// Column list shared across joined queries.
const COLUMNS: &str = "\
    l.id, l.snap_id, l.user_id, u.username AS user_username, l.liked, \
    l.created_at, l.updated_at";

const FROM: &str = "FROM likes l JOIN users u ON u.id = l.user_id";

/// Provides reaction operations for snaps.
pub struct LikeRepo;

impl LikeRepo {
    /// Fields listing results may be ordered by.
    pub const ORDERABLE: &'static [(&'static str, &'static str)] =
        &[("created_at", "l.created_at"), ("updated_at", "l.updated_at")];

    /// Default listing order.
    pub const DEFAULT_ORDER: &'static str = "l.created_at DESC";

    /// Find a like by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Like>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE l.id = $1");
        sqlx::query_as::<_, Like>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the caller's reaction on a snap (at most one per user).
    pub async fn find_by_snap_and_user(
        pool: &PgPool,
        snap_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Like>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE l.snap_id = $1 AND l.user_id = $2");
        sqlx::query_as::<_, Like>(&query)
            .bind(snap_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or update the caller's reaction on a snap.
    ///
    /// The row is unique per (snap, user); a second call just flips the
    /// `liked` flag on the existing row.
    pub async fn upsert(
        pool: &PgPool,
        snap_id: DbId,
        user_id: DbId,
        liked: bool,
    ) -> Result<Like, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO likes (snap_id, user_id, liked)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_likes_snap_user
             DO UPDATE SET liked = EXCLUDED.liked, updated_at = NOW()
             RETURNING id",
        )
        .bind(snap_id)
        .bind(user_id)
        .bind(liked)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// List reactions, optionally scoped to one snap, with the total count
    /// computed before slicing.
    pub async fn list(
        pool: &PgPool,
        snap_id: Option<DbId>,
        filter: &LikeFilter,
        order: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Listing<Like>, sqlx::Error> {
        const FILTER: &str =
            "WHERE ($1::UUID IS NULL OR l.snap_id = $1) AND ($2::BOOLEAN IS NULL OR l.liked = $2)";

        let count_query = format!("SELECT COUNT(*) FROM likes l {FILTER}");
        let count: i64 = sqlx::query_scalar(&count_query)
            .bind(snap_id)
            .bind(filter.liked)
            .fetch_one(pool)
            .await?;

        let page_query = format!("SELECT {COLUMNS} {FROM} {FILTER} {order} LIMIT $3 OFFSET $4");
        let items = sqlx::query_as::<_, Like>(&page_query)
            .bind(snap_id)
            .bind(filter.liked)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(Listing { items, count })
    }

    /// Remove the caller's reaction on a snap. Returns `true` if a row was
    /// removed.
    pub async fn delete_by_snap_and_user(
        pool: &PgPool,
        snap_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM likes WHERE snap_id = $1 AND user_id = $2")
            .bind(snap_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
