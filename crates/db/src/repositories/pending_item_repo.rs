//! Repository for the `pending_items` table.
//!
//! The accept/refuse decision is a read-modify-write on the `status`
//! column; [`PendingItemRepo::find_for_update`] takes a row-level exclusive
//! lock so two concurrent decisions can never both observe `pending`. Both
//! locking methods take `&mut PgConnection` so the caller composes them
//! inside a single transaction.

use snapdex_core::moderation::PendingItemStatus;
use snapdex_core::pagination::Listing;
use snapdex_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::pending_item::{
    LockedPendingItem, PendingItem, PendingItemDraft, PendingItemInput, PendingItemOwners,
};

/// Column list shared across joined queries.
const COLUMNS: &str = "\
    p.id, p.collection_id, p.creator_id, u.username AS creator_username, \
    p.name, p.description, p.object_name, p.dominant_colors, p.status, \
    p.created_at, p.updated_at";

const FROM: &str = "FROM pending_items p LEFT JOIN users u ON u.id = p.creator_id";

/// Provides CRUD and moderation operations for pending items.
pub struct PendingItemRepo;

impl PendingItemRepo {
    /// Fields listing results may be ordered by.
    pub const ORDERABLE: &'static [(&'static str, &'static str)] = &[
        ("name", "p.name"),
        ("status", "p.status"),
        ("created_at", "p.created_at"),
        ("updated_at", "p.updated_at"),
    ];

    /// Default listing order.
    pub const DEFAULT_ORDER: &'static str = "p.created_at DESC";

    /// Insert a new proposal, returning the joined row. The status column
    /// falls through to its `pending` default.
    pub async fn create(
        pool: &PgPool,
        draft: &PendingItemDraft,
    ) -> Result<PendingItem, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO pending_items (collection_id, creator_id, name, description, object_name, dominant_colors)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(draft.collection_id)
        .bind(draft.creator_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.object_name)
        .bind(&draft.dominant_colors)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a pending item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PendingItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE p.id = $1");
        sqlx::query_as::<_, PendingItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the proposer and the owning collection's creator for the
    /// edit/delete permission check.
    pub async fn find_owners(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PendingItemOwners>, sqlx::Error> {
        sqlx::query_as::<_, PendingItemOwners>(
            "SELECT p.creator_id, c.creator_id AS collection_creator_id
             FROM pending_items p
             JOIN collections c ON c.id = p.collection_id
             WHERE p.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List the proposals of one collection, optionally restricted to a
    /// single proposer (non-owners only see their own).
    pub async fn list_for_collection(
        pool: &PgPool,
        collection_id: DbId,
        proposer: Option<DbId>,
        order: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Listing<PendingItem>, sqlx::Error> {
        const FILTER: &str =
            "WHERE p.collection_id = $1 AND ($2::UUID IS NULL OR p.creator_id = $2)";

        let count_query = format!("SELECT COUNT(*) FROM pending_items p {FILTER}");
        let count: i64 = sqlx::query_scalar(&count_query)
            .bind(collection_id)
            .bind(proposer)
            .fetch_one(pool)
            .await?;

        let page_query = format!("SELECT {COLUMNS} {FROM} {FILTER} {order} LIMIT $3 OFFSET $4");
        let items = sqlx::query_as::<_, PendingItem>(&page_query)
            .bind(collection_id)
            .bind(proposer)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(Listing { items, count })
    }

    /// Full replacement of the client-writable fields. The status and the
    /// parent collection never change here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &PendingItemInput,
    ) -> Result<Option<PendingItem>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE pending_items
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

    /// Delete a pending item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pending_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch a pending item with an exclusive row lock, joined with the
    /// owning collection's creator.
    ///
    /// Must run inside a transaction; the lock is held until that
    /// transaction commits or rolls back, which serializes concurrent
    /// accept/refuse attempts on the same row.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<LockedPendingItem>, sqlx::Error> {
        sqlx::query_as::<_, LockedPendingItem>(
            "SELECT p.id, p.collection_id, p.creator_id, p.name, p.description,
                    p.object_name, p.dominant_colors, p.status,
                    c.creator_id AS collection_creator_id
             FROM pending_items p
             JOIN collections c ON c.id = p.collection_id
             WHERE p.id = $1
             FOR UPDATE OF p",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Record a moderation decision on a locked row.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: PendingItemStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE pending_items SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
