//! Like entity model and DTOs.
//!
//! A like row is unique per (snap, user) and carries a `liked` flag, so the
//! same row represents both likes and dislikes.

use serde::Deserialize;
use snapdex_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A like row, joined with its author's username.
#[derive(Debug, Clone, FromRow)]
pub struct Like {
    pub id: DbId,
    pub snap_id: DbId,
    pub user_id: DbId,
    pub user_username: String,
    pub liked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wire payload for setting the caller's reaction on a snap.
#[derive(Debug, Clone, Deserialize)]
pub struct LikeInput {
    pub liked: bool,
}

/// Listing filters for likes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeFilter {
    pub liked: Option<bool>,
}
