//! Snap entity model and DTOs.

use serde::Deserialize;
use serde_json::Value;
use snapdex_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A snap row, joined with its author's username and live like/dislike
/// aggregates.
#[derive(Debug, Clone, FromRow)]
pub struct Snap {
    pub id: DbId,
    pub item_id: DbId,
    pub user_id: DbId,
    pub user_username: String,
    pub comment: String,
    pub object_name: String,
    pub dominant_colors: Option<Value>,
    pub nb_likes: i64,
    pub nb_dislikes: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Owner pair used by the snap mutation permission check.
#[derive(Debug, Clone, FromRow)]
pub struct SnapOwners {
    pub user_id: DbId,
    pub collection_creator_id: Option<DbId>,
}

/// Wire payload for creating or replacing a snap.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SnapInput {
    #[validate(length(max = 255))]
    pub comment: String,
    #[validate(length(min = 1, max = 255))]
    pub object_name: String,
    pub dominant_colors: Option<Value>,
}

/// Insertable snap fields. `item_id` and `user_id` are injected
/// server-side, never taken from the payload.
#[derive(Debug, Clone)]
pub struct SnapDraft {
    pub item_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub comment: String,
    pub object_name: String,
    pub dominant_colors: Option<Value>,
}

impl From<SnapInput> for SnapDraft {
    fn from(input: SnapInput) -> Self {
        Self {
            item_id: None,
            user_id: None,
            comment: input.comment,
            object_name: input.object_name,
            dominant_colors: input.dominant_colors,
        }
    }
}

/// Snaps expose no user-facing filters beyond pagination and ordering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapFilter {}
