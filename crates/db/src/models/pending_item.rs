//! Pending item entity model and DTOs.
//!
//! A pending item is a proposed item awaiting moderation by the owning
//! collection's creator; see `snapdex_core::moderation` for the state rules.

use serde::Deserialize;
use serde_json::Value;
use snapdex_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A pending item row, joined with its proposer's username.
#[derive(Debug, Clone, FromRow)]
pub struct PendingItem {
    pub id: DbId,
    pub collection_id: DbId,
    pub creator_id: Option<DbId>,
    pub creator_username: Option<String>,
    pub name: String,
    pub description: String,
    pub object_name: String,
    pub dominant_colors: Option<Value>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A pending item row locked `FOR UPDATE`, joined with the owning
/// collection's creator for the moderation permission check.
#[derive(Debug, Clone, FromRow)]
pub struct LockedPendingItem {
    pub id: DbId,
    pub collection_id: DbId,
    pub creator_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub object_name: String,
    pub dominant_colors: Option<Value>,
    pub status: String,
    pub collection_creator_id: Option<DbId>,
}

/// Owner pair used by the edit/delete permission check.
#[derive(Debug, Clone, FromRow)]
pub struct PendingItemOwners {
    pub creator_id: Option<DbId>,
    pub collection_creator_id: Option<DbId>,
}

/// Wire payload for proposing or editing a pending item. The status is
/// never part of the payload; it only changes through accept/refuse.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PendingItemInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(length(min = 1, max = 255))]
    pub object_name: String,
    pub dominant_colors: Option<Value>,
}

/// Insertable pending item fields. `collection_id` and `creator_id` are
/// injected server-side; `status` falls through to the column default.
#[derive(Debug, Clone)]
pub struct PendingItemDraft {
    pub collection_id: Option<DbId>,
    pub creator_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub object_name: String,
    pub dominant_colors: Option<Value>,
}

impl From<PendingItemInput> for PendingItemDraft {
    fn from(input: PendingItemInput) -> Self {
        Self {
            collection_id: None,
            creator_id: None,
            name: input.name,
            description: input.description,
            object_name: input.object_name,
            dominant_colors: input.dominant_colors,
        }
    }
}

/// Pending items expose no user-facing filters; listing visibility is
/// enforced by the queryset instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingItemFilter {}
