//! Collection entity model and DTOs.

use serde::Deserialize;
use serde_json::Value;
use snapdex_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A collection row, joined with its creator's username and a live
/// `nb_items` aggregate.
#[derive(Debug, Clone, FromRow)]
pub struct Collection {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub object_name: Option<String>,
    pub dominant_colors: Option<Value>,
    pub creator_id: Option<DbId>,
    pub creator_username: Option<String>,
    pub nb_items: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wire payload for creating or replacing a collection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CollectionInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(length(max = 255))]
    pub object_name: Option<String>,
    pub dominant_colors: Option<Value>,
}

/// Insertable collection fields. `creator_id` is injected server-side,
/// never taken from the payload.
#[derive(Debug, Clone)]
pub struct CollectionDraft {
    pub name: String,
    pub description: String,
    pub object_name: Option<String>,
    pub dominant_colors: Option<Value>,
    pub creator_id: Option<DbId>,
}

impl From<CollectionInput> for CollectionDraft {
    fn from(input: CollectionInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            object_name: input.object_name,
            dominant_colors: input.dominant_colors,
            creator_id: None,
        }
    }
}

/// Listing filters for collections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionFilter {
    /// Case-insensitive substring match on the name.
    pub name: Option<String>,
}
