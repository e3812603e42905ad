//! Item entity model and DTOs.

use serde::Deserialize;
use serde_json::Value;
use snapdex_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// An item row with a live `nb_snaps` aggregate.
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: DbId,
    pub collection_id: DbId,
    pub name: String,
    pub description: String,
    pub object_name: String,
    pub dominant_colors: Option<Value>,
    pub nb_snaps: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wire payload for creating or replacing an item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ItemInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(length(min = 1, max = 255))]
    pub object_name: String,
    pub dominant_colors: Option<Value>,
}

/// Insertable item fields. `collection_id` is bound to the parent route,
/// never taken from the payload.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub collection_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub object_name: String,
    pub dominant_colors: Option<Value>,
}

impl From<ItemInput> for ItemDraft {
    fn from(input: ItemInput) -> Self {
        Self {
            collection_id: None,
            name: input.name,
            description: input.description,
            object_name: input.object_name,
            dominant_colors: input.dominant_colors,
        }
    }
}

/// Listing filters for items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    /// Case-insensitive substring match on the name.
    pub name: Option<String>,
}
