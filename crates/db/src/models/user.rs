//! User entity model and DTOs.

use serde::Deserialize;
use snapdex_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub picture_object_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insertable user fields. The password is hashed by the API layer before
/// it reaches this crate.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Wire payload for `PUT /users/me` (full profile replacement).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserProfile {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 255))]
    pub picture_object_name: Option<String>,
}
