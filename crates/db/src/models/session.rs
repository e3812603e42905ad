//! User session model (refresh-token storage).

use snapdex_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `user_sessions` table. Only the SHA-256 hash of
/// the refresh token is stored; the plaintext never touches the database.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

/// Insertable session fields.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
