//! Caller-scoped snap and like lookups.
//!
//! A user has at most one snap per item and one reaction per snap, so these
//! endpoints address "my row" without an id: `GET /items/{id}/snap`,
//! `GET|POST|DELETE /snaps/{id}/like(s)`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use snapdex_core::error::CoreError;
use snapdex_core::types::DbId;
use snapdex_db::models::like::LikeInput;
use snapdex_db::repositories::{LikeRepo, SnapRepo};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::routes::likes::{LikeOutput, Likes};
use crate::routes::snaps::{SnapOutput, Snaps};
use crate::state::AppState;
use crate::viewset::ViewResource;

/// GET /api/v1/items/{id}/snap
///
/// The caller's own snap on an item.
pub async fn retrieve_my_snap(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SnapOutput>> {
    let snap = SnapRepo::find_by_item_and_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Snap", id })?;
    Ok(Json(Snaps::encode(&state, snap).await?))
}

/// POST /api/v1/snaps/{id}/likes
///
/// Upsert the caller's reaction on a snap: the first call creates the row,
/// subsequent calls flip its `liked` flag. A missing snap surfaces as 404
/// through the foreign key.
pub async fn upsert_my_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<LikeInput>,
) -> AppResult<Json<LikeOutput>> {
    let like = LikeRepo::upsert(&state.pool, id, auth.user_id, input.liked).await?;

    tracing::debug!(snap_id = %id, user_id = %auth.user_id, liked = like.liked, "Reaction set");

    Ok(Json(Likes::encode(&state, like).await?))
}

/// GET /api/v1/snaps/{id}/like
///
/// The caller's own reaction on a snap.
pub async fn retrieve_my_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<LikeOutput>> {
    let like = LikeRepo::find_by_snap_and_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Like", id })?;
    Ok(Json(Likes::encode(&state, like).await?))
}

/// DELETE /api/v1/snaps/{id}/like
///
/// Remove the caller's reaction on a snap.
pub async fn delete_my_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = LikeRepo::delete_by_snap_and_user(&state.pool, id, auth.user_id).await?;
    if !removed {
        return Err(CoreError::NotFound { entity: "Like", id }.into());
    }
    Ok(StatusCode::NO_CONTENT)
}
