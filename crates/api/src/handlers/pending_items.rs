//! Handlers for the pending-item moderation decisions.
//!
//! Accept and refuse are the one read-modify-write in the domain that
//! multiple users can race on (the proposer double-clicking, two co-owned
//! browser tabs). Both handlers therefore lock the pending row `FOR UPDATE`
//! inside a single transaction: the losing request blocks on the lock,
//! then observes the already-decided status and fails with a 400. A failed
//! item insert (name collision) rolls the whole transaction back, so the
//! status never advances without its item.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use snapdex_core::error::CoreError;
use snapdex_core::moderation::{ensure_pending, PendingItemStatus};
use snapdex_core::types::DbId;
use snapdex_db::models::item::ItemDraft;
use snapdex_db::models::pending_item::LockedPendingItem;
use snapdex_db::repositories::{ItemRepo, PendingItemRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::routes::items::Items;
use crate::state::AppState;
use crate::viewset::ViewResource;

/// PUT /api/v1/pending-items/{id}/accept
///
/// Collection creator only. Materializes a real item from the proposal and
/// marks it accepted, atomically.
pub async fn accept_pending_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;

    let pending = lock_decidable(&mut tx, id, &auth).await?;

    let draft = ItemDraft {
        collection_id: Some(pending.collection_id),
        name: pending.name.clone(),
        description: pending.description.clone(),
        object_name: pending.object_name.clone(),
        dominant_colors: pending.dominant_colors.clone(),
    };
    let item = ItemRepo::create_in(&mut tx, &draft).await?;
    PendingItemRepo::set_status(&mut tx, id, PendingItemStatus::Accepted).await?;

    tx.commit().await?;

    tracing::info!(
        pending_item_id = %id,
        item_id = %item.id,
        user_id = %auth.user_id,
        "Pending item accepted"
    );

    notify_proposer(
        &state,
        &pending,
        &format!("Your item '{}' has been accepted", item.name),
    )
    .await;

    let output = Items::encode(&state, item).await?;
    Ok((StatusCode::CREATED, Json(output)))
}

/// PUT /api/v1/pending-items/{id}/refuse
///
/// Collection creator only. Marks the proposal refused; nothing is created.
pub async fn refuse_pending_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;

    let pending = lock_decidable(&mut tx, id, &auth).await?;

    PendingItemRepo::set_status(&mut tx, id, PendingItemStatus::Refused).await?;

    tx.commit().await?;

    tracing::info!(pending_item_id = %id, user_id = %auth.user_id, "Pending item refused");

    notify_proposer(
        &state,
        &pending,
        &format!("Your item '{}' has been refused", pending.name),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lock the pending row and verify the caller may decide on it: the row
/// must exist, the caller must be the collection's creator, and the status
/// must still be `pending`.
async fn lock_decidable(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: DbId,
    auth: &AuthUser,
) -> AppResult<LockedPendingItem> {
    let pending = PendingItemRepo::find_for_update(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Pending item",
            id,
        })?;

    if pending.collection_creator_id != Some(auth.user_id) {
        return Err(CoreError::Forbidden(
            "Only the collection creator may accept or refuse a pending item".into(),
        )
        .into());
    }

    ensure_pending(PendingItemStatus::parse(&pending.status)?)?;

    Ok(pending)
}

/// Tell the proposer about the decision. Best-effort: a failed delivery is
/// logged, never surfaced.
async fn notify_proposer(state: &AppState, pending: &LockedPendingItem, message: &str) {
    if let Some(proposer) = pending.creator_id {
        let payload = serde_json::json!({
            "pending_item_id": pending.id,
            "collection_id": pending.collection_id,
        });
        if !state.notifier.send(proposer, message, Some(&payload)).await {
            tracing::warn!(%proposer, "Could not deliver moderation notification");
        }
    }
}
