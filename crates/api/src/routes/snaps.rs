//! Viewset declaration for the `/snaps` resource.
//!
//! Snaps are created and listed under their item (`/items/{id}/snaps`,
//! one per user per item). Top-level routes cover retrieve, replace and
//! delete -- allowed to the snap's author or the collection creator --
//! plus the caller-scoped reaction endpoints under `/{id}/like(s)`.

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use serde_json::Value;

use snapdex_core::error::CoreError;
use snapdex_core::pagination::{build_order_clause, Listing, PageParams};
use snapdex_core::types::{DbId, Timestamp};
use snapdex_db::models::snap::{Snap, SnapDraft, SnapFilter, SnapInput};
use snapdex_db::repositories::SnapRepo;

use crate::error::AppError;
use crate::handlers;
use crate::handlers::users::UserSlim;
use crate::state::AppState;
use crate::viewset::{
    guard, CreateView, DeleteView, FetchSource, Guard, ListSource, ListView, Resource,
    RetrieveView, UpdateView, ViewResource, WriteSource,
};

use super::likes;

/// Wire representation of a snap.
#[derive(Debug, Serialize)]
pub struct SnapOutput {
    pub id: DbId,
    pub item_id: DbId,
    pub comment: String,
    pub object_name: String,
    pub presigned_url: String,
    pub dominant_colors: Option<Value>,
    pub user: UserSlim,
    pub nb_likes: i64,
    pub nb_dislikes: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Marker type binding the snap entity to its viewset contract.
pub struct Snaps;

#[async_trait::async_trait]
impl ViewResource for Snaps {
    const SINGULAR: &'static str = "snap";
    const PLURAL: &'static str = "snaps";
    const DISPLAY: &'static str = "Snap";

    type Record = Snap;
    type Output = SnapOutput;

    async fn encode(state: &AppState, record: Snap) -> Result<SnapOutput, AppError> {
        let presigned_url = state.storage.presign_get(&record.object_name).await?;
        Ok(SnapOutput {
            id: record.id,
            item_id: record.item_id,
            comment: record.comment,
            object_name: record.object_name,
            presigned_url,
            dominant_colors: record.dominant_colors,
            user: UserSlim {
                id: record.user_id,
                username: record.user_username,
            },
            nb_likes: record.nb_likes,
            nb_dislikes: record.nb_dislikes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[async_trait::async_trait]
impl ListSource for Snaps {
    type Filter = SnapFilter;

    async fn query(
        state: &AppState,
        parent: Option<DbId>,
        _filter: &SnapFilter,
        page: &PageParams,
    ) -> Result<Listing<Snap>, AppError> {
        let order = build_order_clause(
            page.order_by.as_deref(),
            SnapRepo::ORDERABLE,
            SnapRepo::DEFAULT_ORDER,
        )?;
        Ok(SnapRepo::list(&state.pool, parent, &order, page.limit(), page.offset()).await?)
    }
}

#[async_trait::async_trait]
impl FetchSource for Snaps {
    async fn find(state: &AppState, id: DbId) -> Result<Option<Snap>, AppError> {
        Ok(SnapRepo::find_by_id(&state.pool, id).await?)
    }
}

#[async_trait::async_trait]
impl WriteSource for Snaps {
    type Input = SnapInput;
    type Draft = SnapDraft;

    async fn insert(state: &AppState, draft: SnapDraft) -> Result<Snap, AppError> {
        Ok(SnapRepo::create(&state.pool, &draft).await?)
    }

    async fn replace(
        state: &AppState,
        id: DbId,
        input: SnapInput,
    ) -> Result<Option<Snap>, AppError> {
        Ok(SnapRepo::update(&state.pool, id, &input).await?)
    }

    async fn remove(state: &AppState, id: DbId) -> Result<bool, AppError> {
        Ok(SnapRepo::delete(&state.pool, id).await?)
    }
}

/// The snap's author or the collection creator may pass.
pub fn snap_owner_or_collection_creator() -> Guard {
    guard(|state, auth, id| async move {
        let id =
            id.ok_or_else(|| AppError::Internal("snap guard called without an id".into()))?;
        let owners = SnapRepo::find_owners(&state.pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Snap", id })?;
        if owners.user_id != auth.user_id
            && owners.collection_creator_id != Some(auth.user_id)
        {
            return Err(CoreError::Forbidden(
                "Only the snap owner or the collection creator may modify it".into(),
            )
            .into());
        }
        Ok(())
    })
}

/// `GET /items/{id}/snaps`.
pub fn nested_list_view() -> ListView<Snaps> {
    ListView::new()
}

/// `POST /items/{id}/snaps` -- any authenticated user, one snap per item.
pub fn nested_create_view() -> CreateView<Snaps> {
    CreateView::new().pre_save(|auth, parent, draft: &mut SnapDraft| {
        draft.item_id = parent;
        draft.user_id = Some(auth.user_id);
    })
}

/// Declarative route set for snaps.
pub fn resource() -> Resource<Snaps> {
    Resource::new()
        .retrieve(RetrieveView::new())
        .update(UpdateView::new().guard(snap_owner_or_collection_creator()))
        .delete(DeleteView::new().guard(snap_owner_or_collection_creator()))
        .nest_list(likes::nested_list_view())
}

/// Routes mounted at `/snaps`.
pub fn router() -> Router<AppState> {
    resource()
        .register()
        .0
        .route("/{id}/likes", post(handlers::snaps::upsert_my_like))
        .route(
            "/{id}/like",
            get(handlers::snaps::retrieve_my_like).delete(handlers::snaps::delete_my_like),
        )
}
