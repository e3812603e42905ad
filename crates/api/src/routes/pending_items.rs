//! Viewset declaration for the `/pending-items` resource.
//!
//! Proposals are created and listed under their collection
//! (`/collections/{id}/pending-items`). Top-level routes cover edit and
//! withdraw -- allowed to the proposer or the collection creator in any
//! status -- plus the accept/refuse decision endpoints.

use axum::routing::put;
use axum::Router;
use serde::Serialize;
use serde_json::Value;

use snapdex_core::error::CoreError;
use snapdex_core::pagination::{build_order_clause, Listing, PageParams};
use snapdex_core::types::{DbId, Timestamp};
use snapdex_db::models::pending_item::{
    PendingItem, PendingItemDraft, PendingItemFilter, PendingItemInput,
};
use snapdex_db::repositories::{CollectionRepo, PendingItemRepo};

use crate::error::AppError;
use crate::handlers;
use crate::handlers::users::UserSlim;
use crate::state::AppState;
use crate::viewset::{
    guard, CreateView, DeleteView, Guard, ListSource, ListView, Resource, UpdateView,
    ViewResource, WriteSource,
};

/// Wire representation of a pending item.
#[derive(Debug, Serialize)]
pub struct PendingItemOutput {
    pub id: DbId,
    pub collection_id: DbId,
    pub name: String,
    pub description: String,
    pub object_name: String,
    pub presigned_url: String,
    pub dominant_colors: Option<Value>,
    pub status: String,
    pub creator: Option<UserSlim>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Marker type binding the pending item entity to its viewset contract.
pub struct PendingItems;

#[async_trait::async_trait]
impl ViewResource for PendingItems {
    const SINGULAR: &'static str = "pending_item";
    const PLURAL: &'static str = "pending_items";
    const DISPLAY: &'static str = "Pending item";

    type Record = PendingItem;
    type Output = PendingItemOutput;

    async fn encode(state: &AppState, record: PendingItem) -> Result<PendingItemOutput, AppError> {
        let presigned_url = state.storage.presign_get(&record.object_name).await?;
        Ok(PendingItemOutput {
            id: record.id,
            collection_id: record.collection_id,
            name: record.name,
            description: record.description,
            object_name: record.object_name,
            presigned_url,
            dominant_colors: record.dominant_colors,
            status: record.status,
            creator: UserSlim::from_parts(record.creator_id, record.creator_username),
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[async_trait::async_trait]
impl ListSource for PendingItems {
    type Filter = PendingItemFilter;

    async fn query(
        state: &AppState,
        parent: Option<DbId>,
        _filter: &PendingItemFilter,
        page: &PageParams,
    ) -> Result<Listing<PendingItem>, AppError> {
        let collection_id = parent.ok_or_else(|| {
            AppError::Internal("pending items are only listed under a collection".into())
        })?;
        let order = default_order(page)?;
        Ok(PendingItemRepo::list_for_collection(
            &state.pool,
            collection_id,
            None,
            &order,
            page.limit(),
            page.offset(),
        )
        .await?)
    }
}

#[async_trait::async_trait]
impl WriteSource for PendingItems {
    type Input = PendingItemInput;
    type Draft = PendingItemDraft;

    async fn insert(state: &AppState, draft: PendingItemDraft) -> Result<PendingItem, AppError> {
        Ok(PendingItemRepo::create(&state.pool, &draft).await?)
    }

    async fn replace(
        state: &AppState,
        id: DbId,
        input: PendingItemInput,
    ) -> Result<Option<PendingItem>, AppError> {
        Ok(PendingItemRepo::update(&state.pool, id, &input).await?)
    }

    async fn remove(state: &AppState, id: DbId) -> Result<bool, AppError> {
        Ok(PendingItemRepo::delete(&state.pool, id).await?)
    }
}

fn default_order(page: &PageParams) -> Result<String, AppError> {
    Ok(build_order_clause(
        page.order_by.as_deref(),
        PendingItemRepo::ORDERABLE,
        PendingItemRepo::DEFAULT_ORDER,
    )?)
}

/// The proposer or the collection creator may pass. The proposal stays
/// editable in any status; terminal states only forbid further decisions.
pub fn proposer_or_collection_creator() -> Guard {
    guard(|state, auth, id| async move {
        let id = id.ok_or_else(|| {
            AppError::Internal("pending item guard called without an id".into())
        })?;
        let owners = PendingItemRepo::find_owners(&state.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Pending item",
                id,
            })?;
        let caller = Some(auth.user_id);
        if owners.creator_id != caller && owners.collection_creator_id != caller {
            return Err(CoreError::Forbidden(
                "Only the proposer or the collection creator may modify a pending item".into(),
            )
            .into());
        }
        Ok(())
    })
}

/// `GET /collections/{id}/pending-items`.
///
/// Visibility rule: the collection creator reviews everything, other users
/// only see their own proposals. The collection is dereferenced here, so a
/// missing parent is a 404.
pub fn nested_list_view() -> ListView<PendingItems> {
    ListView::new().queryset(|state, auth, parent, _filter: PendingItemFilter, page| async move {
        let collection_id = parent.ok_or_else(|| {
            AppError::Internal("pending items are only listed under a collection".into())
        })?;
        let collection = CollectionRepo::find_by_id(&state.pool, collection_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Collection",
                id: collection_id,
            })?;
        let proposer = if collection.creator_id == Some(auth.user_id) {
            None
        } else {
            Some(auth.user_id)
        };
        let order = default_order(&page)?;
        Ok(PendingItemRepo::list_for_collection(
            &state.pool,
            collection_id,
            proposer,
            &order,
            page.limit(),
            page.offset(),
        )
        .await?)
    })
}

/// `POST /collections/{id}/pending-items` -- any authenticated user may
/// propose; the collection creator is notified.
pub fn nested_create_view() -> CreateView<PendingItems> {
    CreateView::new()
        .pre_save(|auth, parent, draft: &mut PendingItemDraft| {
            draft.collection_id = parent;
            draft.creator_id = Some(auth.user_id);
        })
        .post_save(|state, _auth, record: PendingItem| async move {
            if let Some(collection) = CollectionRepo::find_by_id(&state.pool, record.collection_id).await? {
                if let Some(creator_id) = collection.creator_id {
                    let message =
                        format!("New item '{}' proposed in '{}'", record.name, collection.name);
                    let payload = serde_json::json!({
                        "pending_item_id": record.id,
                        "collection_id": collection.id,
                    });
                    if !state.notifier.send(creator_id, &message, Some(&payload)).await {
                        tracing::warn!(%creator_id, "Could not deliver proposal notification");
                    }
                }
            }
            Ok(())
        })
}

/// Declarative route set for pending items (top-level edit/withdraw).
pub fn resource() -> Resource<PendingItems> {
    Resource::new()
        .update(UpdateView::new().guard(proposer_or_collection_creator()))
        .delete(DeleteView::new().guard(proposer_or_collection_creator()))
}

/// Routes mounted at `/pending-items`.
pub fn router() -> Router<AppState> {
    resource()
        .register()
        .0
        .route(
            "/{id}/accept",
            put(handlers::pending_items::accept_pending_item),
        )
        .route(
            "/{id}/refuse",
            put(handlers::pending_items::refuse_pending_item),
        )
}
