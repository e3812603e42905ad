//! Viewset declaration for the `/items` resource.
//!
//! Items are created and listed under their collection
//! (`/collections/{id}/items`); the top-level routes cover retrieve,
//! replace and delete, restricted to the owning collection's creator.
//! `GET /items/{id}/snap` resolves the caller's own snap.

use axum::routing::get;
use axum::Router;
use serde::Serialize;
use serde_json::Value;

use snapdex_core::error::CoreError;
use snapdex_core::pagination::{build_order_clause, Listing, PageParams};
use snapdex_core::types::{DbId, Timestamp};
use snapdex_db::models::item::{Item, ItemDraft, ItemFilter, ItemInput};
use snapdex_db::repositories::ItemRepo;

use crate::error::AppError;
use crate::handlers;
use crate::state::AppState;
use crate::viewset::{
    guard, CreateView, DeleteView, FetchSource, Guard, ListSource, ListView, Resource,
    RetrieveView, UpdateView, ViewResource, WriteSource,
};

use super::{collections, snaps};

/// Wire representation of an item.
#[derive(Debug, Serialize)]
pub struct ItemOutput {
    pub id: DbId,
    pub collection_id: DbId,
    pub name: String,
    pub description: String,
    pub object_name: String,
    pub presigned_url: String,
    pub dominant_colors: Option<Value>,
    pub nb_snaps: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Marker type binding the item entity to its viewset contract.
pub struct Items;

#[async_trait::async_trait]
impl ViewResource for Items {
    const SINGULAR: &'static str = "item";
    const PLURAL: &'static str = "items";
    const DISPLAY: &'static str = "Item";

    type Record = Item;
    type Output = ItemOutput;

    async fn encode(state: &AppState, record: Item) -> Result<ItemOutput, AppError> {
        let presigned_url = state.storage.presign_get(&record.object_name).await?;
        Ok(ItemOutput {
            id: record.id,
            collection_id: record.collection_id,
            name: record.name,
            description: record.description,
            object_name: record.object_name,
            presigned_url,
            dominant_colors: record.dominant_colors,
            nb_snaps: record.nb_snaps,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[async_trait::async_trait]
impl ListSource for Items {
    type Filter = ItemFilter;

    async fn query(
        state: &AppState,
        parent: Option<DbId>,
        filter: &ItemFilter,
        page: &PageParams,
    ) -> Result<Listing<Item>, AppError> {
        let order = build_order_clause(
            page.order_by.as_deref(),
            ItemRepo::ORDERABLE,
            ItemRepo::DEFAULT_ORDER,
        )?;
        Ok(ItemRepo::list(&state.pool, parent, filter, &order, page.limit(), page.offset()).await?)
    }
}

#[async_trait::async_trait]
impl FetchSource for Items {
    async fn find(state: &AppState, id: DbId) -> Result<Option<Item>, AppError> {
        Ok(ItemRepo::find_by_id(&state.pool, id).await?)
    }
}

#[async_trait::async_trait]
impl WriteSource for Items {
    type Input = ItemInput;
    type Draft = ItemDraft;

    async fn insert(state: &AppState, draft: ItemDraft) -> Result<Item, AppError> {
        Ok(ItemRepo::create(&state.pool, &draft).await?)
    }

    async fn replace(
        state: &AppState,
        id: DbId,
        input: ItemInput,
    ) -> Result<Option<Item>, AppError> {
        Ok(ItemRepo::update(&state.pool, id, &input).await?)
    }

    async fn remove(state: &AppState, id: DbId) -> Result<bool, AppError> {
        Ok(ItemRepo::delete(&state.pool, id).await?)
    }
}

/// Only the creator of the collection an item belongs to may pass.
pub fn item_collection_creator_only() -> Guard {
    guard(|state, auth, id| async move {
        let id =
            id.ok_or_else(|| AppError::Internal("item guard called without an id".into()))?;
        let creator = ItemRepo::find_collection_creator(&state.pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Item", id })?;
        if creator != Some(auth.user_id) {
            return Err(CoreError::Forbidden(
                "Only the collection creator may modify an item".into(),
            )
            .into());
        }
        Ok(())
    })
}

/// `GET /collections/{id}/items`.
pub fn nested_list_view() -> ListView<Items> {
    ListView::new()
}

/// `POST /collections/{id}/items` -- collection creator only.
pub fn nested_create_view() -> CreateView<Items> {
    CreateView::new()
        .guard(collections::collection_creator_only())
        .pre_save(|_auth, parent, draft: &mut ItemDraft| {
            draft.collection_id = parent;
        })
}

/// Declarative route set for items.
pub fn resource() -> Resource<Items> {
    Resource::new()
        .retrieve(RetrieveView::new())
        .update(UpdateView::new().guard(item_collection_creator_only()))
        .delete(DeleteView::new().guard(item_collection_creator_only()))
        .nest_list(snaps::nested_list_view())
        .nest_create(snaps::nested_create_view())
}

/// Routes mounted at `/items`.
pub fn router() -> Router<AppState> {
    resource()
        .register()
        .0
        .route("/{id}/snap", get(handlers::snaps::retrieve_my_snap))
}
