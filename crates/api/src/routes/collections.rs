//! Viewset declaration for the `/collections` resource.
//!
//! Collections carry the full CRUD surface plus two nested views: items
//! (creator-only create) and pending items (anyone may propose).

use axum::Router;
use serde::Serialize;
use serde_json::Value;

use snapdex_core::error::CoreError;
use snapdex_core::pagination::{build_order_clause, Listing, PageParams};
use snapdex_core::types::{DbId, Timestamp};
use snapdex_db::models::collection::{
    Collection, CollectionDraft, CollectionFilter, CollectionInput,
};
use snapdex_db::repositories::CollectionRepo;

use crate::error::AppError;
use crate::handlers::users::UserSlim;
use crate::state::AppState;
use crate::viewset::{
    guard, CreateView, DeleteView, FetchSource, Guard, ListSource, ListView, Resource,
    RetrieveView, UpdateView, ViewResource, WriteSource,
};

use super::{items, pending_items};

/// Wire representation of a collection.
#[derive(Debug, Serialize)]
pub struct CollectionOutput {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub object_name: Option<String>,
    pub presigned_url: Option<String>,
    pub dominant_colors: Option<Value>,
    pub creator: Option<UserSlim>,
    pub nb_items: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Marker type binding the collection entity to its viewset contract.
pub struct Collections;

#[async_trait::async_trait]
impl ViewResource for Collections {
    const SINGULAR: &'static str = "collection";
    const PLURAL: &'static str = "collections";
    const DISPLAY: &'static str = "Collection";

    type Record = Collection;
    type Output = CollectionOutput;

    async fn encode(state: &AppState, record: Collection) -> Result<CollectionOutput, AppError> {
        let presigned_url = match &record.object_name {
            Some(object_name) => Some(state.storage.presign_get(object_name).await?),
            None => None,
        };
        Ok(CollectionOutput {
            id: record.id,
            name: record.name,
            description: record.description,
            object_name: record.object_name,
            presigned_url,
            dominant_colors: record.dominant_colors,
            creator: UserSlim::from_parts(record.creator_id, record.creator_username),
            nb_items: record.nb_items,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[async_trait::async_trait]
impl ListSource for Collections {
    type Filter = CollectionFilter;

    async fn query(
        state: &AppState,
        _parent: Option<DbId>,
        filter: &CollectionFilter,
        page: &PageParams,
    ) -> Result<Listing<Collection>, AppError> {
        let order = build_order_clause(
            page.order_by.as_deref(),
            CollectionRepo::ORDERABLE,
            CollectionRepo::DEFAULT_ORDER,
        )?;
        Ok(CollectionRepo::list(&state.pool, filter, &order, page.limit(), page.offset()).await?)
    }
}

#[async_trait::async_trait]
impl FetchSource for Collections {
    async fn find(state: &AppState, id: DbId) -> Result<Option<Collection>, AppError> {
        Ok(CollectionRepo::find_by_id(&state.pool, id).await?)
    }
}

#[async_trait::async_trait]
impl WriteSource for Collections {
    type Input = CollectionInput;
    type Draft = CollectionDraft;

    async fn insert(state: &AppState, draft: CollectionDraft) -> Result<Collection, AppError> {
        Ok(CollectionRepo::create(&state.pool, &draft).await?)
    }

    async fn replace(
        state: &AppState,
        id: DbId,
        input: CollectionInput,
    ) -> Result<Option<Collection>, AppError> {
        Ok(CollectionRepo::update(&state.pool, id, &input).await?)
    }

    async fn remove(state: &AppState, id: DbId) -> Result<bool, AppError> {
        Ok(CollectionRepo::delete(&state.pool, id).await?)
    }
}

/// Only the collection's creator may pass. Doubles as the 404 source when
/// the collection id does not exist.
pub fn collection_creator_only() -> Guard {
    guard(|state, auth, id| async move {
        let id = id.ok_or_else(|| {
            AppError::Internal("collection guard called without an id".into())
        })?;
        let collection = CollectionRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Collection",
                id,
            })?;
        if collection.creator_id != Some(auth.user_id) {
            return Err(CoreError::Forbidden(
                "Only the collection creator may do this".into(),
            )
            .into());
        }
        Ok(())
    })
}

/// Declarative route set for collections.
pub fn resource() -> Resource<Collections> {
    Resource::new()
        .list(ListView::new())
        .create(
            CreateView::new().pre_save(|auth, _parent, draft: &mut CollectionDraft| {
                draft.creator_id = Some(auth.user_id);
            }),
        )
        .retrieve(RetrieveView::new())
        .update(UpdateView::new().guard(collection_creator_only()))
        .delete(DeleteView::new().guard(collection_creator_only()))
        .nest_list(items::nested_list_view())
        .nest_create(items::nested_create_view())
        .nest_list(pending_items::nested_list_view())
        .nest_create(pending_items::nested_create_view())
}

/// Routes mounted at `/collections`.
pub fn router() -> Router<AppState> {
    resource().register().0
}
