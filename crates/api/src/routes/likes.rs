//! Like views, nested under snaps.
//!
//! Likes have no standalone routes: they are listed under their snap
//! (`GET /snaps/{id}/likes`, with a `liked` filter) and written through the
//! caller-scoped upsert in `handlers::snaps`.

use serde::Serialize;

use snapdex_core::pagination::{build_order_clause, Listing, PageParams};
use snapdex_core::types::{DbId, Timestamp};
use snapdex_db::models::like::{Like, LikeFilter};
use snapdex_db::repositories::LikeRepo;

use crate::error::AppError;
use crate::handlers::users::UserSlim;
use crate::state::AppState;
use crate::viewset::{ListSource, ListView, ViewResource};

/// Wire representation of a like.
#[derive(Debug, Serialize)]
pub struct LikeOutput {
    pub id: DbId,
    pub snap_id: DbId,
    pub user: UserSlim,
    pub liked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Marker type binding the like entity to its viewset contract.
pub struct Likes;

#[async_trait::async_trait]
impl ViewResource for Likes {
    const SINGULAR: &'static str = "like";
    const PLURAL: &'static str = "likes";
    const DISPLAY: &'static str = "Like";

    type Record = Like;
    type Output = LikeOutput;

    async fn encode(_state: &AppState, record: Like) -> Result<LikeOutput, AppError> {
        Ok(LikeOutput {
            id: record.id,
            snap_id: record.snap_id,
            user: UserSlim {
                id: record.user_id,
                username: record.user_username,
            },
            liked: record.liked,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[async_trait::async_trait]
impl ListSource for Likes {
    type Filter = LikeFilter;

    async fn query(
        state: &AppState,
        parent: Option<DbId>,
        filter: &LikeFilter,
        page: &PageParams,
    ) -> Result<Listing<Like>, AppError> {
        let order = build_order_clause(
            page.order_by.as_deref(),
            LikeRepo::ORDERABLE,
            LikeRepo::DEFAULT_ORDER,
        )?;
        Ok(LikeRepo::list(&state.pool, parent, filter, &order, page.limit(), page.offset()).await?)
    }
}

/// `GET /snaps/{id}/likes`.
pub fn nested_list_view() -> ListView<Likes> {
    ListView::new()
}
