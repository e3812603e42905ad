//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST /        -> register (public)
/// GET  /me      -> own profile
/// PUT  /me      -> replace own profile
/// GET  /{id}    -> public profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(users::register))
        .route("/me", get(users::me).put(users::update_me))
        .route("/{id}", get(users::get_by_id))
}
