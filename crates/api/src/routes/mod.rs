//! Route tree for the `/api/v1` API surface.
//!
//! Route hierarchy:
//!
//! ```text
//! /auth/login                              login (public)
//! /auth/refresh                            refresh (public)
//! /auth/logout                             logout
//!
//! /users                                   register (public)
//! /users/me                                get, replace own profile
//! /users/{id}                              public profile
//!
//! /collections                             list, create
//! /collections/{id}                        get, update, delete (creator only)
//! /collections/{id}/items                  list, create (creator only)
//! /collections/{id}/pending-items          list (visibility rule), propose
//!
//! /items/{id}                              get, update, delete (creator only)
//! /items/{id}/snaps                        list, create (one per user)
//! /items/{id}/snap                         the caller's own snap
//!
//! /pending-items/{id}                      update, delete (proposer or creator)
//! /pending-items/{id}/accept               accept (creator, exactly once)
//! /pending-items/{id}/refuse               refuse (creator, exactly once)
//!
//! /snaps/{id}                              get, update, delete (owner or creator)
//! /snaps/{id}/likes                        list, upsert the caller's reaction
//! /snaps/{id}/like                         get, delete the caller's reaction
//!
//! /presigned-url                           presigned upload slot
//! ```
//!
//! The CRUD routes are generated from the viewset declarations in each
//! submodule; [`route_table`] exposes their deterministic metadata.

pub mod auth;
pub mod collections;
pub mod health;
pub mod items;
pub mod likes;
pub mod pending_items;
pub mod snaps;
pub mod users;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::viewset::RouteEntry;

/// Build the `/api/v1` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/collections", collections::router())
        .nest("/items", items::router())
        .nest("/pending-items", pending_items::router())
        .nest("/snaps", snaps::router())
        .route(
            "/presigned-url",
            post(handlers::storage::generate_upload_presigned_url),
        )
}

/// Deterministic table of every viewset-registered route, with paths
/// prefixed by their mount point.
pub fn route_table() -> Vec<RouteEntry> {
    let mut table = Vec::new();
    let sections = [
        ("/collections", collections::resource().register().1),
        ("/items", items::resource().register().1),
        ("/pending-items", pending_items::resource().register().1),
        ("/snaps", snaps::resource().register().1),
    ];
    for (mount, entries) in sections {
        for mut entry in entries {
            let suffix = if entry.path == "/" { "" } else { entry.path.as_str() };
            entry.path = format!("{mount}{suffix}");
            table.push(entry);
        }
    }
    table
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
