//! Request handlers for endpoints that fall outside the generated CRUD
//! surface: authentication, user profiles, the moderation decisions, the
//! caller-scoped snap/like lookups, and presigned upload URLs.
//!
//! Handlers delegate to the repositories in `snapdex_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod auth;
pub mod pending_items;
pub mod snaps;
pub mod storage;
pub mod users;
