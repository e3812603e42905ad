use std::sync::Arc;

use snapdex_core::notification::Notifier;
use snapdex_storage::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: snapdex_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object-storage provider (presigned URL issuance).
    pub storage: Arc<dyn ObjectStorage>,
    /// Outbound notification delivery (best-effort).
    pub notifier: Arc<dyn Notifier>,
}
