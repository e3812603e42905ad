//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Moderation-critical operations
//! take `&mut PgConnection` instead so the caller composes them inside one
//! transaction.

pub mod collection_repo;
pub mod item_repo;
pub mod like_repo;
pub mod pending_item_repo;
pub mod session_repo;
pub mod snap_repo;
pub mod user_repo;

pub use collection_repo::CollectionRepo;
pub use item_repo::ItemRepo;
pub use like_repo::LikeRepo;
pub use pending_item_repo::PendingItemRepo;
pub use session_repo::SessionRepo;
pub use snap_repo::SnapRepo;
pub use user_repo::UserRepo;
