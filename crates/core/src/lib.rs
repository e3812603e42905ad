//! Domain-level types and pure logic shared across the Snapdex backend.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the API layer, and any future CLI or worker tooling.

pub mod error;
pub mod moderation;
pub mod notification;
pub mod object_name;
pub mod pagination;
pub mod types;
