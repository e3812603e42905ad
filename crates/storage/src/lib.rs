//! Object-storage provider abstraction.
//!
//! The API layer depends on [`ObjectStorage`] only. [`s3::S3Storage`] is the
//! production implementation (AWS or any S3-compatible endpoint such as
//! MinIO); [`mock::MockStorage`] is a deterministic test double.

pub mod mock;
pub mod s3;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

pub use mock::MockStorage;
pub use s3::S3Storage;

/// Default lifetime of presigned URLs, in seconds.
pub const DEFAULT_URL_EXPIRY_SECS: u64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Presigning failed: {0}")]
    Presign(String),
}

/// A presigned upload slot: the URL to send the file to, plus the headers
/// the client must echo for the signature to match.
#[derive(Debug, Clone, Serialize)]
pub struct PresignedUpload {
    pub url: String,
    pub fields: HashMap<String, String>,
}

/// Connection settings for the object-storage provider.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers. `None` targets AWS.
    pub endpoint_url: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Presigned URL lifetime in seconds.
    pub url_expiry_secs: u64,
}

impl StorageConfig {
    /// Load storage settings from environment variables.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `STORAGE_BUCKET`        | `snapdex`               |
    /// | `STORAGE_REGION`        | `eu-west-1`             |
    /// | `STORAGE_ENDPOINT_URL`  | unset (AWS)             |
    /// | `STORAGE_ACCESS_KEY`    | `minioadmin`            |
    /// | `STORAGE_SECRET_KEY`    | `minioadmin`            |
    /// | `STORAGE_URL_EXPIRY_SECS` | `3600`                |
    pub fn from_env() -> Self {
        let bucket = std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "snapdex".into());
        let region = std::env::var("STORAGE_REGION").unwrap_or_else(|_| "eu-west-1".into());
        let endpoint_url = std::env::var("STORAGE_ENDPOINT_URL").ok();
        let access_key_id =
            std::env::var("STORAGE_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".into());
        let secret_access_key =
            std::env::var("STORAGE_SECRET_KEY").unwrap_or_else(|_| "minioadmin".into());

        let url_expiry_secs: u64 = std::env::var("STORAGE_URL_EXPIRY_SECS")
            .unwrap_or_else(|_| DEFAULT_URL_EXPIRY_SECS.to_string())
            .parse()
            .expect("STORAGE_URL_EXPIRY_SECS must be a valid u64");

        Self {
            bucket,
            region,
            endpoint_url,
            access_key_id,
            secret_access_key,
            url_expiry_secs,
        }
    }
}

/// Capabilities the backend needs from object storage.
///
/// Uploads and downloads never proxy through this service; clients talk to
/// the bucket directly with time-limited presigned URLs.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Presigned, time-limited GET URL for an existing object.
    async fn presign_get(&self, object_name: &str) -> Result<String, StorageError>;

    /// Presigned upload slot for a new object with the given content type.
    async fn presign_upload(
        &self,
        object_name: &str,
        content_type: &str,
    ) -> Result<PresignedUpload, StorageError>;
}
