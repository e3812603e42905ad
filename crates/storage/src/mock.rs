//! Deterministic in-memory storage double for tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{ObjectStorage, PresignedUpload, StorageError};

/// Fake [`ObjectStorage`] producing stable, parseable URLs without any
/// network access.
#[derive(Debug, Clone)]
pub struct MockStorage {
    base_url: String,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            base_url: "https://storage.invalid/snapdex".to_string(),
        }
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn presign_get(&self, object_name: &str) -> Result<String, StorageError> {
        Ok(format!("{}/{object_name}?signature=mock", self.base_url))
    }

    async fn presign_upload(
        &self,
        object_name: &str,
        content_type: &str,
    ) -> Result<PresignedUpload, StorageError> {
        let mut fields = HashMap::new();
        fields.insert("Content-Type".to_string(), content_type.to_string());

        Ok(PresignedUpload {
            url: format!("{}/{object_name}", self.base_url),
            fields,
        })
    }
}
