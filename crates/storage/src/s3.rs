//! AWS S3 implementation of [`ObjectStorage`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use tokio::sync::RwLock;

use crate::{ObjectStorage, PresignedUpload, StorageConfig, StorageError};

/// A memoized presigned GET URL.
struct CachedUrl {
    url: String,
    expires_at: Instant,
}

/// S3-compatible storage client.
///
/// Presigned GET URLs are memoized per object name for the lifetime of the
/// URL itself. Entries expire purely by TTL; a cache miss just re-signs, so
/// correctness never depends on a hit.
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    url_expiry: Duration,
    get_cache: RwLock<HashMap<String, CachedUrl>>,
}

impl S3Storage {
    /// Connect using the explicit credentials from `config`.
    pub async fn connect(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "snapdex-storage",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let shared = loader.load().await;

        // Path-style addressing keeps MinIO and other S3-compatible
        // endpoints working without wildcard DNS.
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            url_expiry: Duration::from_secs(config.url_expiry_secs),
            get_cache: RwLock::new(HashMap::new()),
        }
    }

    fn presigning_config(&self) -> Result<PresigningConfig, StorageError> {
        PresigningConfig::expires_in(self.url_expiry)
            .map_err(|e| StorageError::Presign(e.to_string()))
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn presign_get(&self, object_name: &str) -> Result<String, StorageError> {
        let now = Instant::now();
        {
            let cache = self.get_cache.read().await;
            if let Some(entry) = cache.get(object_name) {
                if entry.expires_at > now {
                    return Ok(entry.url.clone());
                }
            }
        }

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_name)
            .presigned(self.presigning_config()?)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;
        let url = request.uri().to_string();

        let mut cache = self.get_cache.write().await;
        cache.retain(|_, entry| entry.expires_at > now);
        cache.insert(
            object_name.to_string(),
            CachedUrl {
                url: url.clone(),
                expires_at: now + self.url_expiry,
            },
        );
        Ok(url)
    }

    async fn presign_upload(
        &self,
        object_name: &str,
        content_type: &str,
    ) -> Result<PresignedUpload, StorageError> {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(object_name)
            .content_type(content_type)
            .presigned(self.presigning_config()?)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let mut fields = HashMap::new();
        fields.insert("Content-Type".to_string(), content_type.to_string());

        Ok(PresignedUpload {
            url: request.uri().to_string(),
            fields,
        })
    }
}
