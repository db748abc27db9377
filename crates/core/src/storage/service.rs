//! Storage service implementation using Apache OpenDAL.

use std::future::Future;

use bytes::Bytes;
use opendal::{Operator, services};
use serde::Serialize;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Result of removing an object, returned to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRemoval {
    /// Key of the removed object.
    pub key: String,
    /// Bucket (or local root) the object was removed from.
    pub bucket: String,
    /// Storage provider name.
    pub provider: String,
}

/// Object store operations the attachment pipeline depends on.
///
/// Implemented by [`StorageService`]; tests substitute recording fakes.
pub trait ObjectStore: Send + Sync {
    /// Reject uploads the store will not accept.
    fn validate_upload(&self, size: u64) -> Result<(), StorageError>;

    /// Store `bytes` under `key` and return the URL the object is retrievable at.
    fn upload(
        &self,
        key: &str,
        bytes: Bytes,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Remove the object stored under `key`.
    fn remove(&self, key: &str)
    -> impl Future<Output = Result<ObjectRemoval, StorageError>> + Send;
}

/// Storage service for attachment bytes.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("provider", &self.config.provider.name())
            .field("bucket", &self.config.provider.bucket())
            .field("max_file_size", &self.config.max_file_size)
            .finish_non_exhaustive()
    }
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Retrieval URL for an object key.
    #[must_use]
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{key}", self.config.base_url())
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

impl ObjectStore for StorageService {
    fn validate_upload(&self, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }
        Ok(())
    }

    async fn upload(&self, key: &str, bytes: Bytes) -> Result<String, StorageError> {
        self.operator
            .write(key, bytes)
            .await
            .map_err(StorageError::from)?;
        Ok(self.object_url(key))
    }

    async fn remove(&self, key: &str) -> Result<ObjectRemoval, StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)?;
        Ok(ObjectRemoval {
            key: key.to_string(),
            bucket: self.bucket().to_string(),
            provider: self.provider_name().to_string(),
        })
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Retrieval URLs are the base URL joined to the key with exactly one slash.
    proptest! {
        #[test]
        fn prop_object_url_appends_key(
            base in "https://[a-z]{1,12}\\.example\\.com/?",
            key in "[a-zA-Z0-9_-]{1,32}\\.[a-z]{2,4}",
        ) {
            let config = StorageConfig::new(StorageProvider::local_fs("./test"))
                .with_public_url(base.clone());
            let service = StorageService::from_config(config).expect("should create service");

            let url = service.object_url(&key);
            prop_assert_eq!(url, format!("{}/{}", base.trim_end_matches('/'), key));
        }
    }

    // Uploads at or under the limit are accepted; anything larger is rejected.
    proptest! {
        #[test]
        fn prop_file_size_validation(
            max_size in 1024u64..10_000_000,
            file_size in 0u64..20_000_000,
        ) {
            let config = StorageConfig::new(StorageProvider::local_fs("./test"))
                .with_max_file_size(max_size);
            let service = StorageService::from_config(config).expect("should create service");

            let result = service.validate_upload(file_size);

            if file_size <= max_size {
                prop_assert!(result.is_ok(), "Expected Ok for valid file size");
            } else {
                let is_too_large = matches!(result, Err(StorageError::FileTooLarge { .. }));
                prop_assert!(is_too_large, "Expected FileTooLarge error");
            }
        }
    }
}
