//! Object storage trait definitions

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Storage error: {0}")]
    Other(String),
}

/// An object fetched from storage
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

/// Read-only object storage capability.
///
/// This trait is object-safe and can be used as `Arc<dyn ObjectStore>`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object stored under `key` in `bucket`
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError>;
}

