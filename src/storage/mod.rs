//! Object storage abstraction

mod filesystem;
mod s3;
mod traits;

pub use filesystem::FilesystemBackend;
pub use s3::S3Backend;
pub use traits::{ObjectStore, StorageError, StoredObject};

use crate::config::StorageConfig;
use std::sync::Arc;

/// Build the configured object store.
pub async fn from_config(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config {
        StorageConfig::Filesystem { path } => {
            Ok(Arc::new(FilesystemBackend::new(path.clone()).await?))
        }
        StorageConfig::S3 { .. } => Ok(Arc::new(S3Backend::new(config)?)),
    }
}
