//! Filesystem-based object storage for local development
//!
//! Storage layout:
//! ```text
//! {root}/{bucket}/{key}
//! ```
//!
//! Content types are guessed from the key's extension.

use super::traits::{ObjectStore, StorageError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

/// Filesystem object storage backend
pub struct FilesystemBackend {
    /// Root directory holding one subdirectory per bucket
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a backend rooted at `root`, creating the directory if needed.
    pub async fn new(root: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        debug!("FilesystemBackend initialized at {:?}", root);
        Ok(Self { root })
    }

    /// Map a bucket/key to a file under the root. Keys that would escape the
    /// bucket directory are treated as missing.
    fn object_path(&self, bucket: &str, key: &str) -> Option<PathBuf> {
        let relative = Path::new(bucket).join(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || bucket.is_empty() || key.is_empty() || bucket.contains('/') {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FilesystemBackend {
    #[instrument(skip(self))]
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        let not_found = || StorageError::NotFound(format!("{}/{}", bucket, key));
        let path = self.object_path(bucket, key).ok_or_else(not_found)?;

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => {
                // Reading a directory is a miss, not an I/O fault
                if fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
                    return Err(not_found());
                }
                return Err(StorageError::Io(e));
            }
        };

        let content_type = mime_guess::from_path(key)
            .first()
            .map(|mime| mime.essence_str().to_string());

        debug!("FS GET {}/{} ({} bytes)", bucket, key, data.len());
        Ok(StoredObject {
            body: Bytes::from(data),
            content_type,
        })
    }
}
