//! Media storage port - where featured images go.

use async_trait::async_trait;

use crate::error::StorageError;

/// A single file received with a request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Stores uploaded media and hands back the public path it is served from.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Persist `file`, returning a relative public path such as
    /// `/uploads/1700000000000-photo.png`.
    async fn store(&self, file: UploadedFile) -> Result<String, StorageError>;

    /// Delete a file previously returned by [`MediaStorage::store`]. A file
    /// that is already gone is not an error.
    async fn remove(&self, path: &str) -> Result<(), StorageError>;
}
