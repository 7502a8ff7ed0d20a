//! File storage port for uploaded images.

use async_trait::async_trait;

/// Flat, name-addressed blob store.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `bytes` under `name`, creating the backing location if needed.
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read a file; `None` if it does not exist.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Delete a file. Returns `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;
}

/// File storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),
}
