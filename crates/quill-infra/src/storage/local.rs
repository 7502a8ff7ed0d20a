//! Local filesystem store for uploaded images.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use quill_core::ports::{FileStore, StorageError};

/// Stores files flat inside a single directory.
///
/// Names are joined onto the root as-is; callers are expected to pass plain
/// file names only.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn io_err(e: std::io::Error) -> StorageError {
    StorageError::Io(e.to_string())
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(io_err)?;
        tokio::fs::write(self.path_of(name), bytes)
            .await
            .map_err(io_err)
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.path_of(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(e)),
        }
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        match tokio::fs::remove_file(self.path_of(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_err(e)),
        }
    }
}
