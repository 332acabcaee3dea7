//! Storage abstraction trait
//!
//! The store façade writes and removes files only through this trait, which
//! keeps the atomic-write discipline in one place and lets tests inject
//! failures.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` to `path`, creating parent directories as needed.
    ///
    /// The bytes go to a temporary sibling first and are renamed into place,
    /// so a reader never sees a partially written file under `path`.
    async fn write(&self, path: &Path, data: Bytes) -> StorageResult<()>;

    /// Create `path` and its parents. Succeeds if it already exists.
    async fn create_dir_all(&self, path: &Path) -> StorageResult<()>;

    /// Remove a single file. `NotFound` if it does not exist.
    async fn delete_file(&self, path: &Path) -> StorageResult<()>;

    /// Remove a directory tree and return how many regular files it held.
    /// `NotFound` if it does not exist.
    async fn delete_tree(&self, path: &Path) -> StorageResult<usize>;
}
