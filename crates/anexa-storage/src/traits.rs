//! Storage abstraction trait
//!
//! This module defines the `AttachmentStore` trait the attachment processor
//! works against. The shipped implementation is the local filesystem; the
//! trait keeps the processor decoupled from where files physically land.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid destination path: {0}")]
    InvalidPath(String),

    #[error("Failed to create directory: {0}")]
    CreateDirFailed(String),

    #[error("Failed to move file into place: {0}")]
    PlaceFailed(String),

    #[error("Failed to remove file: {0}")]
    RemoveFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Filesystem operations needed by the attachment lifecycle.
///
/// `dir` arguments are store-relative destination directories (typically
/// `<baseDir>/<fieldDir>`); see the crate root documentation for the layout.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Whether the destination directory exists.
    async fn dir_exists(&self, dir: &str) -> StoreResult<bool>;

    /// Whether the destination directory exists and is writable.
    async fn dir_writable(&self, dir: &str) -> StoreResult<bool>;

    /// Whether the destination directory's parent exists and is writable.
    async fn parent_writable(&self, dir: &str) -> StoreResult<bool>;

    /// Create the destination directory (and intermediates) if missing.
    async fn ensure_dir(&self, dir: &str) -> StoreResult<()>;

    /// Move a staged file into place under `dir/filename`.
    async fn place(&self, src: &Path, dir: &str, filename: &str) -> StoreResult<()>;

    /// Remove `dir/filename`. Removing an already-missing file is a no-op.
    async fn remove(&self, dir: &str, filename: &str) -> StoreResult<()>;

    /// Whether `dir/filename` exists.
    async fn exists(&self, dir: &str, filename: &str) -> StoreResult<bool>;
}
