use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::traits::{AttachmentStore, StoreError, StoreResult};

/// Local filesystem store rooted at the web-accessible directory.
#[derive(Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore.
    ///
    /// # Arguments
    /// * `root` - Web-accessible root directory (e.g. "/var/www/webroot").
    ///   Must already exist; destination directories underneath it are
    ///   created on demand per field configuration.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStore { root: root.into() }
    }

    /// Convert a store-relative destination to a filesystem path.
    ///
    /// Rejects destinations that could escape the store root.
    fn rel_to_path(&self, rel: &str) -> StoreResult<PathBuf> {
        if rel.split('/').any(|seg| seg == "..") || rel.starts_with('/') {
            return Err(StoreError::InvalidPath(
                "Destination contains invalid characters".to_string(),
            ));
        }
        Ok(self.root.join(rel))
    }

    fn file_path(&self, dir: &str, filename: &str) -> StoreResult<PathBuf> {
        if filename.contains('/') || filename.contains("..") {
            return Err(StoreError::InvalidPath(
                "Filename contains invalid characters".to_string(),
            ));
        }
        Ok(self.rel_to_path(dir)?.join(filename))
    }

    /// Whether an existing directory is writable, by its permission bits.
    /// On Unix this is the `0o222` write mask; a missing path is not
    /// writable.
    async fn probe_writable(path: &Path) -> StoreResult<bool> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_dir() && !meta.permissions().readonly()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[async_trait]
impl AttachmentStore for LocalStore {
    async fn dir_exists(&self, dir: &str) -> StoreResult<bool> {
        let path = self.rel_to_path(dir)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn dir_writable(&self, dir: &str) -> StoreResult<bool> {
        let path = self.rel_to_path(dir)?;
        Self::probe_writable(&path).await
    }

    async fn parent_writable(&self, dir: &str) -> StoreResult<bool> {
        let path = self.rel_to_path(dir)?;
        // The parent of a top-level destination is the store root itself.
        let parent = match path.parent() {
            Some(p) if p.starts_with(&self.root) => p.to_path_buf(),
            _ => self.root.clone(),
        };
        Self::probe_writable(&parent).await
    }

    async fn ensure_dir(&self, dir: &str) -> StoreResult<()> {
        let path = self.rel_to_path(dir)?;
        fs::create_dir_all(&path).await.map_err(|e| {
            StoreError::CreateDirFailed(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }

    async fn place(&self, src: &Path, dir: &str, filename: &str) -> StoreResult<()> {
        let dest = self.file_path(dir, filename)?;
        let start = std::time::Instant::now();

        // Prefer an atomic rename; staging and store may sit on different
        // filesystems, in which case fall back to copy + remove.
        if let Err(rename_err) = fs::rename(src, &dest).await {
            fs::copy(src, &dest).await.map_err(|_| {
                StoreError::PlaceFailed(format!(
                    "Failed to move {} to {}: {}",
                    src.display(),
                    dest.display(),
                    rename_err
                ))
            })?;
            fs::remove_file(src).await.map_err(|e| {
                StoreError::PlaceFailed(format!(
                    "Failed to remove staged file {}: {}",
                    src.display(),
                    e
                ))
            })?;
        }

        tracing::info!(
            src = %src.display(),
            dest = %dest.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Attachment placed"
        );

        Ok(())
    }

    async fn remove(&self, dir: &str, filename: &str) -> StoreResult<()> {
        let path = self.file_path(dir, filename)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StoreError::RemoveFailed(format!("Failed to remove file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Attachment removed");

        Ok(())
    }

    async fn exists(&self, dir: &str, filename: &str) -> StoreResult<bool> {
        let path = self.file_path(dir, filename)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}
