//! Local filesystem storage implementation.
//!
//! Stores each object as `{root}/{key}`. Used by the CLI for replaying
//! events and in tests. Production deployments should use `S3Storage`.
//!
//! Keys must stay inside the root: any key with `..`, a leading `/` or a
//! `.` segment is rejected before anything touches the filesystem.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tempfile::NamedTempFile;

use crate::error::{AppError, Result};
use crate::storage::{ObjectStore, WriteMetadata};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Resolve a key to a path under the root.
    fn path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let contained = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        if !contained {
            return Err(AppError::storage(key, "key escapes the storage root"));
        }
        Ok(self.root_dir.join(relative))
    }

    /// Write bytes atomically through a per-write temp file, then rename.
    async fn write_bytes(&self, path: PathBuf, bytes: Vec<u8>) -> Result<()> {
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root_dir.clone());
        tokio::fs::create_dir_all(&parent).await?;

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut tmp = NamedTempFile::new_in(&parent)?;
            tmp.write_all(&bytes)?;
            tmp.flush()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?
    }

    /// Read an object back, returning None if it doesn't exist.
    pub async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(key)?).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<WriteMetadata> {
        let path = self.path(key)?;
        let size = body.len();

        self.write_bytes(path.clone(), body)
            .await
            .map_err(|e| AppError::storage(key, e))?;

        log::debug!("Wrote {} bytes to {}", size, path.display());
        Ok(WriteMetadata {
            location: path.display().to_string(),
            size,
            timestamp: Utc::now(),
        })
    }
}
