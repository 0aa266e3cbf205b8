//! Local filesystem object store.
//!
//! One flat file per key under a configured root directory, accessed via
//! `tokio::fs` for async I/O. File content is the raw bytes as fetched —
//! no wrapper format, no metadata sidecar.

use crate::error::{ErrorKind, Result};
use crate::key::ObjectKey;
use crate::{ObjectStore, backend};
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem-backed object store.
///
/// Entries survive process restarts; a fresh `DiskStore` pointed at the same
/// root sees everything a previous run wrote.
///
/// # Examples
///
/// ```no_run
/// use darkroom_store::backend::DiskStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = DiskStore::new("/var/cache/darkroom/objects")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DiskStore {
    /// Root directory holding one file per key
    root: PathBuf,
}
impl DiskStore {
    /// Create a new disk store rooted at the given directory.
    ///
    /// The directory is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or exists but is not a
    /// directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidRoot(root));
        }

        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidRoot(root));
            }
        } else {
            // Use non-async here; it'll only happen once on store initialization
            // and it's not worth the hassle of making the constructor async.
            sync_create_dir(&root).map_err(ErrorKind::Io)?;
            tracing::debug!(root = %root.display(), "Created object store directory");
        }

        Ok(Self { root })
    }

    /// File path for a key. Keys contain no path separators, so every entry
    /// lands directly under the root.
    fn entry_path(&self, key: &ObjectKey) -> Result<PathBuf> {
        backend::reject_empty(key)?;
        Ok(self.root.join(key.as_str()))
    }

    fn map_io_error(e: std::io::Error, key: &ObjectKey) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(key.clone()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl ObjectStore for DiskStore {
    async fn exists(&self, key: &ObjectKey) -> Result<bool> {
        let path = self.entry_path(key)?;
        Ok(fs::try_exists(&path).await.map_err(ErrorKind::Io)?)
    }

    async fn read(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        let path = self.entry_path(key)?;
        Ok(fs::read(&path).await.map_err(|e| Self::map_io_error(e, key))?)
    }

    async fn write(&self, key: &ObjectKey, data: &[u8]) -> Result<()> {
        let path = self.entry_path(key)?;
        // Write to a sibling temp file and rename over the entry, so a
        // concurrent reader of the same root only ever observes either the
        // previous complete entry or the new complete entry.
        let staging = self.root.join(format!(".{}.tmp", key.as_str()));
        fs::write(&staging, data).await.map_err(ErrorKind::Io)?;
        Ok(fs::rename(&staging, &path).await.map_err(ErrorKind::Io)?)
    }
}
