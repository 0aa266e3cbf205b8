//! Object store trait and implementations.
//!
//! This module defines the `ObjectStore` trait, which provides a unified
//! interface for durable key-addressed byte storage, along with the disk
//! implementation used in production and an in-memory mock for tests.

mod disk;
#[cfg(feature = "mock")]
mod mock;

pub use self::disk::DiskStore;
#[cfg(feature = "mock")]
pub use self::mock::MockStore;
use crate::error::{ErrorKind, Result};
use crate::key::ObjectKey;
use async_trait::async_trait;

/// Shared guard: every backend rejects the empty key at the point of use,
/// since key derivation itself never fails.
pub(crate) fn reject_empty(key: &ObjectKey) -> Result<()> {
    if key.is_empty() {
        exn::bail!(ErrorKind::InvalidKey(String::new()));
    }
    Ok(())
}

/// Unified interface for durable object storage.
///
/// One entry per [`ObjectKey`], entry content is the raw bytes with no
/// wrapper format. All operations are asynchronous. Nothing else mutates
/// the store: the cache layer above is the only writer, and it guarantees
/// a single writer per key per fetch episode.
///
/// # Examples
///
/// ```
/// use darkroom_store::{ObjectKey, ObjectStore};
/// use darkroom_store::error::Result;
///
/// async fn size_of(store: &dyn ObjectStore, key: &ObjectKey) -> Result<u64> {
///     if store.exists(key).await? {
///         let data = store.read(key).await?;
///         Ok(data.len() as u64)
///     } else {
///         Ok(0)
///     }
/// }
/// ```
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check whether a durable entry exists for the key.
    ///
    /// Absence is a normal boolean outcome, never an error.
    async fn exists(&self, key: &ObjectKey) -> Result<bool>;

    /// Read the bytes stored under the key.
    ///
    /// Returns exactly the bytes most recently written. Returns
    /// [`NotFound`](crate::error::ErrorKind::NotFound) if no entry exists.
    async fn read(&self, key: &ObjectKey) -> Result<Vec<u8>>;

    /// Store bytes under the key, replacing any existing entry.
    ///
    /// Overwrite semantics: safe to call whether or not a prior entry
    /// exists, and a subsequent `read` returns these bytes until the next
    /// write. Implementations must make the replacement atomic — a reader
    /// never observes a half-written entry.
    async fn write(&self, key: &ObjectKey, data: &[u8]) -> Result<()>;
}
