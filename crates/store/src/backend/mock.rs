//! In-memory object store for testing.

use crate::error::{ErrorKind, Result};
use crate::key::ObjectKey;
use crate::{ObjectStore, backend};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory object store for testing.
///
/// Entries live in a `HashMap` behind a [`RwLock`], so all trait methods can
/// operate on `&self` without external synchronisation. Ideal for unit tests
/// that need an [`ObjectStore`] without filesystem dependencies.
///
/// # Examples
///
/// ```
/// use darkroom_store::backend::{MockStore, ObjectStore};
/// use darkroom_store::ObjectKey;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MockStore::with_objects([
///     ("https://images.example.com/abc", b"cached bytes".to_vec()),
/// ]);
/// let key = ObjectKey::derive("https://images.example.com/abc");
/// assert!(store.exists(&key).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MockStore {
    objects: RwLock<HashMap<ObjectKey, Vec<u8>>>,
}

impl MockStore {
    /// Create a mock store pre-populated with objects, keyed by source URL.
    ///
    /// Panics on an empty URL. If test setup is wrong, then test should
    /// not pass.
    pub fn with_objects(objects: impl IntoIterator<Item = (impl AsRef<str>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (url, data) in objects {
            let key = ObjectKey::derive(url.as_ref());
            if key.is_empty() {
                // The panic here is DELIBERATE. MockStore is intended to be
                // used in tests; panics are expected. There is no error result.
                panic!("MockStore::with_objects: empty source URL");
            }
            map.insert(key, data.into());
        }
        Self { objects: RwLock::new(map) }
    }

    /// Number of stored entries. Lets dependent crates assert write-through
    /// behaviour without reaching into the map.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn exists(&self, key: &ObjectKey) -> Result<bool> {
        backend::reject_empty(key)?;
        Ok(self.objects.read().await.contains_key(key))
    }

    async fn read(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        backend::reject_empty(key)?;
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(key.clone())))
    }

    async fn write(&self, key: &ObjectKey, data: &[u8]) -> Result<()> {
        backend::reject_empty(key)?;
        self.objects.write().await.insert(key.clone(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read() {
        let store = MockStore::default();
        let key = ObjectKey::derive("https://images.example.com/abc");
        store.write(&key, b"hello").await.unwrap();
        assert_eq!(store.read(&key).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_with_objects() {
        let store = MockStore::with_objects([("https://a/1", Vec::from(*b"one")), ("https://a/2", Vec::from(*b"two"))]);
        assert!(store.exists(&ObjectKey::derive("https://a/1")).await.unwrap());
        assert!(store.exists(&ObjectKey::derive("https://a/2")).await.unwrap());
        assert!(!store.exists(&ObjectKey::derive("https://a/3")).await.unwrap());
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let store = MockStore::default();
        let err = store.read(&ObjectKey::derive("https://a/missing")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let store = MockStore::default();
        let key = ObjectKey::derive("https://a/1");
        store.write(&key, b"first").await.unwrap();
        store.write(&key, b"second").await.unwrap();
        assert_eq!(store.read(&key).await.unwrap(), b"second");
        assert_eq!(store.len().await, 1);
    }

    #[test]
    #[should_panic(expected = "empty source URL")]
    fn test_with_objects_panics_on_empty_url() {
        MockStore::with_objects([("", Vec::from(*b"bad"))]);
    }
}
