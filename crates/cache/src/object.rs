//! Coalescing object cache over the persistent store.
//!
//! Many concurrent callers (one per on-screen item, typically) ask for image
//! bytes by URL. The cache guarantees that at most one network fetch per key
//! is ever in flight: the first caller for a key starts a fetch episode, and
//! everyone who asks for the same key while it runs attaches to that episode
//! and receives the identical outcome.

use crate::error::{ErrorKind, Result};
use crate::fetcher::FetcherHandle;
use darkroom_store::{ObjectKey, StoreHandle};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The one resolved value every attached caller receives. `ErrorKind` is
/// `Clone` precisely so this can fan out through a [`Shared`] future.
type Outcome = std::result::Result<Vec<u8>, ErrorKind>;
type InFlight = Shared<BoxFuture<'static, Outcome>>;
type InFlightIndex = Arc<Mutex<HashMap<ObjectKey, InFlight>>>;

/// Key-addressed binary object cache.
///
/// `get` consults the persistent store before touching the network, writes
/// fetched bytes through to the store, and coalesces concurrent requests for
/// the same key into a single fetch episode. Cloning the cache is cheap and
/// clones share the same in-flight index, so one instance (or its clones)
/// should be shared by all callers.
///
/// # Examples
///
/// ```
/// use darkroom_cache::ObjectCache;
/// use darkroom_cache::error::Result;
///
/// async fn thumbnail(cache: &ObjectCache, url: &str) -> Result<Vec<u8>> {
///     // Served from disk if a previous run fetched it; coalesced with any
///     // concurrent request for the same URL otherwise.
///     cache.get(url).await
/// }
/// ```
#[derive(Clone)]
pub struct ObjectCache {
    store: StoreHandle,
    fetcher: FetcherHandle,
    in_flight: InFlightIndex,
}

impl ObjectCache {
    pub fn new(store: StoreHandle, fetcher: FetcherHandle) -> Self {
        Self {
            store,
            fetcher,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get the bytes for `url`, from store or network.
    ///
    /// The storage key is derived from the URL, so the same URL always maps
    /// to the same cache entry within a run and across restarts.
    ///
    /// # Errors
    ///
    /// [`Fetch`](ErrorKind::Fetch) if the network retrieval failed,
    /// [`Store`](ErrorKind::Store) if disk I/O failed. Every caller attached
    /// to the failing episode receives the same error; the episode is then
    /// forgotten, so a later `get` for the same URL starts fresh.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let key = ObjectKey::derive(url);
        let episode = {
            // Check-or-register must be atomic with respect to other callers:
            // two first-callers racing past the check would both fetch. The
            // lock guards only the index map; all I/O happens outside it.
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&key) {
                Some(existing) => existing.clone(),
                None => {
                    let episode = Self::episode(
                        Arc::clone(&self.store),
                        Arc::clone(&self.fetcher),
                        Arc::clone(&self.in_flight),
                        key.clone(),
                        url.to_owned(),
                    )
                    .boxed()
                    .shared();
                    in_flight.insert(key, episode.clone());
                    episode
                },
            }
        };
        // Each caller re-raises the shared outcome at its own call site.
        episode.await.map_err(exn::Exn::from)
    }

    /// One fetch episode: resolve the bytes, then deregister.
    ///
    /// Deregistration happens *before* the episode completes, so no waiter
    /// can observe a finished entry in the index — a failed episode is never
    /// replayed to callers that arrive after it resolved.
    async fn episode(
        store: StoreHandle,
        fetcher: FetcherHandle,
        index: InFlightIndex,
        key: ObjectKey,
        url: String,
    ) -> Outcome {
        let outcome = Self::resolve(&store, &fetcher, &key, &url).await;
        index.lock().await.remove(&key);
        outcome
    }

    /// Store read-through, network fetch + store write-through on miss.
    async fn resolve(store: &StoreHandle, fetcher: &FetcherHandle, key: &ObjectKey, url: &str) -> Outcome {
        let stored = store.exists(key).await.map_err(|err| ErrorKind::Store(err.to_string()))?;
        if stored {
            tracing::debug!(%key, "Serving object from persistent store");
            return store.read(key).await.map_err(|err| ErrorKind::Store(err.to_string()));
        }
        let data = fetcher.fetch(url).await.map_err(|err| (*err).clone())?;
        store.write(key, &data).await.map_err(|err| ErrorKind::Store(err.to_string()))?;
        tracing::debug!(%key, bytes = data.len(), "Fetched object and wrote through to store");
        Ok(data)
    }
}
