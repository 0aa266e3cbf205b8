//! The remote-fetch collaborator seam.
//!
//! The cache does not speak HTTP itself; it coordinates around whatever
//! implements [`Fetcher`]. The production implementation lives in the
//! `darkroom-remote` crate, the [`MockFetcher`] here is for tests.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Retrieves the raw bytes behind a URL.
///
/// Implementations do one attempt per call — no internal retry, no caching.
/// Deduplication of concurrent calls is the cache's job, not the fetcher's.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve the bytes at `url`. Any non-success classification of the
    /// response is a failure.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub type FetcherHandle = Arc<dyn Fetcher>;

// `any(test, …)` so this crate's own cache tests can drive the mock without
// the feature that exports it to dependents.
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockFetcher;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use super::Fetcher;
    use crate::error::{ErrorKind, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::{Mutex, Semaphore};

    enum Response {
        Bytes(Vec<u8>),
        Failure(String),
    }

    /// Programmable in-memory fetcher for testing.
    ///
    /// Tracks how many times each URL was fetched, and can hold a fetch open
    /// behind a zero-permit [`Semaphore`] gate so tests can pile concurrent
    /// callers onto one in-flight episode before letting it resolve.
    ///
    /// # Examples
    ///
    /// ```
    /// use darkroom_cache::{Fetcher, MockFetcher};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = MockFetcher::default();
    /// fetcher.respond("https://images.example.com/abc", b"bytes".to_vec()).await;
    /// assert_eq!(fetcher.fetch("https://images.example.com/abc").await?, b"bytes");
    /// assert_eq!(fetcher.fetch_count("https://images.example.com/abc").await, 1);
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Default)]
    pub struct MockFetcher {
        responses: Mutex<HashMap<String, Response>>,
        counts: Mutex<HashMap<String, usize>>,
        gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    }

    impl MockFetcher {
        /// Register a successful response for a URL.
        pub async fn respond(&self, url: impl Into<String>, data: Vec<u8>) {
            self.responses.lock().await.insert(url.into(), Response::Bytes(data));
        }

        /// Register a failure for a URL.
        pub async fn fail(&self, url: impl Into<String>, message: impl Into<String>) {
            self.responses.lock().await.insert(url.into(), Response::Failure(message.into()));
        }

        /// Hold every fetch of `url` open until the returned semaphore gets a
        /// permit (one permit per held fetch).
        pub async fn gate(&self, url: impl Into<String>) -> Arc<Semaphore> {
            let gate = Arc::new(Semaphore::new(0));
            self.gates.lock().await.insert(url.into(), Arc::clone(&gate));
            gate
        }

        /// Number of times `url` has been fetched so far.
        pub async fn fetch_count(&self, url: &str) -> usize {
            self.counts.lock().await.get(url).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            *self.counts.lock().await.entry(url.to_owned()).or_insert(0) += 1;
            let gate = self.gates.lock().await.get(url).cloned();
            if let Some(gate) = gate {
                match gate.acquire().await {
                    Ok(permit) => permit.forget(),
                    // A closed gate means "release everything still held".
                    Err(_closed) => {},
                }
            }
            match self.responses.lock().await.get(url) {
                Some(Response::Bytes(data)) => Ok(data.clone()),
                Some(Response::Failure(message)) => exn::bail!(ErrorKind::Fetch(message.clone())),
                None => exn::bail!(ErrorKind::Fetch(format!("no mock response registered for {url}"))),
            }
        }
    }
}
