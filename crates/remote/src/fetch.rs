//! HTTP byte retrieval for the object cache.

use async_trait::async_trait;
use darkroom_cache::Fetcher;
use darkroom_cache::error::{ErrorKind, Result};

/// Plain-GET implementation of the cache's [`Fetcher`] seam.
///
/// No special headers, no retries: image URLs carry their own access tokens
/// in the query string, and retry policy belongs to the caller. Errors are
/// flattened to their display text because the cache fans one outcome out to
/// every attached caller.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Construct over an existing `reqwest` client, so the connection pool
    /// can be shared with the index client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}
impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| exn::Exn::from(ErrorKind::Fetch(err.to_string())))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Fetch(format!("status {status}")));
        }
        let bytes = response.bytes().await.map_err(|err| exn::Exn::from(ErrorKind::Fetch(err.to_string())))?;
        Ok(bytes.to_vec())
    }
}
