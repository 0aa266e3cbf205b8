//! HTTP client for the paginated photo index.

use crate::error::{ErrorKind, Result};
use crate::link;
use crate::models::{PageResult, Photo};
use async_trait::async_trait;
use darkroom_config::Credentials;
use exn::ResultExt;
use reqwest::header::{AUTHORIZATION, LINK};

/// Retrieves one page of the remote photo index.
///
/// The walker drives this a page at a time; tests substitute a scripted
/// implementation.
#[async_trait]
pub trait IndexClient: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<PageResult>;
}

/// Production [`IndexClient`] speaking the photo service's HTTP protocol.
///
/// One GET per page against `{base_url}/photos?page=N`, authenticated with
/// the `Client-ID` scheme. The JSON array body becomes the page's records;
/// the `Link` response header, when present, reports where the index ends.
pub struct HttpIndexClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpIndexClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, credentials)
    }

    /// Construct over an existing `reqwest` client, so the connection pool
    /// can be shared with the byte fetcher.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>, credentials: Credentials) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http, base_url, credentials }
    }
}

#[async_trait]
impl IndexClient for HttpIndexClient {
    async fn fetch_page(&self, page: u32) -> Result<PageResult> {
        let response = self
            .http
            .get(format!("{}/photos", self.base_url))
            .query(&[("page", page)])
            .header(AUTHORIZATION, format!("Client-ID {}", self.credentials.access_key()))
            .send()
            .await
            .or_raise(|| ErrorKind::InvalidResponse)?;

        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::RequestFailed(status.as_u16()));
        }

        // Absent or unparsable header leaves `last_page` unset; the walker
        // treats that as "no signal", not as "this is the last page".
        let last_page = response.headers().get(LINK).and_then(|value| value.to_str().ok()).and_then(link::last_page);

        let photos: Vec<Photo> = response.json().await.or_raise(|| ErrorKind::InvalidResponse)?;
        tracing::debug!(page, records = photos.len(), ?last_page, "Fetched index page");
        Ok(PageResult { page, last_page, photos })
    }
}
