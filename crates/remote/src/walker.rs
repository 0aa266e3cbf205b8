//! Paginated index walker.
//!
//! Walks the remote index a page at a time, accumulating a deduplicated,
//! insertion-ordered sequence of records. The walk is a lazy stream so a
//! consumer can render partial progress while later pages are still being
//! fetched.

use crate::client::IndexClient;
use crate::error::Result;
use crate::models::Photo;
use async_stream::stream;
use futures::{Stream, TryStreamExt};
use std::collections::HashSet;
use std::time::Duration;

/// Tuning knobs for one walk session.
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    /// Hard page ceiling: the walk requests pages `1..max_pages` (exclusive),
    /// so the default of 10 fetches at most nine pages.
    pub max_pages: u32,
    /// Fixed pause between the starts of consecutive page requests. This is
    /// pacing to be polite to the remote service, not adaptive backoff.
    pub delay: Duration,
}
impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_pages: 10,
            delay: Duration::from_millis(200),
        }
    }
}

/// Walk the index lazily, yielding each record the first time its identifier
/// is seen. Records from a later page that repeat an already-seen identifier
/// are silently dropped.
///
/// The walk stops at the page ceiling, or earlier when the server reported a
/// last page at or before the current one. A reported page count is the only
/// early-stop signal: when the pagination header was absent, the defaulted
/// count says nothing about where the index ends and the walk continues to
/// the ceiling.
///
/// A failed page request ends the stream with that error. Everything yielded
/// before it stays with the consumer; there is no retry and no skipping.
pub fn walk_stream<'a>(client: &'a dyn IndexClient, options: WalkOptions) -> impl Stream<Item = Result<Photo>> + 'a {
    stream! {
        let mut seen = HashSet::new();
        let mut page = 1;
        while page < options.max_pages {
            if page > 1 {
                tokio::time::sleep(options.delay).await;
            }
            let result = match client.fetch_page(page).await {
                Ok(result) => result,
                Err(err) => {
                    yield Err(err);
                    return;
                },
            };
            for photo in result.photos {
                if seen.insert(photo.id.clone()) {
                    yield Ok(photo);
                }
            }
            if let Some(last) = result.last_page
                && last <= page
            {
                tracing::debug!(page, last, "Server reported last page; stopping walk early");
                break;
            }
            page += 1;
        }
    }
}

/// Collect a whole walk into a `Vec`.
///
/// Convenience wrapper over [`walk_stream`]; a page failure anywhere loses
/// the partial result, so consumers that want to keep already-fetched
/// records on failure should drive the stream themselves.
pub async fn walk(client: &dyn IndexClient, options: WalkOptions) -> Result<Vec<Photo>> {
    walk_stream(client, options).try_collect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::PageResult;
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::collections::HashMap;
    use tokio::sync::Mutex;
    use tokio::time::Instant;

    fn photo(id: &str) -> Photo {
        Photo {
            id: id.to_owned(),
            width: 100,
            height: 80,
            description: None,
            urls: Default::default(),
        }
    }

    /// Scripted index: returns configured pages, empty pages otherwise, and
    /// records the start instant of every request.
    #[derive(Default)]
    struct ScriptedIndex {
        pages: HashMap<u32, PageResult>,
        fail_on: Option<u32>,
        calls: Mutex<Vec<(u32, Instant)>>,
    }

    impl ScriptedIndex {
        fn with_pages(pages: impl IntoIterator<Item = (u32, Option<u32>, Vec<Photo>)>) -> Self {
            let pages = pages
                .into_iter()
                .map(|(page, last_page, photos)| (page, PageResult { page, last_page, photos }))
                .collect();
            Self { pages, ..Self::default() }
        }

        async fn pages_requested(&self) -> Vec<u32> {
            self.calls.lock().await.iter().map(|(page, _)| *page).collect()
        }
    }

    #[async_trait]
    impl IndexClient for ScriptedIndex {
        async fn fetch_page(&self, page: u32) -> Result<PageResult> {
            self.calls.lock().await.push((page, Instant::now()));
            if self.fail_on == Some(page) {
                exn::bail!(ErrorKind::RequestFailed(500));
            }
            Ok(self
                .pages
                .get(&page)
                .cloned()
                .unwrap_or(PageResult { page, last_page: None, photos: vec![] }))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_records_deduplicate_across_pages_in_order() {
        let client = ScriptedIndex::with_pages([
            (1, Some(3), vec![photo("a"), photo("b")]),
            (2, Some(3), vec![photo("b"), photo("c")]),
            (3, Some(3), vec![photo("c"), photo("d")]),
        ]);
        let photos = walk(&client, WalkOptions::default()).await.unwrap();
        let ids: Vec<_> = photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
        assert_eq!(client.pages_requested().await, [1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ceiling_stops_walk_without_server_signal() {
        // No Link header ever: `last_page` stays None, so only the hard
        // ceiling stops the walk — nine fetches with the default of 10.
        let client = ScriptedIndex::default();
        walk(&client, WalkOptions::default()).await.unwrap();
        assert_eq!(client.pages_requested().await, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reported_last_page_stops_walk_early() {
        let client = ScriptedIndex::with_pages([
            (1, Some(2), vec![photo("a")]),
            (2, Some(2), vec![photo("b")]),
        ]);
        let photos = walk(&client, WalkOptions::default()).await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(client.pages_requested().await, [1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_page_at_or_before_current_stops_immediately() {
        let client = ScriptedIndex::with_pages([(1, Some(1), vec![photo("a")])]);
        let photos = walk(&client, WalkOptions::default()).await.unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(client.pages_requested().await, [1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_paced_by_the_configured_delay() {
        let delay = Duration::from_millis(200);
        let client = ScriptedIndex::default();
        walk(&client, WalkOptions { max_pages: 5, delay }).await.unwrap();

        let calls = client.calls.lock().await;
        assert_eq!(calls.len(), 4);
        for pair in calls.windows(2) {
            let (_, earlier) = pair[0];
            let (_, later) = pair[1];
            assert!(later.duration_since(earlier) >= delay);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_failure_aborts_but_keeps_prior_records() {
        let client = ScriptedIndex {
            fail_on: Some(2),
            ..ScriptedIndex::with_pages([(1, None, vec![photo("a"), photo("b")])])
        };
        let stream = walk_stream(&client, WalkOptions::default());
        futures::pin_mut!(stream);

        let mut ids = Vec::new();
        let mut failure = None;
        while let Some(item) = stream.next().await {
            match item {
                Ok(photo) => ids.push(photo.id),
                Err(err) => {
                    failure = Some(err);
                    break;
                },
            }
        }
        // Page 1's records were yielded before the abort.
        assert_eq!(ids, ["a", "b"]);
        assert!(matches!(&*failure.unwrap(), ErrorKind::RequestFailed(500)));
        // The walk stopped dead: no page 3 request.
        assert_eq!(client.pages_requested().await, [1, 2]);

        // And the stream is over.
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_collected_walk_surfaces_page_failure() {
        let client = ScriptedIndex { fail_on: Some(1), ..ScriptedIndex::default() };
        let err = walk(&client, WalkOptions::default()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::RequestFailed(500)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ceiling_of_one_fetches_nothing() {
        let client = ScriptedIndex::default();
        let photos = walk(&client, WalkOptions { max_pages: 1, delay: Duration::ZERO }).await.unwrap();
        assert!(photos.is_empty());
        assert!(client.pages_requested().await.is_empty());
    }
}
