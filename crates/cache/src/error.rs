//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Unlike the other crates in this workspace, `ErrorKind` here is `Clone`:
//! one fetch episode resolves on behalf of every caller attached to it, and
//! the single outcome — failure included — has to fan out to all of them.
//! Source errors are flattened to their display text for that reason.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Clone, Display, Error)]
pub enum ErrorKind {
    /// Network retrieval failed; the store was never written
    #[display("remote fetch failed: {_0}")]
    Fetch(#[error(not(source))] String),
    /// Persistent store I/O failed on read or write
    #[display("store I/O failed: {_0}")]
    Store(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The cache never retries internally; a fresh `get` for the same
        // key starts a fresh episode.
        matches!(self, Self::Fetch(_) | Self::Store(_))
    }
}
