//! Remote Index Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A remote-index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for remote-index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The transport layer could not classify the response at all
    /// (connection failure, malformed body). The underlying error sits in
    /// the exn tree.
    #[display("response could not be classified")]
    InvalidResponse,
    /// Server answered, but with a non-success status code
    #[display("request failed with status {_0}")]
    RequestFailed(#[error(not(source))] u16),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RequestFailed(_))
    }
}
