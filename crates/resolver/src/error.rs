//! Resolver Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Every failure a caller can observe
//! from [`Resolver::resolve`](crate::Resolver::resolve) is tagged with exactly
//! one of these kinds; there is no generic catch-all.

use derive_more::{Display, Error};

/// A resolver error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller identity is missing or malformed. Nothing was read or written.
    #[display("not authenticated")]
    NotAuthenticated,
    /// The request was rejected before any I/O (bad limit, bad resource id).
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),
    /// The resource exists neither upstream nor in the snapshot cache.
    #[display("resource not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The upstream API call failed. The stored snapshot was left untouched.
    #[display("upstream unavailable")]
    UpstreamUnavailable,
    /// The snapshot store failed, or returned a snapshot that could not be decoded.
    #[display("snapshot store error")]
    Store,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable | Self::Store)
    }
}
