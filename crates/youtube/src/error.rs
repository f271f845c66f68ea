//! YouTube Client Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use tubesnap_resolver::upstream;

/// A YouTube client error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for YouTube API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The API answered 404, or a lookup by id came back empty.
    #[display("not found on YouTube: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Missing or expired credentials (401).
    #[display("YouTube rejected the credentials")]
    Unauthorized,
    /// The request never got a response: DNS, TLS, connection, timeout.
    #[display("could not reach the YouTube API")]
    Network,
    /// Any other unsuccessful status code.
    #[display("YouTube API returned status {_0}")]
    Status(#[error(not(source))] u16),
    /// The response body was not what the API documents.
    #[display("unexpected response from the YouTube API")]
    InvalidResponse,
    /// The client was configured without credentials or with a bad base URL.
    #[display("invalid YouTube client configuration: {_0}")]
    Config(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network => true,
            Self::Status(code) => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// The distinction the resolver draws: not found, or anything else.
    pub(crate) fn upstream(&self) -> upstream::ErrorKind {
        match self {
            Self::NotFound(id) => upstream::ErrorKind::NotFound(id.clone()),
            _ => upstream::ErrorKind::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Network, true)]
    #[case(ErrorKind::Status(503), true)]
    #[case(ErrorKind::Status(429), true)]
    #[case(ErrorKind::Status(400), false)]
    #[case(ErrorKind::Unauthorized, false)]
    #[case(ErrorKind::InvalidResponse, false)]
    #[case(ErrorKind::NotFound("x".to_string()), false)]
    fn test_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }

    #[test]
    fn test_upstream_mapping() {
        assert_eq!(
            ErrorKind::NotFound("dQw4w9WgXcQ".to_string()).upstream(),
            upstream::ErrorKind::NotFound("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(ErrorKind::Status(500).upstream(), upstream::ErrorKind::Unavailable);
        assert_eq!(ErrorKind::Unauthorized.upstream(), upstream::ErrorKind::Unavailable);
    }
}
