//! Upstream API capability.

use crate::request::{Limit, ResourceId};
use crate::resource::Resource;
use async_trait::async_trait;
use derive_more::{Display, Error};
use std::sync::Arc;

/// An upstream error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for upstream fetches.
pub type Result<T> = std::result::Result<T, Error>;

/// The only distinction the resolver draws between upstream failures.
///
/// Implementations keep their detailed error (status codes, transport errors)
/// as a child frame in the error tree.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Upstream positively reported that the resource does not exist.
    #[display("not found upstream: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Anything else: network, credentials, quota, server errors, bad responses.
    #[display("upstream request failed")]
    Unavailable,
}

pub type UpstreamHandle<R> = Arc<dyn Upstream<R>>;

/// A successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<P> {
    pub payload: P,
    /// Upstream holds nothing past what is in `payload`.
    ///
    /// Must only be set when upstream said so (no further page), never
    /// inferred from the payload being shorter than the limit: upstream may
    /// filter out entries the caller cannot see.
    pub exhausted: bool,
}
impl<P> Fetched<P> {
    pub fn new(payload: P, exhausted: bool) -> Self {
        Self { payload, exhausted }
    }

    /// Everything upstream has. Single objects are always complete.
    pub fn complete(payload: P) -> Self {
        Self::new(payload, true)
    }

    /// More items exist upstream than were fetched.
    pub fn partial(payload: P) -> Self {
        Self::new(payload, false)
    }
}

/// Fetches the authoritative state of one resource kind.
#[async_trait]
pub trait Upstream<R: Resource>: Send + Sync {
    /// Fetch a resource. Collection payloads must contain at most `limit`
    /// items; the resolver truncates anyway, but implementations should use
    /// the limit to avoid pulling pages nobody asked for.
    async fn fetch(&self, resource_id: &ResourceId, limit: Limit) -> Result<Fetched<R::Payload>>;
}
