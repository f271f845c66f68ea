//! The cache-or-refresh decision.

use crate::error::{ErrorKind, Result};
use crate::request::{Limits, Request};
use crate::resource::{Payload, Resource};
use crate::snapshot::{Snapshot, SnapshotKey};
use crate::store::StoreHandle;
use crate::upstream::{ErrorKind as UpstreamErrorKind, Fetched, UpstreamHandle};
use derive_more::Display;
use exn::ResultExt;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::instrument;

/// Where a resolved payload came from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Served from a previously persisted snapshot, no upstream call made.
    #[display("cache")]
    Cache,
    /// Fetched from upstream during this request and persisted.
    #[display("upstream")]
    Upstream,
}

/// The answer to a read request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved<P> {
    pub source: Source,
    pub payload: P,
    /// Items in the payload for collections, `1` for single objects.
    pub count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub last_fetched_at: OffsetDateTime,
}
impl<P: Payload> Resolved<P> {
    fn new(source: Source, payload: P, last_fetched_at: OffsetDateTime) -> Self {
        let count = payload.item_count().unwrap_or(1);
        Self { source, payload, count, last_fetched_at }
    }
}

/// Resolves read requests for one resource kind into cached or fresh data.
///
/// 1. Unless the caller asked for a refresh, a stored snapshot that covers
///    the requested limit is returned as-is (truncated to the limit).
/// 2. Otherwise upstream is asked, and on success the snapshot is overwritten
///    with the new payload and the current time.
/// 3. Upstream failures are returned to the caller untouched; the stored
///    snapshot is never modified and never served as a fallback.
pub struct Resolver<R: Resource> {
    upstream: UpstreamHandle<R>,
    store: StoreHandle,
    limits: Limits,
}
impl<R: Resource> Clone for Resolver<R> {
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            store: self.store.clone(),
            limits: self.limits,
        }
    }
}

impl<R: Resource> Resolver<R> {
    pub fn new(upstream: UpstreamHandle<R>, store: StoreHandle) -> Self {
        Self { upstream, store, limits: Limits::default() }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Validate raw caller input into a [`Request`] using this resolver's
    /// limit policy.
    pub fn request(&self, owner: Option<&str>, resource_id: &str, refresh: bool, limit: Option<u32>) -> Result<Request> {
        Request::new(owner, resource_id, refresh, limit, &self.limits)
    }

    /// Validate and resolve in one step.
    pub async fn read(
        &self,
        owner: Option<&str>,
        resource_id: &str,
        refresh: bool,
        limit: Option<u32>,
    ) -> Result<Resolved<R::Payload>> {
        let request = self.request(owner, resource_id, refresh, limit)?;
        self.resolve(&request).await
    }

    /// Resolve a validated request.
    #[instrument(
        skip(self, request),
        fields(kind = R::KIND, owner = %request.owner, resource_id = %request.resource_id, refresh = request.refresh, limit = %request.limit)
    )]
    pub async fn resolve(&self, request: &Request) -> Result<Resolved<R::Payload>> {
        let key = SnapshotKey::of::<R>(request.owner.clone(), request.resource_id.clone());
        if !request.refresh {
            match self.store.get(&key).await.or_raise(|| ErrorKind::Store)? {
                Some(stored) => {
                    let snapshot = Snapshot::<R::Payload>::try_from(stored)?;
                    if snapshot.covers(request.limit) {
                        tracing::debug!(fetched_at = %snapshot.last_fetched_at, "serving snapshot from cache");
                        let mut payload = snapshot.payload;
                        payload.truncate(request.limit.as_usize());
                        return Ok(Resolved::new(Source::Cache, payload, snapshot.last_fetched_at));
                    }
                    tracing::debug!(
                        fetch_limit = snapshot.fetch_limit,
                        "cached collection may be truncated below the requested limit; refetching"
                    );
                },
                None => tracing::debug!("no snapshot cached; fetching from upstream"),
            }
        }

        let fetched = match self.upstream.fetch(&request.resource_id, request.limit).await {
            Ok(fetched) => fetched,
            Err(err) => {
                let cause: &UpstreamErrorKind = &err;
                tracing::warn!(error = %cause, "upstream fetch failed; snapshot left untouched");
                let kind = match cause {
                    UpstreamErrorKind::NotFound(id) => ErrorKind::NotFound(id.clone()),
                    UpstreamErrorKind::Unavailable => ErrorKind::UpstreamUnavailable,
                };
                return Err(err.raise(kind));
            },
        };
        let Fetched { mut payload, mut exhausted } = fetched;
        if payload.item_count().is_some_and(|count| count > request.limit.as_usize()) {
            payload.truncate(request.limit.as_usize());
            exhausted = false;
        }

        let candidate = Snapshot::encode(key, &payload, request.limit, exhausted, OffsetDateTime::now_utc())?;
        let stored = self.store.put(candidate).await.or_raise(|| ErrorKind::Store)?;
        tracing::info!(items = ?stored.item_count, exhausted, fetched_at = %stored.last_fetched_at, "snapshot refreshed from upstream");
        Ok(Resolved::new(Source::Upstream, payload, stored.last_fetched_at))
    }
}
