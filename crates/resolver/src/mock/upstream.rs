//! Scripted upstream for testing.

use crate::request::{Limit, ResourceId};
use crate::resource::{Payload, Resource};
use crate::upstream::{ErrorKind, Fetched, Result, Upstream};
use async_trait::async_trait;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

enum Scripted<P> {
    Payload(P),
    Partial(P),
    NotFound,
    Unavailable,
}

/// Upstream that answers from a script instead of the network.
///
/// Unscripted resource ids answer [`ErrorKind::NotFound`]. A scripted
/// collection is everything upstream has: it is cut to the requested limit
/// and reported exhausted only if nothing was cut. [`unbounded`](Self::unbounded)
/// simulates an upstream that ignores limits.
pub struct MockUpstream<R: Resource> {
    script: Mutex<HashMap<String, Scripted<R::Payload>>>,
    calls: AtomicUsize,
    last_limit: Mutex<Option<Limit>>,
    unbounded: bool,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Default for MockUpstream<R> {
    fn default() -> Self {
        Self {
            script: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            last_limit: Mutex::new(None),
            unbounded: false,
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> MockUpstream<R> {
    /// Ignore the limit passed to [`fetch`](Upstream::fetch).
    pub fn unbounded(mut self) -> Self {
        self.unbounded = true;
        self
    }

    /// Answer `resource_id` with `payload` from now on.
    pub async fn respond(&self, resource_id: &str, payload: R::Payload) {
        self.script.lock().await.insert(resource_id.to_string(), Scripted::Payload(payload));
    }

    /// Answer `resource_id` with `payload`, reporting that upstream holds more
    /// items than it returned (entries hidden from the caller, say).
    pub async fn respond_partial(&self, resource_id: &str, payload: R::Payload) {
        self.script.lock().await.insert(resource_id.to_string(), Scripted::Partial(payload));
    }

    /// Answer `resource_id` with a not-found error from now on.
    pub async fn not_found(&self, resource_id: &str) {
        self.script.lock().await.insert(resource_id.to_string(), Scripted::NotFound);
    }

    /// Answer `resource_id` with a generic failure from now on.
    pub async fn fail(&self, resource_id: &str) {
        self.script.lock().await.insert(resource_id.to_string(), Scripted::Unavailable);
    }

    /// Number of fetches performed so far, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The limit passed to the most recent fetch.
    pub async fn last_limit(&self) -> Option<Limit> {
        *self.last_limit.lock().await
    }
}

#[async_trait]
impl<R: Resource> Upstream<R> for MockUpstream<R> {
    async fn fetch(&self, resource_id: &ResourceId, limit: Limit) -> Result<Fetched<R::Payload>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_limit.lock().await = Some(limit);
        match self.script.lock().await.get(resource_id.as_str()) {
            Some(Scripted::Payload(payload)) if self.unbounded => Ok(Fetched::complete(payload.clone())),
            Some(Scripted::Payload(payload)) => {
                let mut payload = payload.clone();
                let exhausted = payload.item_count().is_none_or(|count| count <= limit.as_usize());
                payload.truncate(limit.as_usize());
                Ok(Fetched::new(payload, exhausted))
            },
            Some(Scripted::Partial(payload)) => {
                let mut payload = payload.clone();
                if !self.unbounded {
                    payload.truncate(limit.as_usize());
                }
                Ok(Fetched::partial(payload))
            },
            Some(Scripted::Unavailable) => exn::bail!(ErrorKind::Unavailable),
            Some(Scripted::NotFound) | None => exn::bail!(ErrorKind::NotFound(resource_id.to_string())),
        }
    }
}
