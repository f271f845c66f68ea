//! Snapshot records.
//!
//! A snapshot is the last known upstream state of one resource for one owner.
//! Stores deal in [`StoredSnapshot`] (payload as JSON text, kind as a plain
//! string) so a single table can hold every resource kind; the resolver
//! decodes it into a typed [`Snapshot`] for the kind it serves.

use crate::error::{ErrorKind, Result};
use crate::request::{Limit, OwnerId, ResourceId};
use crate::resource::{Payload, Resource};
use exn::ResultExt;
use time::OffsetDateTime;

/// Identity of a snapshot: at most one exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotKey {
    pub owner: OwnerId,
    pub kind: String,
    pub resource_id: ResourceId,
}
impl SnapshotKey {
    pub fn new(owner: OwnerId, kind: impl Into<String>, resource_id: ResourceId) -> Self {
        Self { owner, kind: kind.into(), resource_id }
    }

    /// Key for a resource kind known at compile time.
    pub fn of<R: Resource>(owner: OwnerId, resource_id: ResourceId) -> Self {
        Self::new(owner, R::KIND, resource_id)
    }
}

/// A snapshot as persisted by a [`SnapshotStore`](crate::SnapshotStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSnapshot {
    pub key: SnapshotKey,
    /// JSON encoding of the payload.
    pub payload: String,
    /// Number of items for collection payloads.
    pub item_count: Option<u32>,
    /// The limit the upstream fetch that produced this payload was bounded by.
    pub fetch_limit: u32,
    /// Upstream reported nothing beyond the stored items.
    pub exhausted: bool,
    pub last_fetched_at: OffsetDateTime,
}

/// A decoded snapshot of a known resource kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<P> {
    pub key: SnapshotKey,
    pub payload: P,
    pub item_count: Option<u32>,
    pub fetch_limit: u32,
    pub exhausted: bool,
    pub last_fetched_at: OffsetDateTime,
}

impl<P: Payload> Snapshot<P> {
    /// Encode a freshly fetched payload, ready to be handed to the store.
    pub(crate) fn encode(
        key: SnapshotKey,
        payload: &P,
        fetch_limit: Limit,
        exhausted: bool,
        fetched_at: OffsetDateTime,
    ) -> Result<StoredSnapshot> {
        let item_count = payload
            .item_count()
            .map(|count| u32::try_from(count).or_raise(|| ErrorKind::Store))
            .transpose()?;
        Ok(StoredSnapshot {
            key,
            payload: serde_json::to_string(payload).or_raise(|| ErrorKind::Store)?,
            item_count,
            fetch_limit: fetch_limit.get(),
            exhausted,
            last_fetched_at: fetched_at,
        })
    }

    /// Whether this snapshot can answer a request for `limit` items.
    ///
    /// Single objects always can. A collection can if it was fetched with at
    /// least that limit, or if upstream reported it had nothing more to give.
    /// A short collection alone proves nothing.
    pub fn covers(&self, limit: Limit) -> bool {
        match self.item_count {
            None => true,
            Some(_) => limit.get() <= self.fetch_limit || self.exhausted,
        }
    }
}

impl<P: Payload> TryFrom<StoredSnapshot> for Snapshot<P> {
    type Error = crate::error::Error;
    fn try_from(stored: StoredSnapshot) -> Result<Self> {
        let payload = serde_json::from_str(&stored.payload).or_raise(|| ErrorKind::Store)?;
        Ok(Self {
            key: stored.key,
            payload,
            item_count: stored.item_count,
            fetch_limit: stored.fetch_limit,
            exhausted: stored.exhausted,
            last_fetched_at: stored.last_fetched_at,
        })
    }
}
