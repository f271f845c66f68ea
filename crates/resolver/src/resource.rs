//! Resource kinds and their payloads.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A kind of upstream resource that can be snapshotted.
///
/// Implemented by zero-sized marker types; one [`Resolver`](crate::Resolver)
/// per kind. The `KIND` name partitions snapshots in the store, so two kinds
/// may share resource ids (a video and its comments, for example) without
/// overwriting each other.
pub trait Resource: Send + Sync + 'static {
    /// Stable, lowercase name of this resource kind.
    const KIND: &'static str;
    /// Structured data returned by upstream and persisted in snapshots.
    type Payload: Payload;
}

/// Data stored in a snapshot.
///
/// Single objects keep the default implementations. Collections report how
/// many items they hold and know how to drop everything past a limit; the
/// blanket implementation for [`Vec`] covers the common case.
pub trait Payload: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Number of items, or `None` if this payload is not a collection.
    fn item_count(&self) -> Option<usize> {
        None
    }

    /// Keep at most `limit` items. No-op for single objects.
    fn truncate(&mut self, _limit: usize) {}
}

impl<T> Payload for Vec<T>
where
    T: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn item_count(&self) -> Option<usize> {
        Some(self.len())
    }

    fn truncate(&mut self, limit: usize) {
        Vec::truncate(self, limit);
    }
}
