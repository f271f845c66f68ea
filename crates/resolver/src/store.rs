//! Persisted snapshot store capability.

use crate::request::OwnerId;
use crate::snapshot::{SnapshotKey, StoredSnapshot};
use async_trait::async_trait;
use derive_more::{Display, Error};
use std::sync::Arc;

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backing store could not be read from or written to.
    #[display("snapshot store unavailable")]
    Unavailable,
    /// A persisted record could not be converted back into a snapshot.
    #[display("invalid snapshot data: {_0}")]
    InvalidData(#[error(not(source))] String),
}

pub type StoreHandle = Arc<dyn SnapshotStore>;

/// Keyed persistence for snapshots.
///
/// Implementations must guarantee:
/// - at most one snapshot per [`SnapshotKey`]; [`put`](Self::put) overwrites
///   the whole record in place, never a subset of its fields;
/// - `last_fetched_at` strictly increases across overwrites of the same key.
///   If the incoming timestamp is not later than the stored one, the store
///   persists the stored timestamp plus one nanosecond instead.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Look up the snapshot for a key.
    async fn get(&self, key: &SnapshotKey) -> Result<Option<StoredSnapshot>>;

    /// Insert or overwrite a snapshot, returning the record exactly as persisted.
    async fn put(&self, snapshot: StoredSnapshot) -> Result<StoredSnapshot>;

    /// All snapshots belonging to an owner, ordered by kind then resource id.
    async fn list(&self, owner: &OwnerId) -> Result<Vec<StoredSnapshot>>;

    /// Remove a snapshot. Returns `true` if one existed.
    async fn delete(&self, key: &SnapshotKey) -> Result<bool>;
}
