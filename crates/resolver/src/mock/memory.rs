//! In-memory snapshot store for testing.

use crate::request::OwnerId;
use crate::snapshot::{SnapshotKey, StoredSnapshot};
use crate::store::{ErrorKind, Result, SnapshotStore};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use time::Duration;
use tokio::sync::RwLock;

/// In-memory snapshot store for testing.
///
/// Snapshots live in a `BTreeMap` behind a [`RwLock`], so every trait method
/// works on `&self`. Writes are counted, and the store can be switched into a
/// failing mode to exercise error paths.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: RwLock<BTreeMap<SnapshotKey, StoredSnapshot>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Number of successful [`put`](SnapshotStore::put) calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent operation fail with [`ErrorKind::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Replace a stored record without any of the usual bookkeeping.
    pub async fn insert_raw(&self, snapshot: StoredSnapshot) {
        self.snapshots.write().await.insert(snapshot.key.clone(), snapshot);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn get(&self, key: &SnapshotKey) -> Result<Option<StoredSnapshot>> {
        self.check()?;
        Ok(self.snapshots.read().await.get(key).cloned())
    }

    async fn put(&self, mut snapshot: StoredSnapshot) -> Result<StoredSnapshot> {
        self.check()?;
        let mut guard = self.snapshots.write().await;
        if let Some(previous) = guard.get(&snapshot.key)
            && snapshot.last_fetched_at <= previous.last_fetched_at
        {
            snapshot.last_fetched_at = previous.last_fetched_at + Duration::nanoseconds(1);
        }
        guard.insert(snapshot.key.clone(), snapshot.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(snapshot)
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<StoredSnapshot>> {
        self.check()?;
        let guard = self.snapshots.read().await;
        Ok(guard.values().filter(|snapshot| &snapshot.key.owner == owner).cloned().collect())
    }

    async fn delete(&self, key: &SnapshotKey) -> Result<bool> {
        self.check()?;
        Ok(self.snapshots.write().await.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ResourceId;
    use time::OffsetDateTime;

    fn key(owner: &str, id: &str) -> SnapshotKey {
        SnapshotKey::new(OwnerId::parse(Some(owner)).unwrap(), "video", ResourceId::parse(id).unwrap())
    }

    fn record(key: SnapshotKey, payload: &str, at: OffsetDateTime) -> StoredSnapshot {
        StoredSnapshot {
            key,
            payload: payload.to_string(),
            item_count: None,
            fetch_limit: 20,
            exhausted: true,
            last_fetched_at: at,
        }
    }

    #[tokio::test]
    async fn test_put_overwrites_in_place() {
        let store = MemoryStore::default();
        let now = OffsetDateTime::now_utc();
        store.put(record(key("U1", "V1"), "1", now)).await.unwrap();
        store.put(record(key("U1", "V1"), "2", now + Duration::seconds(1))).await.unwrap();
        let all = store.list(&OwnerId::parse(Some("U1")).unwrap()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].payload, "2");
        assert_eq!(store.writes(), 2);
    }

    #[tokio::test]
    async fn test_put_keeps_timestamps_increasing() {
        let store = MemoryStore::default();
        let now = OffsetDateTime::now_utc();
        let first = store.put(record(key("U1", "V1"), "1", now)).await.unwrap();
        let second = store.put(record(key("U1", "V1"), "2", now - Duration::seconds(5))).await.unwrap();
        assert!(second.last_fetched_at > first.last_fetched_at);
    }

    #[tokio::test]
    async fn test_owners_are_partitioned() {
        let store = MemoryStore::default();
        let now = OffsetDateTime::now_utc();
        store.put(record(key("U1", "V1"), "1", now)).await.unwrap();
        store.put(record(key("U2", "V1"), "2", now)).await.unwrap();
        assert!(store.delete(&key("U2", "V1")).await.unwrap());
        assert!(!store.delete(&key("U2", "V1")).await.unwrap());
        assert!(store.get(&key("U1", "V1")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failing() {
        let store = MemoryStore::default();
        store.set_failing(true);
        let err = store.get(&key("U1", "V1")).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Unavailable);
    }
}
