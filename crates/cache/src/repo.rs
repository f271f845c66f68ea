//! Snapshot repository.

use crate::Database;
use crate::error::{Error, ErrorKind, Result};
use crate::models::SnapshotRow;
use async_trait::async_trait;
use exn::ResultExt;
use sqlx::SqlitePool;
use tubesnap_resolver::store::{self, SnapshotStore};
use tubesnap_resolver::{OwnerId, SnapshotKey, StoredSnapshot};

/// Repository for snapshot rows in the cache database.
///
/// Rows are keyed by `(owner_id, kind, resource_id)`. Writes are upserts that
/// replace every column of an existing row at once; the database itself keeps
/// `last_fetched_at` strictly increasing per key.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the snapshot stored under a key.
    pub async fn get_snapshot(&self, key: &SnapshotKey) -> Result<Option<StoredSnapshot>> {
        let row: Option<SnapshotRow> = sqlx::query_as(include_str!("../queries/get_snapshot.sql"))
            .bind(key.owner.as_str())
            .bind(key.kind.as_str())
            .bind(key.resource_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(StoredSnapshot::try_from).transpose()
    }

    /// Insert a snapshot, or overwrite the one already stored under its key.
    ///
    /// Returns the row as persisted. Its `last_fetched_at` may be later than
    /// the one passed in: if the incoming timestamp does not advance past the
    /// stored one, the stored one plus a nanosecond is used instead.
    pub async fn upsert_snapshot(&self, snapshot: &StoredSnapshot) -> Result<StoredSnapshot> {
        let row = SnapshotRow::try_from(snapshot)?;
        let stored: SnapshotRow = sqlx::query_as(include_str!("../queries/upsert_snapshot.sql"))
            .bind(row.owner_id)
            .bind(row.kind)
            .bind(row.resource_id)
            .bind(row.payload)
            .bind(row.item_count)
            .bind(row.fetch_limit)
            .bind(row.exhausted)
            .bind(row.last_fetched_at)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        StoredSnapshot::try_from(stored)
    }

    /// List every snapshot of one owner, ordered by kind then resource id.
    pub async fn list_snapshots_for_owner(&self, owner: &OwnerId) -> Result<Vec<StoredSnapshot>> {
        let rows: Vec<SnapshotRow> = sqlx::query_as(include_str!("../queries/list_snapshots_for_owner.sql"))
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(StoredSnapshot::try_from).collect()
    }

    /// Delete the snapshot stored under a key.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_snapshot(&self, key: &SnapshotKey) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/delete_snapshot.sql"))
            .bind(key.owner.as_str())
            .bind(key.kind.as_str())
            .bind(key.resource_id.as_str())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

fn into_store_error(err: Error) -> store::Error {
    let kind = match &*err {
        ErrorKind::InvalidData(what) => store::ErrorKind::InvalidData(what.clone()),
        ErrorKind::Database | ErrorKind::Migration => store::ErrorKind::Unavailable,
    };
    err.raise(kind)
}

#[async_trait]
impl SnapshotStore for Repository {
    async fn get(&self, key: &SnapshotKey) -> store::Result<Option<StoredSnapshot>> {
        self.get_snapshot(key).await.map_err(into_store_error)
    }

    async fn put(&self, snapshot: StoredSnapshot) -> store::Result<StoredSnapshot> {
        self.upsert_snapshot(&snapshot).await.map_err(into_store_error)
    }

    async fn list(&self, owner: &OwnerId) -> store::Result<Vec<StoredSnapshot>> {
        self.list_snapshots_for_owner(owner).await.map_err(into_store_error)
    }

    async fn delete(&self, key: &SnapshotKey) -> store::Result<bool> {
        self.delete_snapshot(key).await.map_err(into_store_error)
    }
}
