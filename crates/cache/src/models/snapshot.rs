use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use time::OffsetDateTime;
use tubesnap_resolver::{OwnerId, ResourceId, SnapshotKey, StoredSnapshot};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SnapshotRow {
    pub(crate) owner_id: String,
    pub(crate) kind: String,
    pub(crate) resource_id: String,
    pub(crate) payload: String,
    #[sqlx(default)]
    pub(crate) item_count: Option<i64>,
    pub(crate) fetch_limit: i64,
    pub(crate) exhausted: bool,
    /// Unix timestamp in nanoseconds.
    pub(crate) last_fetched_at: i64,
}
impl TryFrom<&StoredSnapshot> for SnapshotRow {
    type Error = Error;
    fn try_from(snapshot: &StoredSnapshot) -> Result<Self, Self::Error> {
        Ok(Self {
            owner_id: snapshot.key.owner.as_str().to_string(),
            kind: snapshot.key.kind.clone(),
            resource_id: snapshot.key.resource_id.as_str().to_string(),
            payload: snapshot.payload.clone(),
            item_count: snapshot.item_count.map(i64::from),
            fetch_limit: i64::from(snapshot.fetch_limit),
            exhausted: snapshot.exhausted,
            last_fetched_at: i64::try_from(snapshot.last_fetched_at.unix_timestamp_nanos())
                .or_raise(|| ErrorKind::invalid("fetch timestamp"))?,
        })
    }
}
impl TryFrom<SnapshotRow> for StoredSnapshot {
    type Error = Error;
    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        let owner = OwnerId::parse(Some(&row.owner_id)).or_raise(|| ErrorKind::invalid("owner id"))?;
        let resource_id = ResourceId::parse(&row.resource_id).or_raise(|| ErrorKind::invalid("resource id"))?;
        Ok(Self {
            key: SnapshotKey::new(owner, row.kind, resource_id),
            payload: row.payload,
            item_count: row
                .item_count
                .map(|count| u32::try_from(count).or_raise(|| ErrorKind::invalid("item count")))
                .transpose()?,
            fetch_limit: u32::try_from(row.fetch_limit).or_raise(|| ErrorKind::invalid("fetch limit"))?,
            exhausted: row.exhausted,
            last_fetched_at: OffsetDateTime::from_unix_timestamp_nanos(i128::from(row.last_fetched_at))
                .or_raise(|| ErrorKind::invalid("fetch timestamp"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SnapshotRow {
        SnapshotRow {
            owner_id: "U1".to_string(),
            kind: "comments".to_string(),
            resource_id: "dQw4w9WgXcQ".to_string(),
            payload: "[]".to_string(),
            item_count: Some(0),
            fetch_limit: 20,
            exhausted: true,
            last_fetched_at: 1_700_000_000_123_456_789,
        }
    }

    #[test]
    fn test_row_to_model() {
        let model = StoredSnapshot::try_from(row()).unwrap();
        assert_eq!(model.key.owner.as_str(), "U1");
        assert_eq!(model.key.kind, "comments");
        assert_eq!(model.item_count, Some(0));
        // Nanoseconds survive the round trip through the column.
        assert_eq!(model.last_fetched_at.nanosecond(), 123_456_789);
    }

    #[test]
    fn test_model_to_row() {
        let model = StoredSnapshot::try_from(row()).unwrap();
        let back = SnapshotRow::try_from(&model).unwrap();
        assert_eq!(back.last_fetched_at, 1_700_000_000_123_456_789);
        assert_eq!(back.fetch_limit, 20);
        assert!(back.exhausted);
    }

    #[test]
    fn test_row_with_bad_owner() {
        let mut row = row();
        row.owner_id = String::new();
        let err = StoredSnapshot::try_from(row).unwrap_err();
        assert_eq!(*err, ErrorKind::invalid("owner id"));
    }

    #[test]
    fn test_row_with_negative_count() {
        let mut row = row();
        row.item_count = Some(-1);
        let err = StoredSnapshot::try_from(row).unwrap_err();
        assert_eq!(*err, ErrorKind::invalid("item count"));
    }
}
