mod snapshot;

pub(crate) use self::snapshot::SnapshotRow;
