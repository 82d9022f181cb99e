use crate::StorageResult;
use chrono::{DateTime, TimeDelta, Utc};
use loggable_types::ChangeRecord;
use std::sync::Arc;

/// The narrow storage contract the change recorder depends on.
///
/// Implementations own durability, indexing and retries. Records are
/// append-only: there is no update or delete.
pub trait RecordStore: Send + Sync {
    /// Persists `record`, assigning its `created_at`, and returns the stored copy.
    fn append(&self, record: ChangeRecord) -> StorageResult<ChangeRecord>;

    /// All records for `object_id`, oldest first.
    fn find_by_object_id(&self, object_id: &str) -> StorageResult<Vec<ChangeRecord>>;

    /// The most recently created record for `object_id`.
    fn find_latest_by_object_id(&self, object_id: &str) -> StorageResult<Option<ChangeRecord>>;
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn append(&self, record: ChangeRecord) -> StorageResult<ChangeRecord> {
        (**self).append(record)
    }

    fn find_by_object_id(&self, object_id: &str) -> StorageResult<Vec<ChangeRecord>> {
        (**self).find_by_object_id(object_id)
    }

    fn find_latest_by_object_id(&self, object_id: &str) -> StorageResult<Option<ChangeRecord>> {
        (**self).find_latest_by_object_id(object_id)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn append(&self, record: ChangeRecord) -> StorageResult<ChangeRecord> {
        (**self).append(record)
    }

    fn find_by_object_id(&self, object_id: &str) -> StorageResult<Vec<ChangeRecord>> {
        (**self).find_by_object_id(object_id)
    }

    fn find_latest_by_object_id(&self, object_id: &str) -> StorageResult<Option<ChangeRecord>> {
        (**self).find_latest_by_object_id(object_id)
    }
}

/// Next creation timestamp: now, truncated to microseconds, but always
/// strictly after `last`.
pub(crate) fn next_created_at(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    let now = DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now);
    match last {
        Some(last) if now <= last => last + TimeDelta::microseconds(1),
        _ => now,
    }
}
