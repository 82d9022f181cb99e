//! In-memory record store.

use crate::store::next_created_at;
use crate::{RecordStore, StorageError, StorageResult};
use loggable_types::ChangeRecord;
use std::sync::Mutex;
use tracing::debug;

/// A record store backed by a `Vec`, in append order.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<ChangeRecord>>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all objects.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Every stored record, oldest first.
    pub fn all(&self) -> StorageResult<Vec<ChangeRecord>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, Vec<ChangeRecord>>> {
        self.records.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl RecordStore for MemoryRecordStore {
    fn append(&self, mut record: ChangeRecord) -> StorageResult<ChangeRecord> {
        let mut records = self.lock()?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(StorageError::InvalidData(format!(
                "duplicate change id {}",
                record.id
            )));
        }
        record.created_at = next_created_at(records.last().map(|r| r.created_at));
        records.push(record.clone());
        debug!(
            "Appended {} record {} for {} {}",
            record.action, record.id, record.object_type, record.object_id
        );
        Ok(record)
    }

    fn find_by_object_id(&self, object_id: &str) -> StorageResult<Vec<ChangeRecord>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|r| r.object_id == object_id)
            .cloned()
            .collect())
    }

    fn find_latest_by_object_id(&self, object_id: &str) -> StorageResult<Option<ChangeRecord>> {
        // Appends are stamped in increasing order, so the last match is the latest.
        Ok(self
            .lock()?
            .iter()
            .rev()
            .find(|r| r.object_id == object_id)
            .cloned())
    }
}
