//! SQLite-backed record store.
//!
//! Records live in a single `change_logs` table. Raw JSON columns are stored
//! as BLOBs so the bytes come back exactly as they went in; a null container
//! is stored as SQL `NULL`.

use crate::store::next_created_at;
use crate::{RecordStore, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use loggable_types::{Action, ChangeId, ChangeRecord, RawJson};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const SELECT_COLUMNS: &str = "SELECT id, created_at, created_by, action, object_id, object_type, \
     raw_object, raw_meta, raw_diff FROM change_logs";

/// Persistent change record store backed by SQLite.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!("Opened change log database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS change_logs (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                created_at INTEGER NOT NULL,
                created_by TEXT NOT NULL DEFAULT '',
                action TEXT NOT NULL,
                object_id TEXT NOT NULL,
                object_type TEXT NOT NULL,
                raw_object BLOB,
                raw_meta BLOB,
                raw_diff BLOB
            );

            CREATE INDEX IF NOT EXISTS idx_change_logs_object_id ON change_logs(object_id);
            CREATE INDEX IF NOT EXISTS idx_change_logs_object_type ON change_logs(object_type);
            CREATE INDEX IF NOT EXISTS idx_change_logs_created_by ON change_logs(created_by);
            CREATE INDEX IF NOT EXISTS idx_change_logs_created_at ON change_logs(created_at);
            ",
        )?;
        Ok(())
    }

    /// Total number of stored records.
    pub fn count(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM change_logs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl RecordStore for SqliteRecordStore {
    fn append(&self, mut record: ChangeRecord) -> StorageResult<ChangeRecord> {
        let conn = self.lock()?;
        let last: Option<i64> =
            conn.query_row("SELECT MAX(created_at) FROM change_logs", [], |row| row.get(0))?;
        record.created_at = next_created_at(last.and_then(DateTime::from_timestamp_micros));

        conn.execute(
            "INSERT INTO change_logs (id, created_at, created_by, action, object_id, object_type, raw_object, raw_meta, raw_diff)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id.to_string(),
                record.created_at.timestamp_micros(),
                record.created_by,
                record.action.as_str(),
                record.object_id,
                record.object_type,
                record.raw_object.value(),
                record.raw_meta.value(),
                record.raw_diff.value(),
            ],
        )?;
        // A textual `null` is stored as SQL NULL; hand back what a read returns.
        for raw in [&mut record.raw_object, &mut record.raw_meta, &mut record.raw_diff] {
            if raw.is_null() {
                *raw = RawJson::null();
            }
        }
        debug!(
            "Appended {} record {} for {} {}",
            record.action, record.id, record.object_type, record.object_id
        );
        Ok(record)
    }

    fn find_by_object_id(&self, object_id: &str) -> StorageResult<Vec<ChangeRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE object_id = ?1 ORDER BY created_at ASC, seq ASC"
        ))?;
        let rows = stmt.query_map(params![object_id], read_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(into_record(row?)?);
        }
        Ok(records)
    }

    fn find_latest_by_object_id(&self, object_id: &str) -> StorageResult<Option<ChangeRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!(
                    "{SELECT_COLUMNS} WHERE object_id = ?1 ORDER BY created_at DESC, seq DESC LIMIT 1"
                ),
                params![object_id],
                read_row,
            )
            .optional()?;
        row.map(into_record).transpose()
    }
}

/// Column values of one `change_logs` row, before validation.
struct RawRow {
    id: String,
    created_at: i64,
    created_by: String,
    action: String,
    object_id: String,
    object_type: String,
    raw_object: Option<Vec<u8>>,
    raw_meta: Option<Vec<u8>>,
    raw_diff: Option<Vec<u8>>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        created_at: row.get(1)?,
        created_by: row.get(2)?,
        action: row.get(3)?,
        object_id: row.get(4)?,
        object_type: row.get(5)?,
        raw_object: row.get(6)?,
        raw_meta: row.get(7)?,
        raw_diff: row.get(8)?,
    })
}

fn into_record(row: RawRow) -> StorageResult<ChangeRecord> {
    let id = ChangeId::parse(&row.id)
        .map_err(|e| StorageError::InvalidData(format!("bad change id {}: {e}", row.id)))?;
    let action: Action = row
        .action
        .parse()
        .map_err(|e| StorageError::InvalidData(format!("{e}")))?;
    let created_at: DateTime<Utc> = DateTime::from_timestamp_micros(row.created_at)
        .ok_or_else(|| StorageError::InvalidData(format!("bad created_at {}", row.created_at)))?;

    let mut record = ChangeRecord::new(action, row.object_id, row.object_type, scan(row.raw_object))
        .with_meta(scan(row.raw_meta))
        .with_diff(scan(row.raw_diff))
        .with_created_by(row.created_by);
    record.id = id;
    record.created_at = created_at;
    Ok(record)
}

fn scan(column: Option<Vec<u8>>) -> RawJson {
    let mut raw = RawJson::null();
    raw.scan(column.as_deref());
    raw
}
