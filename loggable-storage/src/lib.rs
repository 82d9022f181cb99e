//! Change record storage for Loggable.
//!
//! The change recorder only ever talks to a [`RecordStore`]: append a record,
//! list an object's records, fetch an object's latest record. Two stores ship
//! with the crate:
//!
//! - [`MemoryRecordStore`]: a process-local `Vec`, handy for tests and for
//!   hosts that forward records elsewhere
//! - [`SqliteRecordStore`]: a `change_logs` table in a SQLite file
//!
//! Both assign `created_at` on append and keep it strictly increasing, so an
//! object's history is totally ordered even when appends land within the same
//! clock tick.

mod error;
mod memory;
mod sqlite;
mod store;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;
pub use store::RecordStore;
