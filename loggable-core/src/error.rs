//! Error types for the change recorder.

use loggable_storage::StorageError;
use loggable_types::{ChangeId, ChangeRecord};
use thiserror::Error;

/// Result type for recorder operations.
pub type LoggableResult<T> = Result<T, LoggableError>;

/// Errors that can occur while recording or reading back changes.
#[derive(Debug, Error)]
pub enum LoggableError {
    /// The entity or its metadata could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored raw column could not be decoded into its registered shape.
    #[error("failed to decode {object_type} record {id}: {source}")]
    Decode {
        id: ChangeId,
        object_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// A cached snapshot could not be decoded into the requested type.
    #[error("failed to decode cached snapshot: {0}")]
    SnapshotDecode(#[source] serde_json::Error),

    /// Batch read-back stopped at `failed_at`.
    ///
    /// `records` holds the whole batch; every record before `failed_at` has
    /// been prepared.
    #[error("decoding stopped at record {failed_at} of {}: {source}", .records.len())]
    PartialDecode {
        records: Vec<ChangeRecord>,
        failed_at: usize,
        #[source]
        source: Box<LoggableError>,
    },

    /// The record store failed.
    #[error("storage error: {0}")]
    Store(#[from] StorageError),

    /// No change record exists for the object.
    #[error("no change record for object {0}")]
    NotFound(String),
}
