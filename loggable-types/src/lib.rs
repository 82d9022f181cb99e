//! Core type definitions for Loggable.
//!
//! This crate defines the storage-agnostic types shared by the change
//! recorder and every record store:
//! - Change identifiers (UUID v7) and entity primary keys
//! - The [`RawJson`] container used for every JSON-bearing column
//! - The immutable [`ChangeRecord`] and its [`Action`]
//!
//! Nothing here knows how records are persisted or how lifecycle events are
//! wired up. That belongs to `loggable-storage` and `loggable-core`.

mod ids;
mod raw;
mod record;

pub use ids::{ChangeId, PrimaryKey};
pub use raw::RawJson;
pub use record::{Action, ChangeRecord, Decoded};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value could not be converted to its raw JSON form.
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Raw JSON could not be parsed into the requested shape.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid action: {0}")]
    InvalidAction(String),
}
