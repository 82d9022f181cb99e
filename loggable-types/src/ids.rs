//! Identifier types used throughout Loggable.
//!
//! Change records use UUID v7 so that ids sort roughly by creation time.
//! Tracked entities bring their own primary keys, which are normalized to a
//! stable textual form before they reach storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(Uuid);

impl ChangeId {
    /// Creates a new change ID with the current timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a change ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses a change ID from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ChangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChangeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Primary key of a tracked entity.
///
/// The [`Display`](fmt::Display) form is what ends up in
/// [`ChangeRecord::object_id`](crate::ChangeRecord::object_id) and in the
/// identity cache key, so it must be stable:
/// - integers render in decimal
/// - strings render verbatim
/// - composite keys render as a JSON array of their parts, e.g. `[7,"eu"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimaryKey {
    Int(i64),
    Uint(u64),
    Str(String),
    Composite(Vec<PrimaryKey>),
}

impl PrimaryKey {
    /// Builds a composite key from its parts, in order.
    pub fn composite<I, K>(parts: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PrimaryKey>,
    {
        Self::Composite(parts.into_iter().map(Into::into).collect())
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Uint(v) => serde_json::Value::from(*v),
            Self::Str(s) => serde_json::Value::from(s.as_str()),
            Self::Composite(parts) => {
                serde_json::Value::Array(parts.iter().map(Self::to_json).collect())
            }
        }
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
            Self::Composite(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<i64> for PrimaryKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for PrimaryKey {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for PrimaryKey {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<u32> for PrimaryKey {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<String> for PrimaryKey {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for PrimaryKey {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<&String> for PrimaryKey {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<Uuid> for PrimaryKey {
    fn from(v: Uuid) -> Self {
        Self::Str(v.to_string())
    }
}
