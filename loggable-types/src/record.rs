//! The change record: one immutable entry in an entity's history.

use crate::{ChangeId, Error, RawJson, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A typed value decoded from one of a record's raw columns.
///
/// The concrete type is whatever shape was registered for the record's
/// `object_type`; recover it with [`ChangeRecord::object`] or
/// [`ChangeRecord::meta`].
pub type Decoded = Arc<dyn Any + Send + Sync>;

/// The lifecycle event a change record was written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    /// The lowercase name used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

/// A single entry of audit history.
///
/// Records are never updated in place. `created_at` is assigned by the
/// record store when the record is appended; the value set by
/// [`ChangeRecord::new`] is only a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Unique identifier, assigned when the record is built.
    pub id: ChangeId,

    /// When the record was persisted.
    pub created_at: DateTime<Utc>,

    /// Free-form attribution (user name, service, ...).
    #[serde(default)]
    pub created_by: String,

    pub action: Action,

    /// Textual primary key of the tracked entity.
    pub object_id: String,

    /// Logical type name of the tracked entity.
    pub object_type: String,

    /// Full entity state at the time of the event.
    #[serde(default)]
    pub raw_object: RawJson,

    /// Entity-supplied metadata, null when the entity has none.
    #[serde(default)]
    pub raw_meta: RawJson,

    /// Changed field → new value. Only set on updates with a known prior state.
    #[serde(default)]
    pub raw_diff: RawJson,

    #[serde(skip)]
    object: Option<Decoded>,

    #[serde(skip)]
    meta: Option<Decoded>,
}

impl ChangeRecord {
    /// Creates a new record with a fresh id and null meta and diff.
    pub fn new(
        action: Action,
        object_id: impl Into<String>,
        object_type: impl Into<String>,
        raw_object: RawJson,
    ) -> Self {
        Self {
            id: ChangeId::new(),
            created_at: Utc::now(),
            created_by: String::new(),
            action,
            object_id: object_id.into(),
            object_type: object_type.into(),
            raw_object,
            raw_meta: RawJson::null(),
            raw_diff: RawJson::null(),
            object: None,
            meta: None,
        }
    }

    /// Sets the serialized metadata.
    #[must_use]
    pub fn with_meta(mut self, raw_meta: RawJson) -> Self {
        self.raw_meta = raw_meta;
        self
    }

    /// Sets the serialized diff.
    #[must_use]
    pub fn with_diff(mut self, raw_diff: RawJson) -> Self {
        self.raw_diff = raw_diff;
        self
    }

    /// Sets the attribution string.
    #[must_use]
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Decodes `raw_diff`. `None` when the record carries no diff.
    pub fn diff(&self) -> Result<Option<serde_json::Map<String, serde_json::Value>>> {
        if self.raw_diff.is_null() {
            return Ok(None);
        }
        self.raw_diff.decode().map(Some)
    }

    /// The decoded entity, if the record was prepared and `T` is the
    /// registered shape for its type.
    #[must_use]
    pub fn object<T: Any>(&self) -> Option<&T> {
        self.object.as_deref()?.downcast_ref()
    }

    /// The decoded metadata, if the record was prepared and `T` is the
    /// registered meta shape for its type.
    #[must_use]
    pub fn meta<T: Any>(&self) -> Option<&T> {
        self.meta.as_deref()?.downcast_ref()
    }

    /// True once a typed object has been attached.
    #[must_use]
    pub fn has_object(&self) -> bool {
        self.object.is_some()
    }

    /// True once typed metadata has been attached.
    #[must_use]
    pub fn has_meta(&self) -> bool {
        self.meta.is_some()
    }

    pub fn attach_object(&mut self, object: Decoded) {
        self.object = Some(object);
    }

    pub fn attach_meta(&mut self, meta: Decoded) {
        self.meta = Some(meta);
    }
}

// Transient decodings are not part of a record's identity.
impl PartialEq for ChangeRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.created_at == other.created_at
            && self.created_by == other.created_by
            && self.action == other.action
            && self.object_id == other.object_id
            && self.object_type == other.object_type
            && self.raw_object == other.raw_object
            && self.raw_meta == other.raw_meta
            && self.raw_diff == other.raw_diff
    }
}
