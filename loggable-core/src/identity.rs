//! Identity-keyed snapshot cache.
//!
//! Holds the most recently observed state of each entity, keyed by a hash of
//! its type name and primary key. Updates read it as their "before" state.
//! Entries are deep copies taken by serializing the entity, so later
//! in-place mutation of the entity never reaches the cache.

use crate::{Loggable, LoggableError, LoggableResult};
use loggable_types::PrimaryKey;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Hash of an entity's (type name, primary key) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Computes the key for an explicit type name and primary key.
    ///
    /// The type name is length-prefixed before hashing so that no pair of
    /// distinct (type, key) inputs share a preimage.
    #[must_use]
    pub fn new(object_type: &str, primary_key: &PrimaryKey) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(object_type.len().to_string().as_bytes());
        hasher.update(b":");
        hasher.update(object_type.as_bytes());
        hasher.update(b":");
        hasher.update(primary_key.to_string().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Computes the key of a loggable entity.
    #[must_use]
    pub fn of<E: Loggable>(entity: &E) -> Self {
        Self::new(E::OBJECT_TYPE, &entity.primary_key())
    }

    /// The hex-encoded digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-local snapshot cache shared by concurrent lifecycle events.
///
/// Every `save` and `get` takes the lock for its whole duration, so a reader
/// never observes a half-written entry. There is no eviction.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: RwLock<HashMap<IdentityKey, Value>>,
}

impl IdentityCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a deep copy of `snapshot` under `key`, replacing any previous entry.
    pub fn save<T: Serialize + ?Sized>(&self, key: IdentityKey, snapshot: &T) -> LoggableResult<()> {
        let copy = serde_json::to_value(snapshot)?;
        debug!("Caching snapshot {}", key);
        // Entries are independent, so a poisoned map is still usable.
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, copy);
        Ok(())
    }

    /// The last snapshot saved under `key`, or `None` if there is none.
    #[must_use]
    pub fn get(&self, key: &IdentityKey) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// The last snapshot saved under `key`, decoded as `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &IdentityKey) -> LoggableResult<Option<T>> {
        match self.get(key) {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(LoggableError::SnapshotDecode),
            None => Ok(None),
        }
    }

    #[must_use]
    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
