//! Opaque serialized JSON.
//!
//! [`RawJson`] holds the exact bytes a producer emitted. It never validates
//! or re-encodes on the way in, so key order and whitespace survive a trip
//! through storage untouched. Embedding it in a larger serde document keeps
//! everything but the whitespace around the top-level value.
//!
//! Equality is byte equality: two objects with the same keys in a different
//! order are different containers.

use crate::{Error, Result};
use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;

const NULL: &[u8] = b"null";

/// A byte container for serialized JSON.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct RawJson(Vec<u8>);

impl RawJson {
    /// Creates an empty (null) container.
    #[must_use]
    pub const fn null() -> Self {
        Self(Vec::new())
    }

    /// Wraps the given bytes as-is.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Serializes `value` into a new container.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_vec(value)
            .map(Self)
            .map_err(Error::Serialization)
    }

    /// True when the container is empty or holds the literal `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_empty() || self.0 == NULL
    }

    /// The raw bytes, exactly as stored.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Replaces the contents with `src`. `None` clears the container.
    pub fn scan(&mut self, src: Option<&[u8]>) {
        self.0.clear();
        if let Some(bytes) = src {
            self.0.extend_from_slice(bytes);
        }
    }

    /// The value handed to a storage driver: `None` for a null container,
    /// otherwise the stored bytes.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        if self.is_null() { None } else { Some(&self.0) }
    }

    /// JSON encoding of the container. Null containers always encode as `null`.
    #[must_use]
    pub fn marshal(&self) -> &[u8] {
        if self.is_null() { NULL } else { &self.0 }
    }

    /// Parses the contents into a new `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.0).map_err(Error::Decode)
    }
}

impl From<Vec<u8>> for RawJson {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for RawJson {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl fmt::Debug for RawJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawJson")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

impl fmt::Display for RawJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.marshal()))
    }
}

/// Embeds the stored JSON as-is, except that whitespace surrounding the
/// top-level value is dropped. Use [`RawJson::marshal`] for the exact bytes.
impl Serialize for RawJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_null() {
            return serializer.serialize_unit();
        }
        let text = std::str::from_utf8(&self.0).map_err(S::Error::custom)?;
        let raw = RawValue::from_string(text.to_owned()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawJson {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(Self(raw.get().as_bytes().to_vec()))
    }
}
