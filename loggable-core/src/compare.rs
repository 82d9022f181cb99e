//! Field-wise equality used by lazy-update suppression.
//!
//! The stored side arrives as raw JSON bytes and the live side as a typed
//! entity. Both are normalized to a map of snake_case field name → value
//! before comparing, so `CreatedAt` and `created_at` name the same field.

use loggable_types::RawJson;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Top-level fields of a JSON object, keyed by snake_case name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap(BTreeMap<String, Value>);

impl FieldMap {
    /// Parses stored bytes. `None` unless they hold a JSON object.
    #[must_use]
    pub fn from_raw(raw: &RawJson) -> Option<Self> {
        serde_json::from_slice(raw.as_bytes())
            .ok()
            .and_then(Self::from_value)
    }

    /// Serializes a live value. `None` unless it serializes to a JSON object.
    #[must_use]
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Option<Self> {
        serde_json::to_value(value).ok().and_then(Self::from_value)
    }

    /// `None` when the value is not an object, or when two of its keys
    /// normalize to the same name (e.g. `userId` and `user_id`).
    fn from_value(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let mut fields = BTreeMap::new();
        for (k, v) in map {
            let name = to_snake_case(&k);
            if fields.insert(name, v).is_some() {
                debug!("Field {} collides with another after normalization", k);
                return None;
            }
        }
        Some(Self(fields))
    }

    /// True when both maps hold the same fields with equal values, ignoring
    /// the `excluded` fields (given in snake_case).
    #[must_use]
    pub fn equals_except(&self, other: &Self, excluded: &[String]) -> bool {
        fn kept<'a>(map: &'a FieldMap, excluded: &[String]) -> BTreeMap<&'a str, &'a Value> {
            map.0
                .iter()
                .filter(|(k, _)| !excluded.contains(k))
                .map(|(k, v)| (k.as_str(), v))
                .collect()
        }
        kept(self, excluded) == kept(other, excluded)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(&to_snake_case(field))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compares a stored raw object against a live value, ignoring `excluded`.
///
/// Anything that is not a JSON object on either side compares unequal.
#[must_use]
pub fn is_equal<T: Serialize + ?Sized>(stored: &RawJson, live: &T, excluded: &[String]) -> bool {
    match (FieldMap::from_raw(stored), FieldMap::from_serialize(live)) {
        (Some(stored), Some(live)) => stored.equals_except(&live, excluded),
        _ => false,
    }
}

/// `CreatedAt` → `created_at`. Already snake_case names pass through.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
