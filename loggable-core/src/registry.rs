//! Decode shapes for stored objects and metadata, by object type.

use crate::{LoggableError, LoggableResult};
use loggable_types::{ChangeRecord, Decoded, RawJson};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type DecodeFn = fn(&RawJson) -> Result<Decoded, serde_json::Error>;

fn decode_as<T>(raw: &RawJson) -> Result<Decoded, serde_json::Error>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let value: T = serde_json::from_slice(raw.as_bytes())?;
    Ok(Arc::new(value))
}

/// Maps object-type names to the types their raw columns decode into.
///
/// Filled in once while the recorder is being built; read-only afterwards.
/// A type with no registered shape is simply left undecoded.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    objects: HashMap<String, DecodeFn>,
    metas: HashMap<String, DecodeFn>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` as the shape of `raw_object` for `object_type`.
    pub fn register_object<T>(&mut self, object_type: impl Into<String>) -> &mut Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.objects.insert(object_type.into(), decode_as::<T>);
        self
    }

    /// Registers `T` as the shape of `raw_meta` for `object_type`.
    pub fn register_meta<T>(&mut self, object_type: impl Into<String>) -> &mut Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.metas.insert(object_type.into(), decode_as::<T>);
        self
    }

    #[must_use]
    pub fn has_object_type(&self, object_type: &str) -> bool {
        self.objects.contains_key(object_type)
    }

    #[must_use]
    pub fn has_meta_type(&self, object_type: &str) -> bool {
        self.metas.contains_key(object_type)
    }

    /// Decodes the record's raw columns into its transient `object` and `meta`.
    ///
    /// Unregistered types and null columns are skipped.
    pub fn prepare(&self, record: &mut ChangeRecord) -> LoggableResult<()> {
        if let Some(decode) = self.metas.get(&record.object_type)
            && !record.raw_meta.is_null()
        {
            let meta = decode(&record.raw_meta).map_err(|source| decode_error(record, source))?;
            record.attach_meta(meta);
        }
        if let Some(decode) = self.objects.get(&record.object_type)
            && !record.raw_object.is_null()
        {
            let object =
                decode(&record.raw_object).map_err(|source| decode_error(record, source))?;
            record.attach_object(object);
        }
        Ok(())
    }
}

fn decode_error(record: &ChangeRecord, source: serde_json::Error) -> LoggableError {
    LoggableError::Decode {
        id: record.id,
        object_type: record.object_type.clone(),
        source,
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("objects", &self.objects.keys().collect::<Vec<_>>())
            .field("metas", &self.metas.keys().collect::<Vec<_>>())
            .finish()
    }
}
