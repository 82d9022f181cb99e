//! The change recorder: turns entity lifecycle events into change records.
//!
//! Each call is an independent decision:
//! - read: snapshot the entity into the identity cache, write nothing
//! - create / delete: write a record if tracking is enabled
//! - update: optionally suppress no-op updates, optionally attach a diff
//!   against the cached snapshot, then write a record

use crate::compare::is_equal;
use crate::diff::compute_diff;
use crate::{
    IdentityCache, IdentityKey, LazyUpdateConfig, Loggable, LoggableError, LoggableResult,
    RecorderConfig, TypeRegistry,
};
use loggable_storage::RecordStore;
use loggable_types::{Action, ChangeRecord, RawJson};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Records entity changes into a [`RecordStore`].
pub struct ChangeRecorder<S> {
    store: S,
    cache: Arc<IdentityCache>,
    registry: TypeRegistry,
    config: RecorderConfig,
    /// `config.lazy_update` exclusions, snake_cased once at build time.
    lazy_excluded: Option<Vec<String>>,
}

impl<S: RecordStore> ChangeRecorder<S> {
    /// A recorder with default configuration, a fresh cache and no registered types.
    pub fn new(store: S) -> Self {
        Self::builder(store).build()
    }

    pub fn builder(store: S) -> ChangeRecorderBuilder<S> {
        ChangeRecorderBuilder::new(store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &Arc<IdentityCache> {
        &self.cache
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// A handle that attributes every record it writes to `user`.
    pub fn as_user(&self, user: impl Into<String>) -> AttributedRecorder<'_, S> {
        AttributedRecorder {
            recorder: self,
            user: user.into(),
        }
    }

    // ── Read path ────────────────────────────────────────────────

    /// Caches the entity's current state as the "before" of its next update.
    pub fn track_snapshot<E: Loggable>(&self, entity: &E) -> LoggableResult<()> {
        self.cache.save(IdentityKey::of(entity), entity)
    }

    /// Caches every entity of a query result. Returns how many were cached;
    /// an empty result is a no-op.
    pub fn track_snapshots<'a, E, I>(&self, entities: I) -> LoggableResult<usize>
    where
        E: Loggable + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut tracked = 0;
        for entity in entities {
            self.track_snapshot(entity)?;
            tracked += 1;
        }
        Ok(tracked)
    }

    // ── Write path ───────────────────────────────────────────────

    /// Writes a `create` record. `None` when tracking is disabled.
    pub fn record_on_create<E: Loggable>(&self, entity: &E) -> LoggableResult<Option<ChangeRecord>> {
        self.record_simple(Action::Create, entity, &self.config.default_author)
    }

    /// Writes an `update` record. `None` when tracking is disabled or the
    /// update was suppressed as a no-op.
    pub fn record_on_update<E: Loggable>(&self, entity: &E) -> LoggableResult<Option<ChangeRecord>> {
        self.record_update(entity, &self.config.default_author)
    }

    /// Writes a `delete` record. `None` when tracking is disabled.
    pub fn record_on_delete<E: Loggable>(&self, entity: &E) -> LoggableResult<Option<ChangeRecord>> {
        self.record_simple(Action::Delete, entity, &self.config.default_author)
    }

    fn record_simple<E: Loggable>(
        &self,
        action: Action,
        entity: &E,
        created_by: &str,
    ) -> LoggableResult<Option<ChangeRecord>> {
        if !entity.is_enabled() {
            debug!("Tracking disabled for {} {}", E::OBJECT_TYPE, entity.primary_key());
            return Ok(None);
        }
        let record = self.build_record(action, entity, created_by)?;
        self.persist(record).map(Some)
    }

    fn record_update<E: Loggable>(
        &self,
        entity: &E,
        created_by: &str,
    ) -> LoggableResult<Option<ChangeRecord>> {
        if !entity.is_enabled() {
            debug!("Tracking disabled for {} {}", E::OBJECT_TYPE, entity.primary_key());
            return Ok(None);
        }
        let primary_key = entity.primary_key();
        let object_id = primary_key.to_string();

        if let Some(excluded) = &self.lazy_excluded {
            let latest = self.store.find_latest_by_object_id(&object_id).map_err(|e| {
                warn!("Failed to load latest record for {}: {}", object_id, e);
                LoggableError::from(e)
            })?;
            if let Some(latest) = latest
                && is_equal(&latest.raw_object, entity, excluded)
            {
                debug!("Suppressed no-op update of {} {}", E::OBJECT_TYPE, object_id);
                return Ok(None);
            }
        }

        let mut record = self.build_record(Action::Update, entity, created_by)?;
        if self.config.compute_diff {
            let before = self.cache.get(&IdentityKey::new(E::OBJECT_TYPE, &primary_key));
            let after = serde_json::to_value(entity)?;
            if let Some(diff) = compute_diff(before.as_ref(), &after, E::DIFFABLE_FIELDS) {
                record = record.with_diff(RawJson::from(serde_json::to_vec(&diff)?));
            }
        }
        self.persist(record).map(Some)
    }

    fn build_record<E: Loggable>(
        &self,
        action: Action,
        entity: &E,
        created_by: &str,
    ) -> LoggableResult<ChangeRecord> {
        let raw_object = RawJson::from(serde_json::to_vec(entity)?);
        let raw_meta = match entity.meta() {
            Some(meta) => RawJson::from(serde_json::to_vec(&meta)?),
            None => RawJson::null(),
        };
        Ok(
            ChangeRecord::new(action, entity.primary_key().to_string(), E::OBJECT_TYPE, raw_object)
                .with_meta(raw_meta)
                .with_created_by(created_by),
        )
    }

    fn persist(&self, record: ChangeRecord) -> LoggableResult<ChangeRecord> {
        match self.store.append(record) {
            Ok(stored) => {
                debug!(
                    "Recorded {} of {} {} as {}",
                    stored.action, stored.object_type, stored.object_id, stored.id
                );
                Ok(stored)
            }
            Err(e) => {
                warn!("Failed to append change record: {}", e);
                Err(e.into())
            }
        }
    }

    // ── Read-back ────────────────────────────────────────────────

    /// Every record of `object_id`, oldest first.
    ///
    /// With `prepare`, registered types get their `object` and `meta`
    /// decoded. On a decode failure the error carries the whole batch, with
    /// every record before the failing one already prepared.
    pub fn records(&self, object_id: &str, prepare: bool) -> LoggableResult<Vec<ChangeRecord>> {
        let mut records = self.store.find_by_object_id(object_id)?;
        if prepare {
            let failure = records
                .iter_mut()
                .enumerate()
                .find_map(|(i, record)| self.registry.prepare(record).err().map(|e| (i, e)));
            if let Some((failed_at, e)) = failure {
                return Err(LoggableError::PartialDecode {
                    records,
                    failed_at,
                    source: Box::new(e),
                });
            }
        }
        Ok(records)
    }

    /// The most recently created record of `object_id`.
    pub fn latest_record(&self, object_id: &str, prepare: bool) -> LoggableResult<ChangeRecord> {
        let mut record = self
            .store
            .find_latest_by_object_id(object_id)?
            .ok_or_else(|| LoggableError::NotFound(object_id.to_string()))?;
        if prepare {
            self.registry.prepare(&mut record)?;
        }
        Ok(record)
    }
}

/// Recorder handle that stamps a fixed `created_by` on every record.
pub struct AttributedRecorder<'a, S> {
    recorder: &'a ChangeRecorder<S>,
    user: String,
}

impl<S: RecordStore> AttributedRecorder<'_, S> {
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn record_on_create<E: Loggable>(&self, entity: &E) -> LoggableResult<Option<ChangeRecord>> {
        self.recorder.record_simple(Action::Create, entity, &self.user)
    }

    pub fn record_on_update<E: Loggable>(&self, entity: &E) -> LoggableResult<Option<ChangeRecord>> {
        self.recorder.record_update(entity, &self.user)
    }

    pub fn record_on_delete<E: Loggable>(&self, entity: &E) -> LoggableResult<Option<ChangeRecord>> {
        self.recorder.record_simple(Action::Delete, entity, &self.user)
    }
}

/// Builds a [`ChangeRecorder`]. Everything set here is fixed afterwards.
pub struct ChangeRecorderBuilder<S> {
    store: S,
    cache: Option<Arc<IdentityCache>>,
    registry: TypeRegistry,
    config: RecorderConfig,
}

impl<S: RecordStore> ChangeRecorderBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: None,
            registry: TypeRegistry::new(),
            config: RecorderConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: RecorderConfig) -> Self {
        self.config = config;
        self
    }

    /// Enables lazy-update suppression, ignoring `excluded_fields`.
    pub fn lazy_update<I, F>(mut self, excluded_fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.config.lazy_update = Some(LazyUpdateConfig::new(excluded_fields));
        self
    }

    pub fn compute_diff(mut self, enabled: bool) -> Self {
        self.config.compute_diff = enabled;
        self
    }

    pub fn default_author(mut self, author: impl Into<String>) -> Self {
        self.config.default_author = author.into();
        self
    }

    /// Shares an existing cache instead of creating a private one.
    pub fn cache(mut self, cache: Arc<IdentityCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Registers `T` as the object shape for `object_type`.
    pub fn register_object<T>(mut self, object_type: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.registry.register_object::<T>(object_type);
        self
    }

    /// Registers `T` as the meta shape for `object_type`.
    pub fn register_meta<T>(mut self, object_type: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.registry.register_meta::<T>(object_type);
        self
    }

    /// Registers a loggable entity under its own type name, along with its meta.
    pub fn register<T>(self) -> Self
    where
        T: Loggable + DeserializeOwned + Send + Sync + 'static,
        T::Meta: DeserializeOwned + Send + Sync + 'static,
    {
        self.register_object::<T>(T::OBJECT_TYPE)
            .register_meta::<T::Meta>(T::OBJECT_TYPE)
    }

    pub fn build(self) -> ChangeRecorder<S> {
        let lazy_excluded = self.config.lazy_update.as_ref().map(LazyUpdateConfig::normalized);
        ChangeRecorder {
            store: self.store,
            cache: self.cache.unwrap_or_default(),
            registry: self.registry,
            config: self.config,
            lazy_excluded,
        }
    }
}
