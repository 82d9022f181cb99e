//! Change-tracking engine for Loggable.
//!
//! Observes entity lifecycle events and turns them into immutable
//! [`ChangeRecord`]s:
//! - [`Loggable`] / [`LoggableModel`]: the capability an entity opts into
//! - [`IdentityCache`]: last observed snapshot per (type, primary key)
//! - [`compute_diff`]: new values of the diffable fields that changed
//! - [`ChangeRecorder`]: create/update/delete/read handling, lazy-update
//!   suppression and typed read-back through the [`TypeRegistry`]
//!
//! The host wires its own hooks to the recorder and supplies a
//! [`RecordStore`]; the recorder never decides on its own what is tracked.
//!
//! # Example
//!
//! ```
//! use loggable_core::{ChangeRecorder, Loggable, LoggableModel};
//! use loggable_storage::MemoryRecordStore;
//! use loggable_types::PrimaryKey;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Order {
//!     id: String,
//!     status: String,
//!     #[serde(skip)]
//!     loggable: LoggableModel,
//! }
//!
//! impl Loggable for Order {
//!     const OBJECT_TYPE: &'static str = "Order";
//!     const DIFFABLE_FIELDS: &'static [&'static str] = &["status"];
//!     type Meta = ();
//!
//!     fn primary_key(&self) -> PrimaryKey {
//!         self.id.as_str().into()
//!     }
//!     fn loggable(&self) -> &LoggableModel {
//!         &self.loggable
//!     }
//!     fn loggable_mut(&mut self) -> &mut LoggableModel {
//!         &mut self.loggable
//!     }
//! }
//!
//! let recorder = ChangeRecorder::builder(MemoryRecordStore::new())
//!     .compute_diff(true)
//!     .build();
//!
//! let mut order = Order { id: "42".into(), status: "new".into(), loggable: LoggableModel::new() };
//! recorder.track_snapshot(&order).unwrap();
//!
//! order.status = "shipped".into();
//! let record = recorder.record_on_update(&order).unwrap().unwrap();
//! assert_eq!(record.raw_diff.as_bytes(), br#"{"status":"shipped"}"#);
//! ```

mod compare;
mod config;
mod diff;
mod error;
mod identity;
mod loggable;
mod recorder;
mod registry;

pub use compare::{is_equal, to_snake_case, FieldMap};
pub use config::{LazyUpdateConfig, RecorderConfig};
pub use diff::{compute_diff, Diff};
pub use error::{LoggableError, LoggableResult};
pub use identity::{IdentityCache, IdentityKey};
pub use loggable::{Loggable, LoggableModel};
pub use recorder::{AttributedRecorder, ChangeRecorder, ChangeRecorderBuilder};
pub use registry::TypeRegistry;

pub use loggable_storage::{RecordStore, StorageError};
pub use loggable_types::{Action, ChangeId, ChangeRecord, PrimaryKey, RawJson};
