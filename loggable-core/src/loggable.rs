//! The tracked-entity capability.

use loggable_types::PrimaryKey;
use serde::{Deserialize, Serialize};

/// Tracking state embedded in every loggable entity.
///
/// The enabled flag lives only here, and [`Loggable`] can only be satisfied
/// by handing out a reference to one of these. Embed it in the entity and
/// usually mark the field `#[serde(skip)]` so toggling tracking does not show
/// up as a change to the entity.
///
/// The constructors are not `const`, so a model cannot live in a `static`
/// and be shared by every instance of a type:
///
/// ```compile_fail
/// use loggable_core::LoggableModel;
///
/// static SHARED: LoggableModel = LoggableModel::new();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggableModel {
    disabled: bool,
}

impl LoggableModel {
    /// Tracking enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { disabled: false }
    }

    /// Tracking disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self { disabled: true }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }
}

/// An entity whose lifecycle events produce change records.
///
/// ```
/// use loggable_core::{Loggable, LoggableModel};
/// use loggable_types::PrimaryKey;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Order {
///     id: String,
///     status: String,
///     #[serde(skip)]
///     loggable: LoggableModel,
/// }
///
/// impl Loggable for Order {
///     const OBJECT_TYPE: &'static str = "Order";
///     const DIFFABLE_FIELDS: &'static [&'static str] = &["status"];
///     type Meta = ();
///
///     fn primary_key(&self) -> PrimaryKey {
///         self.id.as_str().into()
///     }
///
///     fn loggable(&self) -> &LoggableModel {
///         &self.loggable
///     }
///
///     fn loggable_mut(&mut self) -> &mut LoggableModel {
///         &mut self.loggable
///     }
/// }
/// ```
pub trait Loggable: Serialize {
    /// Logical type name, stored as `object_type` and used for registry lookups.
    const OBJECT_TYPE: &'static str;

    /// Serialized names of the fields that participate in update diffs.
    /// Fields not listed are never diffed, even when they change.
    const DIFFABLE_FIELDS: &'static [&'static str] = &[];

    /// Metadata stored next to each record in `raw_meta`.
    type Meta: Serialize;

    fn primary_key(&self) -> PrimaryKey;

    fn loggable(&self) -> &LoggableModel;

    fn loggable_mut(&mut self) -> &mut LoggableModel;

    /// Metadata for the next record. `None` leaves `raw_meta` null.
    fn meta(&self) -> Option<Self::Meta> {
        None
    }

    fn is_enabled(&self) -> bool {
        self.loggable().is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.loggable_mut().set_enabled(enabled);
    }
}
