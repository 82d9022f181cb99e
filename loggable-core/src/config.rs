//! Setup-time recorder configuration.

use crate::compare::to_snake_case;
use serde::{Deserialize, Serialize};

/// Recorder options, fixed once the recorder is built.
///
/// Deserializable so hosts can keep it next to the rest of their settings:
///
/// ```
/// use loggable_core::RecorderConfig;
///
/// let config: RecorderConfig = serde_json::from_str(
///     r#"{"compute_diff": true, "lazy_update": {"excluded_fields": ["updated_at"]}}"#,
/// ).unwrap();
/// assert!(config.compute_diff);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Skip update records that change nothing outside the excluded fields.
    pub lazy_update: Option<LazyUpdateConfig>,
    /// Attach a diff of the diffable fields to update records.
    pub compute_diff: bool,
    /// `created_by` for records written without an explicit user.
    pub default_author: String,
}

/// Lazy-update suppression settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyUpdateConfig {
    /// Fields ignored when comparing against the latest record, e.g. `updated_at`.
    pub excluded_fields: Vec<String>,
}

impl LazyUpdateConfig {
    pub fn new<I, F>(excluded_fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            excluded_fields: excluded_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Excluded field names in the snake_case form used for comparison.
    pub(crate) fn normalized(&self) -> Vec<String> {
        self.excluded_fields
            .iter()
            .map(|f| to_snake_case(f))
            .collect()
    }
}
