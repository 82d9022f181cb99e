//! Field-level diffs between two entity states.

use serde_json::{Map, Value};

/// Changed field name → new value.
pub type Diff = Map<String, Value>;

/// Compares `before` and `after` on the given fields.
///
/// Returns `None` when there is no `before` state, which callers must keep
/// apart from `Some` of an empty map (a known prior state with nothing
/// changed). A field present on only one side counts as changed; a field
/// missing from `after` is reported as `null`. Only new values are kept.
#[must_use]
pub fn compute_diff(before: Option<&Value>, after: &Value, diffable_fields: &[&str]) -> Option<Diff> {
    let before = before?;
    let mut diff = Diff::new();
    for &field in diffable_fields {
        let old = before.get(field);
        let new = after.get(field);
        if old != new {
            diff.insert(field.to_string(), new.cloned().unwrap_or(Value::Null));
        }
    }
    Some(diff)
}
