use loggable_types::{Action, ChangeRecord, RawJson};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

fn make_record() -> ChangeRecord {
    ChangeRecord::new(
        Action::Update,
        "42",
        "Order",
        RawJson::from(r#"{"id":"42","status":"shipped"}"#),
    )
}

// ── Action ───────────────────────────────────────────────────────

#[test]
fn action_names() {
    assert_eq!(Action::Create.to_string(), "create");
    assert_eq!(Action::Update.to_string(), "update");
    assert_eq!(Action::Delete.to_string(), "delete");
}

#[test]
fn action_parse() {
    assert_eq!(Action::from_str("update").unwrap(), Action::Update);
    assert!(Action::from_str("read").is_err());
    assert!(Action::from_str("Update").is_err());
}

#[test]
fn action_serde_is_lowercase() {
    assert_eq!(serde_json::to_string(&Action::Delete).unwrap(), "\"delete\"");
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn new_record_has_null_meta_and_diff() {
    let record = make_record();
    assert!(record.raw_meta.is_null());
    assert!(record.raw_diff.is_null());
    assert_eq!(record.created_by, "");
    assert!(!record.has_object());
    assert!(!record.has_meta());
}

#[test]
fn new_records_get_distinct_ids() {
    assert_ne!(make_record().id, make_record().id);
}

#[test]
fn builder_setters() {
    let record = make_record()
        .with_meta(RawJson::from(r#"{"by":"ops"}"#))
        .with_diff(RawJson::from(r#"{"status":"shipped"}"#))
        .with_created_by("alice");
    assert_eq!(record.raw_meta.as_bytes(), br#"{"by":"ops"}"#);
    assert_eq!(record.created_by, "alice");
}

#[test]
fn diff_decodes_mapping() {
    let record = make_record().with_diff(RawJson::from(r#"{"status":"shipped"}"#));
    let diff = record.diff().unwrap().unwrap();
    assert_eq!(diff.get("status"), Some(&json!("shipped")));
}

#[test]
fn diff_is_none_without_raw_diff() {
    assert!(make_record().diff().unwrap().is_none());
}

// ── Transient fields ─────────────────────────────────────────────

#[test]
fn attached_object_downcasts_to_registered_type() {
    let mut record = make_record();
    record.attach_object(Arc::new(String::from("decoded")));
    assert_eq!(record.object::<String>().map(String::as_str), Some("decoded"));
    assert!(record.object::<u32>().is_none());
}

#[test]
fn transient_fields_do_not_affect_equality() {
    let record = make_record();
    let mut prepared = record.clone();
    prepared.attach_meta(Arc::new(5u8));
    assert_eq!(record, prepared);
}

#[test]
fn transient_fields_are_not_serialized() {
    let mut record = make_record();
    record.attach_object(Arc::new(1u8));
    let value = serde_json::to_value(&record).unwrap();
    assert!(value.get("object").is_none());
    assert!(value.get("meta").is_none());
    assert_eq!(value["raw_object"], json!({"id": "42", "status": "shipped"}));
    assert_eq!(value["raw_meta"], json!(null));
}

#[test]
fn record_json_roundtrip_preserves_raw_bytes() {
    let record = make_record().with_created_by("svc");
    let json = serde_json::to_string(&record).unwrap();
    let back: ChangeRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, record.id);
    assert_eq!(back.created_at, record.created_at);
    assert_eq!(back.created_by, "svc");
    assert_eq!(back.raw_object.as_bytes(), record.raw_object.as_bytes());
    // A null column comes back as the literal it was encoded to.
    assert!(back.raw_meta.is_null());
    assert!(back.raw_diff.is_null());
}
