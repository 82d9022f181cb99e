use loggable_types::{ChangeId, PrimaryKey};
use std::collections::HashSet;
use std::str::FromStr;

// ── ChangeId ─────────────────────────────────────────────────────

#[test]
fn change_id_new_is_unique() {
    assert_ne!(ChangeId::new(), ChangeId::new());
}

#[test]
fn change_id_display_and_parse() {
    let id = ChangeId::new();
    let parsed = ChangeId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn change_id_from_str() {
    let id = ChangeId::new();
    assert_eq!(ChangeId::from_str(&id.to_string()).unwrap(), id);
}

#[test]
fn change_id_parse_invalid() {
    assert!(ChangeId::parse("not-a-uuid").is_err());
}

#[test]
fn change_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    assert_eq!(ChangeId::from_uuid(uuid).as_uuid(), uuid);
}

#[test]
fn change_id_hash_and_eq() {
    let id = ChangeId::new();
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id);
    assert_eq!(set.len(), 1);
}

#[test]
fn change_id_serializes_as_plain_string() {
    let id = ChangeId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
}

// ── PrimaryKey ───────────────────────────────────────────────────

#[test]
fn numeric_keys_render_in_decimal() {
    assert_eq!(PrimaryKey::from(42i64).to_string(), "42");
    assert_eq!(PrimaryKey::from(-7i32).to_string(), "-7");
    assert_eq!(PrimaryKey::from(u64::MAX).to_string(), "18446744073709551615");
}

#[test]
fn string_keys_render_verbatim() {
    assert_eq!(PrimaryKey::from("42").to_string(), "42");
    assert_eq!(PrimaryKey::from(String::from("a b")).to_string(), "a b");
}

#[test]
fn uuid_keys_render_hyphenated() {
    let uuid = uuid::Uuid::now_v7();
    assert_eq!(PrimaryKey::from(uuid).to_string(), uuid.to_string());
}

#[test]
fn composite_keys_render_as_json_array() {
    let key = PrimaryKey::composite([PrimaryKey::from(7i64), PrimaryKey::from("eu")]);
    assert_eq!(key.to_string(), r#"[7,"eu"]"#);
}

#[test]
fn composite_keys_are_unambiguous() {
    let a = PrimaryKey::composite(["a_b", "c"]);
    let b = PrimaryKey::composite(["a", "b_c"]);
    assert_ne!(a.to_string(), b.to_string());
}

#[test]
fn nested_composite_keys() {
    let key = PrimaryKey::composite([
        PrimaryKey::from(1u32),
        PrimaryKey::composite(["x", "y"]),
    ]);
    assert_eq!(key.to_string(), r#"[1,["x","y"]]"#);
}
