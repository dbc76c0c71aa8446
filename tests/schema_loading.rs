//! Schema Loading Tests
//!
//! The declarative grammar end to end: literal → tree → dump, ordering,
//! atomicity of `load`, and schema files on disk.

use std::fs;

use fieldtree::model::{FieldGroup, ModelError, Validator};
use fieldtree::schema::{FieldSpec, Schema, SchemaEntry};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Grammar
// =============================================================================

#[test]
fn test_load_builds_fields_and_nested_groups() {
    let group = FieldGroup::new();
    group
        .load_value(&json!({
            "domain": ["example.org", "^[a-z0-9.-]+$"],
            "enabled": [true, {"type": "bool"}],
            "db": {
                "name": ["main", "^[a-z0-9_]+$", "bad name"],
                "port": [5432, {"type": "int"}],
            },
        }))
        .unwrap();

    assert_eq!(group.keys(), vec!["domain", "enabled", "db"]);

    let db = group.attribute("db").unwrap();
    let db = db.as_group().unwrap();
    assert_eq!(db.name(), Some("db"));
    assert_eq!(db.keys(), vec!["name", "port"]);

    let port = db.attribute("port").unwrap();
    assert_eq!(port.as_field().unwrap().value(), json!(5432));
}

#[test]
fn test_loaded_validators_are_live() {
    let group = FieldGroup::new();
    group
        .load_value(&json!({"port": [0, {"type": "int"}]}))
        .unwrap();

    let port = group.attribute("port").unwrap();
    let port = port.as_field().unwrap();
    assert!(port.set_value(json!("high")).is_err());
    assert!(port.set_value(json!(8080)).is_ok());
}

#[test]
fn test_load_rejects_unsupported_entry_shape() {
    let group = FieldGroup::new();
    let err = group
        .load_value(&json!({"ok": [1], "broken": true}))
        .unwrap_err();
    match err {
        ModelError::Schema { key, .. } => assert_eq!(key, "broken"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

// =============================================================================
// Atomicity
// =============================================================================

#[test]
fn test_failed_load_preserves_prior_children_and_wiring() {
    let group = FieldGroup::new();
    group
        .load_value(&json!({"kept": ["original"]}))
        .unwrap();
    group.clear_modified(true);

    let err = group.load_value(&json!({
        "first": [1],
        "second": "not a field spec",
    }));
    assert!(err.is_err());

    // Prior state fully preserved: children, values, and bubbling.
    assert_eq!(group.keys(), vec!["kept"]);
    let kept = group.attribute("kept").unwrap();
    assert_eq!(kept.as_field().unwrap().value(), json!("original"));

    kept.as_field().unwrap().set_value(json!("touched")).unwrap();
    assert!(group.is_modified());
}

#[test]
fn test_successful_load_replaces_children_and_detaches_old_tree() {
    let group = FieldGroup::new();
    group.load_value(&json!({"old": [1]})).unwrap();
    let old = group.attribute("old").unwrap();

    group.load_value(&json!({"new": [2]})).unwrap();
    group.clear_modified(false);

    assert_eq!(group.keys(), vec!["new"]);
    // The replaced leaf no longer reaches the group.
    old.as_field().unwrap().set_value(json!(9)).unwrap();
    assert!(!group.is_modified());
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_dump_round_trips_values_in_order() {
    let literal = json!({
        "domain": ["example.org", "^[a-z0-9.-]+$"],
        "enabled": [true, {"type": "bool"}],
        "db": {
            "name": ["main", "^[a-z0-9_]+$", "bad name"],
            "port": [5432],
        },
    });

    let group = FieldGroup::new();
    group.load_value(&literal).unwrap();

    let dumped = group.dump();
    assert_eq!(
        dumped,
        json!({
            "domain": "example.org",
            "enabled": true,
            "db": {"name": "main", "port": 5432},
        })
    );

    let keys: Vec<&String> = dumped.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["domain", "enabled", "db"]);
}

#[test]
fn test_dump_reflects_later_writes() {
    let group = FieldGroup::new();
    group.load_value(&json!({"db": {"name": ["main"]}})).unwrap();

    group
        .attribute("db")
        .unwrap()
        .as_group()
        .unwrap()
        .attribute("name")
        .unwrap()
        .as_field()
        .unwrap()
        .set_value(json!("renamed"))
        .unwrap();

    assert_eq!(group.dump(), json!({"db": {"name": "renamed"}}));
}

// =============================================================================
// Builder API
// =============================================================================

#[test]
fn test_programmatic_schema_with_predicate() {
    let schema = Schema::new()
        .field(
            "replicas",
            FieldSpec::new(json!(1)).validator(Validator::predicate(|v| {
                v.as_i64().is_some_and(|n| (1..=16).contains(&n))
            })),
        )
        .group(
            "db",
            Schema::new().field(
                "name",
                FieldSpec::new(json!(""))
                    .validator(Validator::pattern("^[a-z0-9_]+$"))
                    .error_message("bad name"),
            ),
        );

    let group = FieldGroup::new();
    group.load(&schema);

    let replicas = group.attribute("replicas").unwrap();
    let replicas = replicas.as_field().unwrap();
    assert!(replicas.set_value(json!(4)).is_ok());
    assert!(replicas.set_value(json!(0)).is_err());

    match schema.get("db").unwrap() {
        SchemaEntry::Group(nested) => assert_eq!(nested.len(), 1),
        SchemaEntry::Field(_) => panic!("expected a group entry"),
    }
}

// =============================================================================
// Schema Files
// =============================================================================

#[test]
fn test_load_schema_from_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("website.json");
    fs::write(
        &path,
        r#"{
            "domain": ["", "^[a-z0-9.-]+$", "invalid domain"],
            "db": {"name": ["", "^[a-z0-9_]+$"]}
        }"#,
    )
    .unwrap();

    let schema = Schema::from_file(&path).unwrap();
    let group = FieldGroup::new();
    group.load(&schema);

    assert_eq!(group.keys(), vec!["domain", "db"]);
}

#[test]
fn test_missing_file_error_names_the_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("absent.json");

    let err = Schema::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_malformed_file_error_names_the_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.json");
    fs::write(&path, "{broken").unwrap();

    let err = Schema::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
    assert!(err.to_string().contains("invalid JSON"));
}
