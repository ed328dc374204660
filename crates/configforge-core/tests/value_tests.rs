//! Tests for the value model and paths.

use configforge_core::{Path, PathSegment, Table, Value, ValueKind};

fn sample() -> Value {
    Value::from_iter([
        (
            "server",
            Value::from_iter([("host", Value::from("localhost")), ("port", Value::from(8080))]),
        ),
        (
            "hosts",
            Value::from_iter([Value::from("a"), Value::from("b"), Value::from("c")]),
        ),
    ])
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn int_and_float_are_never_equal() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::Int(0), Value::Float(0.0));
}

#[test]
fn table_equality_ignores_key_order() {
    let a = Value::from_iter([("x", Value::Int(1)), ("y", Value::Int(2))]);
    let b = Value::from_iter([("y", Value::Int(2)), ("x", Value::Int(1))]);
    assert_eq!(a, b);
}

#[test]
fn array_equality_is_positional() {
    let a = Value::from_iter([Value::Int(1), Value::Int(2)]);
    let b = Value::from_iter([Value::Int(2), Value::Int(1)]);
    assert_ne!(a, b);
}

#[test]
fn nan_is_not_equal_to_itself() {
    assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
}

// ============================================================================
// Accessors
// ============================================================================

#[test]
fn kind_names() {
    let names: Vec<&str> = [
        Value::Null,
        Value::Bool(true),
        Value::Int(1),
        Value::Float(1.5),
        Value::from("s"),
        Value::array(),
        Value::table(),
    ]
    .iter()
    .map(|v| v.kind().as_str())
    .collect();
    assert_eq!(
        names,
        ["null", "bool", "int", "float", "string", "array", "table"]
    );
    assert_eq!(ValueKind::Table.to_string(), "table");
}

#[test]
fn typed_accessors_match_only_their_variant() {
    assert_eq!(Value::Bool(true).as_bool(), Some(true));
    assert_eq!(Value::Int(3).as_int(), Some(3));
    assert_eq!(Value::Int(3).as_float(), None);
    assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
    assert_eq!(Value::from("x").as_str(), Some("x"));
    assert_eq!(Value::Null.as_str(), None);
    assert!(Value::Null.is_null());
    assert!(Value::Int(1).is_scalar());
    assert!(!Value::array().is_scalar());
    assert!(!Value::table().is_scalar());
}

#[test]
fn get_looks_up_table_keys_only() {
    let v = sample();
    assert!(v.get("server").is_some());
    assert_eq!(v.get("missing"), None);
    assert_eq!(Value::Int(1).get("server"), None);
}

#[test]
fn pointer_follows_keys_and_indices() {
    let v = sample();
    let mut path = Path::root();
    path.push_key("hosts");
    path.push_index(1);
    assert_eq!(v.pointer(&path), Some(&Value::from("b")));

    let port = Path::from_iter(["server", "port"]);
    assert_eq!(v.pointer(&port), Some(&Value::Int(8080)));

    assert_eq!(v.pointer(&Path::root()), Some(&v));
}

#[test]
fn pointer_rejects_mismatched_steps() {
    let v = sample();
    // Index into a table.
    assert_eq!(v.pointer(&Path::root().join_index(0)), None);
    // Key into an array.
    assert_eq!(v.pointer(&Path::from_iter(["hosts", "0"])), None);
    // Out of bounds.
    assert_eq!(v.pointer(&Path::from_iter(["hosts"]).join_index(9)), None);
}

#[test]
fn table_preserves_insertion_order() {
    let mut table = Table::new();
    for key in ["zeta", "alpha", "mid"] {
        table.insert(key.to_string(), Value::Null);
    }
    let keys: Vec<&str> = table.keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

// ============================================================================
// Display
// ============================================================================

#[test]
fn display_is_compact_json_like() {
    let v = Value::from_iter([
        ("a", Value::from_iter([Value::Int(1), Value::Float(2.0), Value::from("x")])),
        ("b", Value::Null),
    ]);
    assert_eq!(v.to_string(), r#"{"a": [1, 2.0, "x"], "b": null}"#);
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn root_path_displays_as_dollar() {
    assert_eq!(Path::root().to_string(), "$");
    assert!(Path::root().is_root());
}

#[test]
fn path_display_mixes_keys_and_indices() {
    let path = Path::from_iter(["servers"]).join_index(2).join_key("port");
    assert_eq!(path.to_string(), "$.servers[2].port");
}

#[test]
fn unusual_keys_are_quoted() {
    let path = Path::root().join_key("key with spaces").join_key("1st");
    assert_eq!(path.to_string(), r#"$["key with spaces"]["1st"]"#);
}

#[test]
fn push_and_pop_are_symmetric() {
    let mut path = Path::root();
    path.push_key("a");
    path.push_index(0);
    assert_eq!(path.pop(), Some(PathSegment::Index(0)));
    assert_eq!(path.pop(), Some(PathSegment::Key("a".to_string())));
    assert_eq!(path.pop(), None);
    assert!(path.is_root());
}
