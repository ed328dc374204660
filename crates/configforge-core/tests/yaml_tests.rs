//! YAML adapter tests.

use configforge_core::format::yaml::Yaml;
use configforge_core::{Format, FormatAdapter, SerializeOptions, Value};

fn parse(input: &str) -> Value {
    Yaml.parse(input).unwrap()
}

fn roundtrip(v: &Value) -> Value {
    let text = Yaml.serialize(v, &SerializeOptions::default()).unwrap();
    Yaml.parse(&text).unwrap()
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn implicit_scalar_typing() {
    let v = parse("a: 1\nb: 1.5\nc: true\nd: ~\ne: \"123\"\nf: hello\n");
    assert_eq!(v.get("a"), Some(&Value::Int(1)));
    assert_eq!(v.get("b"), Some(&Value::Float(1.5)));
    assert_eq!(v.get("c"), Some(&Value::Bool(true)));
    assert_eq!(v.get("d"), Some(&Value::Null));
    assert_eq!(v.get("e"), Some(&Value::from("123")));
    assert_eq!(v.get("f"), Some(&Value::from("hello")));
}

#[test]
fn nested_block_structure() {
    let v = parse("server:\n  host: localhost\n  ports:\n    - 80\n    - 443\n");
    let server = v.get("server").unwrap();
    assert_eq!(server.get("host"), Some(&Value::from("localhost")));
    assert_eq!(
        server.get("ports"),
        Some(&Value::from_iter([Value::Int(80), Value::Int(443)]))
    );
}

#[test]
fn empty_document_is_empty_table() {
    assert_eq!(parse(""), Value::table());
    assert_eq!(parse("# only a comment\n"), Value::table());
    assert_eq!(parse("---\n"), Value::table());
}

#[test]
fn sequence_root_is_accepted() {
    assert_eq!(parse("- a\n- b\n"), Value::from_iter([Value::from("a"), Value::from("b")]));
}

#[test]
fn scalar_root_is_rejected() {
    let err = Yaml.parse("just a string\n").unwrap_err();
    assert_eq!(err.format, Format::Yaml);
}

#[test]
fn aliases_resolve_to_anchored_value() {
    let v = parse("base: &b\n  x: 1\nother: *b\n");
    assert_eq!(v.get("other"), v.get("base"));
    assert_eq!(v.get("other").and_then(|o| o.get("x")), Some(&Value::Int(1)));
}

#[test]
fn non_string_keys_keep_their_text() {
    let v = parse("1: one\ntrue: yes\n");
    assert_eq!(v.get("1"), Some(&Value::from("one")));
    assert!(v.get("true").is_some());
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = Yaml.parse("a: 1\nb: 2\na: 3\n").unwrap_err();
    assert!(err.message.contains("duplicate key"), "{err}");
}

#[test]
fn syntax_error_reports_position() {
    let err = Yaml.parse("a: b: c\n").unwrap_err();
    let position = err.position.expect("position");
    assert_eq!(position.line, 1);
}

// ============================================================================
// Serializing
// ============================================================================

#[test]
fn nested_mapping_output() {
    let v = Value::from_iter([(
        "server",
        Value::from_iter([("host", Value::from("localhost")), ("port", Value::Int(8080))]),
    )]);
    let out = Yaml.serialize(&v, &SerializeOptions::default()).unwrap();
    assert_eq!(out, "server:\n  host: localhost\n  port: 8080\n");
}

#[test]
fn strings_that_look_like_scalars_stay_strings() {
    let v = Value::from_iter([
        ("a", Value::from("true")),
        ("b", Value::from("123")),
        ("c", Value::from("1.5")),
        ("d", Value::from("~")),
        ("e", Value::from("")),
    ]);
    assert_eq!(roundtrip(&v), v);
}

#[test]
fn every_kind_roundtrips() {
    let v = Value::from_iter([
        ("null", Value::Null),
        ("bool", Value::Bool(false)),
        ("int", Value::Int(-42)),
        ("float", Value::Float(2.0)),
        ("string", Value::from("multi\nline")),
        ("array", Value::from_iter([Value::Int(1), Value::array(), Value::table()])),
        ("table", Value::from_iter([("k", Value::from("v"))])),
    ]);
    assert_eq!(roundtrip(&v), v);
}

#[test]
fn options_do_not_change_output() {
    let v = Value::from_iter([("a", Value::from_iter([("b", Value::Int(1))]))]);
    let pretty = Yaml.serialize(&v, &SerializeOptions::default()).unwrap();
    let compact = Yaml.serialize(&v, &SerializeOptions::compact().with_indent(8)).unwrap();
    assert_eq!(pretty, compact);
}

#[test]
fn scalar_root_cannot_be_written() {
    assert!(Yaml
        .serialize(&Value::from("x"), &SerializeOptions::default())
        .is_err());
}
