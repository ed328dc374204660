//! TOML adapter tests.

use configforge_core::format::toml::Toml;
use configforge_core::{Format, FormatAdapter, Path, SerializeOptions, Value};

fn parse(input: &str) -> Value {
    Toml.parse(input).unwrap()
}

fn write(v: &Value) -> String {
    Toml.serialize(v, &SerializeOptions::default()).unwrap()
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn scalar_types() {
    let v = parse("name = \"api\"\nport = 8080\nratio = 0.5\ndebug = false\n");
    assert_eq!(v.get("name"), Some(&Value::from("api")));
    assert_eq!(v.get("port"), Some(&Value::Int(8080)));
    assert_eq!(v.get("ratio"), Some(&Value::Float(0.5)));
    assert_eq!(v.get("debug"), Some(&Value::Bool(false)));
}

#[test]
fn tables_and_arrays_of_tables() {
    let v = parse("[server]\nhost = \"h\"\n\n[[users]]\nname = \"a\"\n\n[[users]]\nname = \"b\"\n");
    assert_eq!(
        v.get("server").and_then(|s| s.get("host")),
        Some(&Value::from("h"))
    );
    let users = v.get("users").and_then(Value::as_array).unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].get("name"), Some(&Value::from("b")));
}

#[test]
fn dotted_keys_build_nested_tables() {
    let v = parse("a.b.c = 1\n");
    let path = Path::from_iter(["a", "b", "c"]);
    assert_eq!(v.pointer(&path), Some(&Value::Int(1)));
}

#[test]
fn datetimes_are_read_as_strings() {
    let v = parse("when = 1979-05-27T07:32:00Z\nday = 1979-05-27\n");
    assert_eq!(v.get("when"), Some(&Value::from("1979-05-27T07:32:00Z")));
    assert_eq!(v.get("day"), Some(&Value::from("1979-05-27")));
}

#[test]
fn empty_document_is_empty_table() {
    assert_eq!(parse(""), Value::table());
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = Toml.parse("a = 1\na = 2\n").unwrap_err();
    assert_eq!(err.format, Format::Toml);
    assert!(err.message.contains("duplicate"), "{err}");
    assert_eq!(err.position.map(|p| p.line), Some(2));
}

#[test]
fn syntax_error_reports_position() {
    let err = Toml.parse("ok = 1\nbroken = \n").unwrap_err();
    assert_eq!(err.position.map(|p| p.line), Some(2));
}

// ============================================================================
// Serializing
// ============================================================================

#[test]
fn flat_table_output() {
    let v = Value::from_iter([("name", Value::from("api")), ("port", Value::Int(8080))]);
    assert_eq!(write(&v), "name = \"api\"\nport = 8080\n");
}

#[test]
fn scalars_are_written_before_sub_tables() {
    let v = Value::from_iter([
        ("server", Value::from_iter([("port", Value::Int(1))])),
        ("name", Value::from("x")),
    ]);
    let out = write(&v);
    let name_at = out.find("name = ").unwrap();
    let server_at = out.find("[server]").unwrap();
    assert!(name_at < server_at, "{out}");
    assert_eq!(Toml.parse(&out).unwrap(), v);
}

#[test]
fn null_fails_with_its_path() {
    let v = Value::from_iter([("a", Value::from_iter([("b", Value::Null)]))]);
    let err = Toml.serialize(&v, &SerializeOptions::default()).unwrap_err();
    assert_eq!(err.format, Format::Toml);
    assert_eq!(err.path, Path::from_iter(["a", "b"]));
    assert!(err.message.contains("null"));
}

#[test]
fn null_inside_array_reports_index() {
    let v = Value::from_iter([("xs", Value::from_iter([Value::Int(1), Value::Null]))]);
    let err = Toml.serialize(&v, &SerializeOptions::default()).unwrap_err();
    assert_eq!(err.path, Path::from_iter(["xs"]).join_index(1));
}

#[test]
fn array_root_cannot_be_written() {
    let err = Toml
        .serialize(&Value::array(), &SerializeOptions::default())
        .unwrap_err();
    assert!(err.path.is_root());
}

#[test]
fn compact_and_pretty_read_back_equal() {
    let v = Value::from_iter([
        ("list", Value::from_iter([Value::Int(1), Value::Int(2), Value::Int(3)])),
        ("nested", Value::from_iter([("f", Value::Float(1.0))])),
    ]);
    let pretty = Toml.serialize(&v, &SerializeOptions::pretty()).unwrap();
    let compact = Toml.serialize(&v, &SerializeOptions::compact()).unwrap();
    assert_eq!(Toml.parse(&pretty).unwrap(), v);
    assert_eq!(Toml.parse(&compact).unwrap(), v);
}
