//! Loading schemas from documents.

use configforge_core::{Bound, Document, Format, Path, Schema, SchemaError, SchemaType, Value};

fn load(yaml: &str) -> Result<Schema, SchemaError> {
    let doc = Document::parse(yaml, Format::Yaml).unwrap();
    Schema::from_value(doc.value())
}

fn load_err(yaml: &str) -> SchemaError {
    load(yaml).unwrap_err()
}

// ============================================================================
// Keywords
// ============================================================================

#[test]
fn type_keyword_forms() {
    let s = load("type: integer\n").unwrap();
    assert_eq!(s.types(), [SchemaType::Int]);

    let s = load("type: number\n").unwrap();
    assert_eq!(s.types(), [SchemaType::Int, SchemaType::Float]);

    let s = load("type: [string, \"null\"]\n").unwrap();
    assert_eq!(s.types(), [SchemaType::String, SchemaType::Null]);

    let s = load("type: table\n").unwrap();
    assert_eq!(s.types(), [SchemaType::Object]);
}

#[test]
fn missing_type_accepts_anything() {
    let s = load("{}\n").unwrap();
    assert_eq!(s.types(), [SchemaType::Any]);
}

#[test]
fn repeated_types_are_collapsed() {
    let s = load("type: [int, number, integer]\n").unwrap();
    assert_eq!(s.types(), [SchemaType::Int, SchemaType::Float]);
}

#[test]
fn object_keywords() {
    let s = load(
        "type: object\n\
         required: [host, port]\n\
         additionalProperties: false\n\
         properties:\n  \
           host: {type: string}\n  \
           port: {type: integer, minimum: 1, maximum: 65535}\n",
    )
    .unwrap();
    assert_eq!(s.required_keys(), ["host", "port"]);
    assert_eq!(
        s.property_schema("port").map(Schema::types),
        Some(&[SchemaType::Int][..])
    );
    assert!(s.property_schema("other").is_none());
}

#[test]
fn annotations_are_ignored() {
    let s = load(
        "$schema: x\ntitle: App\ndescription: d\ndefault: {}\nexamples: []\ntype: object\n",
    );
    assert!(s.is_ok());
}

#[test]
fn schema_can_be_written_in_json() {
    let doc = Document::parse(
        r#"{"type": "array", "items": {"enum": ["a", "b"]}, "minItems": 1}"#,
        Format::Json,
    )
    .unwrap();
    let s = Schema::from_value(doc.value()).unwrap();
    assert_eq!(s.types(), [SchemaType::Array]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unknown_keyword_is_reported_with_path() {
    let err = load_err("properties:\n  port:\n    minimun: 1\n");
    assert_eq!(err.path, Path::from_iter(["properties", "port", "minimun"]));
    assert!(err.message.contains("unknown schema keyword `minimun`"), "{err}");
}

#[test]
fn unknown_type_name() {
    let err = load_err("type: integr\n");
    assert_eq!(err.path, Path::from_iter(["type"]));
    assert!(err.message.contains("integr"));
}

#[test]
fn node_must_be_a_table() {
    let err = load_err("properties:\n  port: 5\n");
    assert_eq!(err.path, Path::from_iter(["properties", "port"]));
}

#[test]
fn malformed_keyword_arguments() {
    let cases = [
        "required: port\n",
        "required: [1]\n",
        "additionalProperties: nope\n",
        "minItems: -1\n",
        "maxItems: 1.5\n",
        "minimum: abc\n",
        "pattern: 5\n",
        "pattern: \"([\"\n",
        "enum: a\n",
        "type: []\n",
        "properties: []\n",
    ];
    for case in cases {
        assert!(load(case).is_err(), "{case:?} should be rejected");
    }
}

#[test]
fn inverted_bounds_are_rejected() {
    assert!(load_err("minimum: 10\nmaximum: 1\n")
        .message
        .contains("greater than"));
    assert!(load_err("minItems: 3\nmaxItems: 2\n")
        .message
        .contains("greater than"));
}

#[test]
fn root_must_be_a_table() {
    let err = Schema::from_value(&Value::from_iter([Value::Int(1)])).unwrap_err();
    assert!(err.path.is_root());
}

// ============================================================================
// Builders
// ============================================================================

#[test]
fn builder_matches_loaded_schema_shape() {
    let built = Schema::object()
        .require("port")
        .property(
            "port",
            Schema::of([SchemaType::Int]).range(Some(Bound::Int(1)), Some(Bound::Int(65535))),
        )
        .deny_additional();
    assert_eq!(built.required_keys(), ["port"]);
    assert_eq!(built.types(), [SchemaType::Object]);
    assert!(Schema::any().pattern("(").is_err());
    assert_eq!(Schema::default().types(), [SchemaType::Any]);
}
