//! Schema trees: the constraints a document is validated against.
//!
//! A schema mirrors the shape of the values it constrains. Each node has an
//! allowed-type set, object constraints (child schemas, required keys,
//! additional-key policy), array constraints (element schema, length bounds)
//! and scalar constraints (numeric range, string pattern, enum).
//!
//! Schemas are usually loaded from a document in any supported format, using
//! a subset of JSON Schema keywords:
//!
//! ```yaml
//! type: object
//! required: [port]
//! additionalProperties: false
//! properties:
//!   host: { type: string, pattern: "^[a-z.]+$" }
//!   port: { type: integer, minimum: 1, maximum: 65535 }
//!   tags: { type: array, items: { type: string }, maxItems: 8 }
//!   mode: { enum: [dev, prod] }
//! ```

use crate::error::SchemaError;
use crate::path::Path;
use crate::value::{Value, ValueKind};
use indexmap::IndexMap;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

/// One entry of a schema node's allowed-type set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
    Any,
}

impl SchemaType {
    /// Whether a value of `kind` satisfies this type.
    pub fn accepts(self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (SchemaType::Any, _)
                | (SchemaType::Null, ValueKind::Null)
                | (SchemaType::Bool, ValueKind::Bool)
                | (SchemaType::Int, ValueKind::Int)
                | (SchemaType::Float, ValueKind::Float)
                | (SchemaType::String, ValueKind::String)
                | (SchemaType::Array, ValueKind::Array)
                | (SchemaType::Object, ValueKind::Table)
        )
    }

    /// Resolve a `type` keyword. `number` expands to int and float.
    fn parse_keyword(name: &str) -> Option<&'static [SchemaType]> {
        Some(match name {
            "null" => &[SchemaType::Null],
            "bool" | "boolean" => &[SchemaType::Bool],
            "int" | "integer" => &[SchemaType::Int],
            "float" => &[SchemaType::Float],
            "number" => &[SchemaType::Int, SchemaType::Float],
            "string" => &[SchemaType::String],
            "array" => &[SchemaType::Array],
            "object" | "table" => &[SchemaType::Object],
            "any" => &[SchemaType::Any],
            _ => return None,
        })
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaType::Null => "null",
            SchemaType::Bool => "bool",
            SchemaType::Int => "int",
            SchemaType::Float => "float",
            SchemaType::String => "string",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Any => "any",
        })
    }
}

/// A `minimum`/`maximum` bound. Integer bounds compare exactly against
/// `Int` values of any magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Int(i64),
    Float(f64),
}

impl Bound {
    /// Where `value` lies relative to this bound. `None` for non-numbers and NaN.
    pub fn cmp_value(self, value: &Value) -> Option<Ordering> {
        match (value, self) {
            (Value::Int(i), Bound::Int(b)) => Some(i.cmp(&b)),
            (Value::Int(i), Bound::Float(b)) => cmp_int_float(*i, b),
            (Value::Float(x), Bound::Int(b)) => cmp_int_float(b, *x).map(Ordering::reverse),
            (Value::Float(x), Bound::Float(b)) => x.partial_cmp(&b),
            _ => None,
        }
    }

    fn to_value(self) -> Value {
        match self {
            Bound::Int(i) => Value::Int(i),
            Bound::Float(f) => Value::Float(f),
        }
    }
}

impl From<i64> for Bound {
    fn from(i: i64) -> Self {
        Bound::Int(i)
    }
}

impl From<i32> for Bound {
    fn from(i: i32) -> Self {
        Bound::Int(i64::from(i))
    }
}

impl From<f64> for Bound {
    fn from(f: f64) -> Self {
        Bound::Float(f)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(i) => write!(f, "{i}"),
            Bound::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Exact ordering of an integer against a float, without rounding the integer.
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63, the first float above i64::MAX.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return None;
    }
    if f >= LIMIT {
        return Some(Ordering::Less);
    }
    if f < -LIMIT {
        return Some(Ordering::Greater);
    }
    let floor = f.floor();
    // In range, and floats this large are already whole.
    let whole = floor as i64;
    match i.cmp(&whole) {
        Ordering::Equal if f > floor => Some(Ordering::Less),
        ord => Some(ord),
    }
}

/// A compiled string pattern, kept with its source text for error messages.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }
}

/// A schema node. Read-only once built; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) types: Vec<SchemaType>,
    pub(crate) properties: IndexMap<String, Schema>,
    pub(crate) required: Vec<String>,
    pub(crate) additional_properties: bool,
    pub(crate) items: Option<Box<Schema>>,
    pub(crate) min_items: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) minimum: Option<Bound>,
    pub(crate) maximum: Option<Bound>,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) allowed: Option<Vec<Value>>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::any()
    }
}

const ANNOTATIONS: &[&str] = &["$schema", "$id", "title", "description", "default", "examples"];

impl Schema {
    /// Accepts every value.
    pub fn any() -> Self {
        Self {
            types: vec![SchemaType::Any],
            properties: IndexMap::new(),
            required: Vec::new(),
            additional_properties: true,
            items: None,
            min_items: None,
            max_items: None,
            minimum: None,
            maximum: None,
            pattern: None,
            allowed: None,
        }
    }

    /// Accepts values whose variant is in `types`.
    pub fn of(types: impl IntoIterator<Item = SchemaType>) -> Self {
        Self {
            types: types.into_iter().collect(),
            ..Self::any()
        }
    }

    pub fn object() -> Self {
        Self::of([SchemaType::Object])
    }

    pub fn array_of(items: Schema) -> Self {
        Self::of([SchemaType::Array]).items(items)
    }

    pub fn property(mut self, key: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(key.into(), schema);
        self
    }

    pub fn require(mut self, key: impl Into<String>) -> Self {
        self.required.push(key.into());
        self
    }

    /// Reject keys without a child schema (enforced in strict validation only).
    pub fn deny_additional(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    pub fn items(mut self, items: Schema) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_items = min;
        self.max_items = max;
        self
    }

    pub fn range(mut self, minimum: Option<Bound>, maximum: Option<Bound>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn allowed_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.allowed = Some(values.into_iter().collect());
        self
    }

    pub fn types(&self) -> &[SchemaType] {
        &self.types
    }

    pub fn property_schema(&self, key: &str) -> Option<&Schema> {
        self.properties.get(key)
    }

    pub fn required_keys(&self) -> &[String] {
        &self.required
    }

    /// Load a schema from a parsed document.
    ///
    /// A node without `type` accepts any variant. Unknown keywords are an
    /// error; annotation keywords (`title`, `description`, ...) are ignored.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let mut path = Path::root();
        let schema = load_node(value, &mut path)?;
        tracing::debug!(
            properties = schema.properties.len(),
            required = schema.required.len(),
            "loaded schema"
        );
        Ok(schema)
    }
}

fn load_node(value: &Value, path: &mut Path) -> Result<Schema, SchemaError> {
    let Value::Table(node) = value else {
        return Err(SchemaError::new(
            path.clone(),
            format!("schema node must be a table, found {}", value.kind()),
        ));
    };
    let mut schema = Schema::any();

    for (keyword, arg) in node {
        path.push_key(keyword.as_str());
        match keyword.as_str() {
            "type" => schema.types = load_types(arg, path)?,
            "properties" => {
                let Value::Table(props) = arg else {
                    return Err(expected(path, "a table of schemas", arg));
                };
                for (key, child) in props {
                    path.push_key(key.as_str());
                    let child = load_node(child, path)?;
                    path.pop();
                    schema.properties.insert(key.clone(), child);
                }
            }
            "required" => {
                let Value::Array(keys) = arg else {
                    return Err(expected(path, "an array of key names", arg));
                };
                for key in keys {
                    let Value::String(key) = key else {
                        return Err(expected(path, "an array of key names", arg));
                    };
                    schema.required.push(key.clone());
                }
            }
            "additionalProperties" => {
                let Value::Bool(allow) = arg else {
                    return Err(expected(path, "a bool", arg));
                };
                schema.additional_properties = *allow;
            }
            "items" => schema.items = Some(Box::new(load_node(arg, path)?)),
            "minItems" => schema.min_items = Some(load_count(arg, path)?),
            "maxItems" => schema.max_items = Some(load_count(arg, path)?),
            "minimum" => schema.minimum = Some(load_number(arg, path)?),
            "maximum" => schema.maximum = Some(load_number(arg, path)?),
            "pattern" => {
                let Value::String(source) = arg else {
                    return Err(expected(path, "a regular expression string", arg));
                };
                let pattern = Pattern::new(source)
                    .map_err(|e| SchemaError::new(path.clone(), format!("bad pattern: {e}")))?;
                schema.pattern = Some(pattern);
            }
            "enum" => {
                let Value::Array(values) = arg else {
                    return Err(expected(path, "an array of allowed values", arg));
                };
                schema.allowed = Some(values.clone());
            }
            other if ANNOTATIONS.contains(&other) => {}
            other => {
                return Err(SchemaError::new(
                    path.clone(),
                    format!("unknown schema keyword `{other}`"),
                ))
            }
        }
        path.pop();
    }

    if let (Some(min), Some(max)) = (schema.min_items, schema.max_items) {
        if min > max {
            return Err(SchemaError::new(
                path.clone(),
                format!("minItems {min} is greater than maxItems {max}"),
            ));
        }
    }
    if let (Some(min), Some(max)) = (schema.minimum, schema.maximum) {
        if max.cmp_value(&min.to_value()) == Some(Ordering::Greater) {
            return Err(SchemaError::new(
                path.clone(),
                format!("minimum {min} is greater than maximum {max}"),
            ));
        }
    }
    Ok(schema)
}

fn load_types(arg: &Value, path: &Path) -> Result<Vec<SchemaType>, SchemaError> {
    let names: Vec<&str> = match arg {
        Value::String(name) => vec![name.as_str()],
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| expected(path, "a type name", item)))
            .collect::<Result<_, _>>()?,
        other => return Err(expected(path, "a type name or list of type names", other)),
    };
    let mut types = Vec::new();
    for name in names {
        let resolved = SchemaType::parse_keyword(name)
            .ok_or_else(|| SchemaError::new(path.clone(), format!("unknown type `{name}`")))?;
        for t in resolved {
            if !types.contains(t) {
                types.push(*t);
            }
        }
    }
    if types.is_empty() {
        return Err(SchemaError::new(path.clone(), "type list is empty"));
    }
    Ok(types)
}

fn load_count(arg: &Value, path: &Path) -> Result<usize, SchemaError> {
    match arg {
        Value::Int(n) => usize::try_from(*n)
            .map_err(|_| SchemaError::new(path.clone(), format!("count must be >= 0, got {n}"))),
        other => Err(expected(path, "a non-negative integer", other)),
    }
}

fn load_number(arg: &Value, path: &Path) -> Result<Bound, SchemaError> {
    match arg {
        Value::Int(n) => Ok(Bound::Int(*n)),
        Value::Float(f) if f.is_finite() => Ok(Bound::Float(*f)),
        other => Err(expected(path, "a finite number", other)),
    }
}

fn expected(path: &Path, what: &str, found: &Value) -> SchemaError {
    SchemaError::new(path.clone(), format!("expected {what}, found {}", found.kind()))
}
