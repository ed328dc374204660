//! Schema validation.
//!
//! The validator walks the value tree once, in pre-order, and records every
//! violation it finds instead of stopping at the first. A node's own problems
//! (type, enum, range, pattern, length, missing keys) are reported before
//! those of its children.
//!
//! Type and required-key checks always apply. The `additionalProperties`
//! policy only applies when the caller asks for strict validation.

use crate::path::Path;
use crate::schema::{Bound, Schema, SchemaType};
use crate::value::{Table, Value, ValueKind};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// One schema violation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path}: {kind}")]
pub struct ValidationError {
    /// Location of the offending value. For a missing key, the location the
    /// key was expected at.
    pub path: Path,
    pub kind: ValidationErrorKind,
}

/// What a [`ValidationError`] is about.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    TypeMismatch {
        expected: Vec<SchemaType>,
        found: ValueKind,
    },
    MissingKey {
        key: String,
    },
    UnknownKey {
        key: String,
    },
    OutOfRange {
        value: Value,
        minimum: Option<Bound>,
        maximum: Option<Bound>,
    },
    PatternMismatch {
        value: String,
        pattern: String,
    },
    NotInEnum {
        value: Value,
        allowed: Vec<Value>,
    },
    TooFewItems {
        min: usize,
        len: usize,
    },
    TooManyItems {
        max: usize,
        len: usize,
    },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::TypeMismatch { expected, found } => {
                let names: Vec<String> = expected.iter().map(ToString::to_string).collect();
                write!(f, "expected {}, found {found}", names.join(" or "))
            }
            ValidationErrorKind::MissingKey { key } => {
                write!(f, "missing required key {key:?}")
            }
            ValidationErrorKind::UnknownKey { key } => {
                write!(f, "unexpected key {key:?}")
            }
            ValidationErrorKind::OutOfRange {
                value,
                minimum,
                maximum,
            } => {
                let lo = minimum.map_or_else(|| "-inf".to_string(), |m| m.to_string());
                let hi = maximum.map_or_else(|| "inf".to_string(), |m| m.to_string());
                write!(f, "value {value} is out of range [{lo}, {hi}]")
            }
            ValidationErrorKind::PatternMismatch { value, pattern } => {
                write!(f, "{value:?} does not match pattern {pattern:?}")
            }
            ValidationErrorKind::NotInEnum { value, allowed } => {
                let names: Vec<String> = allowed.iter().map(ToString::to_string).collect();
                write!(f, "{value} is not one of [{}]", names.join(", "))
            }
            ValidationErrorKind::TooFewItems { min, len } => {
                write!(f, "array has {len} items, expected at least {min}")
            }
            ValidationErrorKind::TooManyItems { max, len } => {
                write!(f, "array has {len} items, expected at most {max}")
            }
        }
    }
}

/// Validate `value` against `schema`, returning every violation found.
/// An empty vector means the value is valid.
pub fn validate(value: &Value, schema: &Schema, strict: bool) -> Vec<ValidationError> {
    let mut validator = Validator {
        strict,
        path: Path::root(),
        errors: Vec::new(),
    };
    validator.visit(value, schema);
    tracing::debug!(strict, errors = validator.errors.len(), "validated document");
    validator.errors
}

/// Shorthand for `validate(..).is_empty()`.
pub fn is_valid(value: &Value, schema: &Schema, strict: bool) -> bool {
    validate(value, schema, strict).is_empty()
}

struct Validator {
    strict: bool,
    path: Path,
    errors: Vec<ValidationError>,
}

impl Validator {
    fn report(&mut self, kind: ValidationErrorKind) {
        self.report_at(self.path.clone(), kind);
    }

    fn report_at(&mut self, path: Path, kind: ValidationErrorKind) {
        tracing::trace!(%path, "validation error");
        self.errors.push(ValidationError { path, kind });
    }

    fn visit(&mut self, value: &Value, schema: &Schema) {
        let kind = value.kind();
        if !schema.types.iter().any(|t| t.accepts(kind)) {
            // Constraints for the expected type say nothing about this value.
            self.report(ValidationErrorKind::TypeMismatch {
                expected: schema.types.clone(),
                found: kind,
            });
            return;
        }

        if let Some(allowed) = &schema.allowed {
            if !allowed.contains(value) {
                self.report(ValidationErrorKind::NotInEnum {
                    value: value.clone(),
                    allowed: allowed.clone(),
                });
            }
        }

        match value {
            Value::Null | Value::Bool(_) => {}
            Value::Int(_) | Value::Float(_) => self.check_range(value, schema),
            Value::String(s) => {
                if let Some(pattern) = &schema.pattern {
                    if !pattern.is_match(s) {
                        self.report(ValidationErrorKind::PatternMismatch {
                            value: s.clone(),
                            pattern: pattern.as_str().to_string(),
                        });
                    }
                }
            }
            Value::Array(items) => self.visit_array(items, schema),
            Value::Table(table) => self.visit_table(table, schema),
        }
    }

    /// NaN is outside every range.
    fn check_range(&mut self, value: &Value, schema: &Schema) {
        let below = schema
            .minimum
            .is_some_and(|min| min.cmp_value(value).map_or(true, Ordering::is_lt));
        let above = schema
            .maximum
            .is_some_and(|max| max.cmp_value(value).map_or(true, Ordering::is_gt));
        if below || above {
            self.report(ValidationErrorKind::OutOfRange {
                value: value.clone(),
                minimum: schema.minimum,
                maximum: schema.maximum,
            });
        }
    }

    fn visit_array(&mut self, items: &[Value], schema: &Schema) {
        let len = items.len();
        if let Some(min) = schema.min_items.filter(|min| len < *min) {
            self.report(ValidationErrorKind::TooFewItems { min, len });
        }
        if let Some(max) = schema.max_items.filter(|max| len > *max) {
            self.report(ValidationErrorKind::TooManyItems { max, len });
        }
        let Some(item_schema) = schema.items.as_deref() else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            self.path.push_index(i);
            self.visit(item, item_schema);
            self.path.pop();
        }
    }

    fn visit_table(&mut self, table: &Table, schema: &Schema) {
        for key in &schema.required {
            if !table.contains_key(key) {
                let path = self.path.join_key(key.as_str());
                self.report_at(path, ValidationErrorKind::MissingKey { key: key.clone() });
            }
        }

        for (key, child) in table {
            match schema.properties.get(key) {
                Some(child_schema) => {
                    self.path.push_key(key.as_str());
                    self.visit(child, child_schema);
                    self.path.pop();
                }
                None if self.strict && !schema.additional_properties => {
                    let path = self.path.join_key(key.as_str());
                    self.report_at(path, ValidationErrorKind::UnknownKey { key: key.clone() });
                }
                None => {}
            }
        }
    }
}
