//! YAML adapter (block style) backed by `serde_yaml`.
//!
//! Scalars are typed implicitly (`true`, `123`, `1.5`, `~`); quoted scalars
//! stay strings. Anchors and aliases are resolved to the values they name.
//! Scalar mapping keys of any type are read as the text they were written as.
//!
//! An empty document is an empty table. Otherwise the root must be a mapping
//! or a sequence.

use super::{strip_location_suffix, FormatAdapter, SerializeOptions};
use crate::document::Format;
use crate::error::{ParseError, Position, SerializeError};
use crate::path::Path;
use crate::value::Value;

/// The YAML reader/writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl FormatAdapter for Yaml {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn parse(&self, input: &str) -> Result<Value, ParseError> {
        if is_blank(input) {
            return Ok(Value::table());
        }
        let value: Value = serde_yaml::from_str(input).map_err(parse_error)?;
        match value {
            Value::Table(_) | Value::Array(_) => Ok(value),
            // A document holding only `---` or `~`.
            Value::Null => Ok(Value::table()),
            other => Err(ParseError::at(
                Format::Yaml,
                1,
                1,
                format!("document root must be a mapping or sequence, found {}", other.kind()),
            )),
        }
    }

    /// Always block style; the emitter's indentation is fixed at two spaces,
    /// so `options` does not change the output.
    fn serialize(
        &self,
        value: &Value,
        _options: &SerializeOptions,
    ) -> Result<String, SerializeError> {
        if value.is_scalar() {
            return Err(SerializeError::new(
                Format::Yaml,
                Path::root(),
                format!("document root must be a mapping or sequence, found {}", value.kind()),
            ));
        }
        let out = serde_yaml::to_string(value)
            .map_err(|e| SerializeError::new(Format::Yaml, Path::root(), e.to_string()))?;
        tracing::trace!(bytes = out.len(), "serialized yaml");
        Ok(out)
    }
}

/// Only whitespace, comments and document markers.
fn is_blank(input: &str) -> bool {
    input.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn parse_error(err: serde_yaml::Error) -> ParseError {
    match err.location() {
        Some(loc) => {
            let (line, column) = (loc.line(), loc.column());
            let message = strip_location_suffix(err.to_string(), line, column);
            ParseError::new(Format::Yaml, Some(Position::new(line, column)), message)
        }
        None => ParseError::new(Format::Yaml, None, err.to_string()),
    }
}
