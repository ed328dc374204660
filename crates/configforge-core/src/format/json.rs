//! JSON adapter.
//!
//! Parsing is strict RFC 8259 via `serde_json`. Numbers are read from their
//! literal text: without a fraction or exponent they become `Int` (and must
//! fit in an `i64`, so `-0` is `Int(0)`), everything else `Float`. The root
//! must be an object or an array. Duplicate keys are rejected.

use super::{strip_location_suffix, FormatAdapter, SerializeOptions};
use crate::document::Format;
use crate::error::{ParseError, Position, SerializeError};
use crate::path::Path;
use crate::value::Value;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// The JSON reader/writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl FormatAdapter for Json {
    fn format(&self) -> Format {
        Format::Json
    }

    fn parse(&self, input: &str) -> Result<Value, ParseError> {
        let value: Value = serde_json::from_str(input).map_err(parse_error)?;
        match value {
            Value::Table(_) | Value::Array(_) => Ok(value),
            other => Err(ParseError::at(
                Format::Json,
                1,
                1,
                format!("document root must be an object or array, found {}", other.kind()),
            )),
        }
    }

    fn serialize(
        &self,
        value: &Value,
        options: &SerializeOptions,
    ) -> Result<String, SerializeError> {
        if value.is_scalar() {
            return Err(SerializeError::new(
                Format::Json,
                Path::root(),
                format!("document root must be an object or array, found {}", value.kind()),
            ));
        }
        let mut path = Path::root();
        check_finite(value, &mut path)?;

        let mut out = if options.pretty {
            let indent = " ".repeat(options.indent);
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(
                &mut buf,
                PrettyFormatter::with_indent(indent.as_bytes()),
            );
            value.serialize(&mut ser).map_err(write_error)?;
            String::from_utf8(buf)
                .map_err(|e| SerializeError::new(Format::Json, Path::root(), e.to_string()))?
        } else {
            serde_json::to_string(value).map_err(write_error)?
        };
        out.push('\n');
        tracing::trace!(bytes = out.len(), "serialized json");
        Ok(out)
    }
}

fn parse_error(err: serde_json::Error) -> ParseError {
    let (line, column) = (err.line(), err.column());
    let message = strip_location_suffix(err.to_string(), line, column);
    // serde_json reports line 0 when it has no position.
    let position = (line > 0).then(|| Position::new(line, column));
    ParseError::new(Format::Json, position, message)
}

fn write_error(err: serde_json::Error) -> SerializeError {
    SerializeError::new(Format::Json, Path::root(), err.to_string())
}

/// JSON has no spelling for NaN or the infinities.
fn check_finite(value: &Value, path: &mut Path) -> Result<(), SerializeError> {
    match value {
        Value::Float(f) if !f.is_finite() => Err(SerializeError::new(
            Format::Json,
            path.clone(),
            format!("{f} cannot be represented in JSON"),
        )),
        Value::Array(items) => items.iter().enumerate().try_for_each(|(i, item)| {
            path.push_index(i);
            let result = check_finite(item, path);
            path.pop();
            result
        }),
        Value::Table(table) => table.iter().try_for_each(|(key, item)| {
            path.push_key(key.as_str());
            let result = check_finite(item, path);
            path.pop();
            result
        }),
        _ => Ok(()),
    }
}
