//! TOML adapter backed by the `toml` crate.
//!
//! The root is always a table. Offset date-times, local date-times, dates and
//! times are read as their RFC 3339 text in a `String`; there is no datetime
//! variant in the value model.
//!
//! TOML has no null, so any `Null` in the tree fails serialization with the
//! path of the offending node. Within one table the writer emits plain keys
//! before sub-tables, as the grammar requires; the parsed result is still
//! structurally equal because table equality ignores key order.

use super::{FormatAdapter, SerializeOptions};
use crate::document::Format;
use crate::error::{ParseError, Position, SerializeError};
use crate::path::Path;
use crate::value::{Table, Value};

/// The TOML reader/writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

impl FormatAdapter for Toml {
    fn format(&self) -> Format {
        Format::Toml
    }

    fn parse(&self, input: &str) -> Result<Value, ParseError> {
        let table: toml::Table = toml::from_str(input).map_err(|err| {
            let position = err.span().map(|span| Position::from_offset(input, span.start));
            ParseError::new(Format::Toml, position, err.message().trim_end())
        })?;
        Ok(from_toml_table(table))
    }

    fn serialize(
        &self,
        value: &Value,
        options: &SerializeOptions,
    ) -> Result<String, SerializeError> {
        let Value::Table(root) = value else {
            return Err(SerializeError::new(
                Format::Toml,
                Path::root(),
                format!("document root must be a table, found {}", value.kind()),
            ));
        };
        let mut path = Path::root();
        let table = to_toml_table(root, &mut path)?;
        let rendered = if options.pretty {
            toml::to_string_pretty(&table)
        } else {
            toml::to_string(&table)
        };
        let out = rendered
            .map_err(|e| SerializeError::new(Format::Toml, Path::root(), e.to_string()))?;
        tracing::trace!(bytes = out.len(), "serialized toml");
        Ok(out)
    }
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Int(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => from_toml_table(table),
    }
}

fn from_toml_table(table: toml::Table) -> Value {
    Value::Table(
        table
            .into_iter()
            .map(|(key, value)| (key, from_toml(value)))
            .collect(),
    )
}

fn to_toml(value: &Value, path: &mut Path) -> Result<toml::Value, SerializeError> {
    Ok(match value {
        Value::Null => {
            return Err(SerializeError::new(
                Format::Toml,
                path.clone(),
                "TOML has no null value",
            ))
        }
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Int(i) => toml::Value::Integer(*i),
        Value::Float(f) => toml::Value::Float(*f),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                path.push_index(i);
                out.push(to_toml(item, path)?);
                path.pop();
            }
            toml::Value::Array(out)
        }
        Value::Table(table) => toml::Value::Table(to_toml_table(table, path)?),
    })
}

fn to_toml_table(table: &Table, path: &mut Path) -> Result<toml::Table, SerializeError> {
    let mut out = toml::Table::new();
    for (key, value) in table {
        path.push_key(key.as_str());
        out.insert(key.clone(), to_toml(value, path)?);
        path.pop();
    }
    Ok(out)
}
