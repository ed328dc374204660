//! INI adapter.
//!
//! The supported dialect:
//!
//! - `[section]` headers; keys before the first header belong to the root
//! - `key = value` or `key: value` (the first `=` or `:` separates)
//! - whole-line comments starting with `;` or `#`
//! - double-quoted values with `\\`, `\"`, `\n`, `\r`, `\t` escapes; unquoted
//!   values are taken verbatim up to the end of the line, trimmed
//!
//! A document is exactly two levels deep: root keys and one level of
//! sections. There are no arrays, no null and no NaN or infinities. Repeated keys within a section,
//! repeated sections and a section named like a root key are parse errors.
//!
//! Values are strings unless the adapter is built with
//! [`IniOptions::typed`], which infers `true`/`false`, integers and floats
//! from unquoted values.

use super::{FormatAdapter, SerializeOptions};
use crate::document::Format;
use crate::error::{ParseError, SerializeError};
use crate::path::Path;
use crate::value::{Table, Value};

/// Reading options for INI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IniOptions {
    /// Infer bools, integers and floats from unquoted values.
    pub typed: bool,
}

/// The INI reader/writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ini {
    options: IniOptions,
}

/// INI with every value read as a string.
pub static UNTYPED: Ini = Ini::new(IniOptions { typed: false });

/// INI with scalar type inference.
pub static TYPED: Ini = Ini::new(IniOptions { typed: true });

impl Ini {
    pub const fn new(options: IniOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> IniOptions {
        self.options
    }
}

impl FormatAdapter for Ini {
    fn format(&self) -> Format {
        Format::Ini
    }

    fn parse(&self, input: &str) -> Result<Value, ParseError> {
        let mut root = Table::new();
        // The section being filled, flushed into `root` at the next header.
        let mut section: Option<(String, Table)> = None;

        for (idx, line) in input.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }
            let column = leading_columns(line) + 1;

            if let Some(header) = trimmed.strip_prefix('[') {
                let name = parse_section_header(header, line_no, column)?;
                if let Some((done, table)) = section.take() {
                    root.insert(done, Value::Table(table));
                }
                match root.get(name) {
                    Some(Value::Table(_)) => {
                        return Err(ParseError::at(
                            Format::Ini,
                            line_no,
                            column,
                            format!("duplicate section [{name}]"),
                        ))
                    }
                    Some(_) => {
                        return Err(ParseError::at(
                            Format::Ini,
                            line_no,
                            column,
                            format!("section [{name}] collides with root key `{name}`"),
                        ))
                    }
                    None => {}
                }
                section = Some((name.to_string(), Table::new()));
                continue;
            }

            let (key, raw) = split_entry(trimmed).ok_or_else(|| {
                ParseError::at(Format::Ini, line_no, column, "expected `key = value`")
            })?;
            if key.is_empty() {
                return Err(ParseError::at(Format::Ini, line_no, column, "missing key before `=`"));
            }
            let value_column = column + trimmed.chars().count() - raw.chars().count();
            let value = self.parse_value(raw, line_no, value_column)?;

            let target = match section.as_mut() {
                Some((_, table)) => table,
                None => &mut root,
            };
            if target.contains_key(key) {
                return Err(ParseError::at(
                    Format::Ini,
                    line_no,
                    column,
                    format!("duplicate key `{key}`"),
                ));
            }
            target.insert(key.to_string(), value);
        }

        if let Some((name, table)) = section {
            root.insert(name, Value::Table(table));
        }
        Ok(Value::Table(root))
    }

    fn serialize(
        &self,
        value: &Value,
        options: &SerializeOptions,
    ) -> Result<String, SerializeError> {
        let Value::Table(root) = value else {
            return Err(SerializeError::new(
                Format::Ini,
                Path::root(),
                format!("document root must be a table, found {}", value.kind()),
            ));
        };
        let separator = if options.pretty { " = " } else { "=" };
        let mut out = String::new();

        for (key, value) in root.iter().filter(|(_, v)| !matches!(v, Value::Table(_))) {
            let path = Path::root().join_key(key.as_str());
            write_entry(key, value, &path, separator, &mut out)?;
        }

        for (name, value) in root {
            let Value::Table(section) = value else {
                continue;
            };
            let section_path = Path::root().join_key(name.as_str());
            check_section_name(name, &section_path)?;
            if options.pretty && !out.is_empty() {
                out.push('\n');
            }
            out.push('[');
            out.push_str(name);
            out.push_str("]\n");
            for (key, value) in section {
                let path = section_path.join_key(key.as_str());
                if let Value::Table(_) = value {
                    return Err(SerializeError::new(
                        Format::Ini,
                        path,
                        "INI cannot nest a table below a section",
                    ));
                }
                write_entry(key, value, &path, separator, &mut out)?;
            }
        }
        tracing::trace!(bytes = out.len(), "serialized ini");
        Ok(out)
    }
}

impl Ini {
    fn parse_value(&self, raw: &str, line: usize, column: usize) -> Result<Value, ParseError> {
        if let Some(quoted) = raw.strip_prefix('"') {
            return parse_quoted(quoted, line, column).map(Value::String);
        }
        if self.options.typed {
            Ok(infer_scalar(raw))
        } else {
            Ok(Value::String(raw.to_string()))
        }
    }
}

/// Parse the part of a header line after `[`, returning the section name.
fn parse_section_header(header: &str, line: usize, column: usize) -> Result<&str, ParseError> {
    let name = header
        .strip_suffix(']')
        .ok_or_else(|| ParseError::at(Format::Ini, line, column, "unterminated section header"))?
        .trim();
    if name.is_empty() {
        return Err(ParseError::at(Format::Ini, line, column, "empty section name"));
    }
    if name.contains(['[', ']']) {
        return Err(ParseError::at(
            Format::Ini,
            line,
            column,
            "section names cannot contain brackets; INI has only one level of sections",
        ));
    }
    Ok(name)
}

/// Split `key = value` / `key: value` at the first separator.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let sep = line.find(['=', ':'])?;
    let key = line.get(..sep)?.trim_end();
    let value = line.get(sep + 1..)?.trim_start();
    Some((key, value))
}

/// Decode a double-quoted value. `body` starts right after the opening quote.
/// Only whitespace or a comment may follow the closing quote.
fn parse_quoted(body: &str, line: usize, column: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                let rest = body.get(i + 1..).unwrap_or("").trim_start();
                if !(rest.is_empty() || rest.starts_with(';') || rest.starts_with('#')) {
                    return Err(ParseError::at(
                        Format::Ini,
                        line,
                        column,
                        "unexpected text after closing quote",
                    ));
                }
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, '"')) => out.push('"'),
                Some((j, other)) => {
                    return Err(ParseError::at(
                        Format::Ini,
                        line,
                        column + 1 + body.get(..j).map_or(0, |s| s.chars().count()),
                        format!("invalid escape `\\{other}`"),
                    ))
                }
                None => break,
            },
            _ => out.push(c),
        }
    }
    Err(ParseError::at(Format::Ini, line, column, "unterminated quoted value"))
}

/// Typed reading: `true`/`false`, then integers, then floats; anything else
/// is a string.
fn infer_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if looks_like_float(raw) {
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::String(raw.to_string())
}

/// Digits with a fraction and/or exponent. Rejects `inf`, `nan` and the like,
/// which `f64::from_str` would otherwise accept.
fn looks_like_float(s: &str) -> bool {
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    body.bytes().any(|b| b.is_ascii_digit())
        && body.contains(['.', 'e', 'E'])
        && body
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
}

fn leading_columns(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn write_entry(
    key: &str,
    value: &Value,
    path: &Path,
    separator: &str,
    out: &mut String,
) -> Result<(), SerializeError> {
    check_key(key, path)?;
    let text = match value {
        Value::Null => {
            return Err(SerializeError::new(Format::Ini, path.clone(), "INI has no null value"))
        }
        Value::Array(_) => {
            return Err(SerializeError::new(Format::Ini, path.clone(), "INI has no arrays"))
        }
        Value::Table(_) => {
            return Err(SerializeError::new(
                Format::Ini,
                path.clone(),
                "INI cannot nest a table below a section",
            ))
        }
        Value::Float(f) if !f.is_finite() => {
            return Err(SerializeError::new(
                Format::Ini,
                path.clone(),
                format!("{f} cannot be read back as a number"),
            ))
        }
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        // Debug keeps the fraction on whole floats (`1.0`, not `1`).
        Value::Float(f) => format!("{f:?}"),
        Value::String(s) => encode_string(s),
    };
    out.push_str(key);
    out.push_str(separator);
    out.push_str(&text);
    out.push('\n');
    Ok(())
}

/// Quote a string when it would not read back verbatim, including when a
/// typed reader would take it for a bool or a number.
fn encode_string(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s != s.trim()
        || s.starts_with('"')
        || s.contains(['\n', '\r', '\t'])
        || !matches!(infer_scalar(s), Value::String(_));
    if !needs_quotes {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn check_key(key: &str, path: &Path) -> Result<(), SerializeError> {
    let invalid = key.is_empty()
        || key != key.trim()
        || key.contains(['=', ':', '\n', '\r'])
        || key.starts_with(['[', ';', '#']);
    if invalid {
        return Err(SerializeError::new(
            Format::Ini,
            path.clone(),
            format!("key {key:?} cannot be written in INI"),
        ));
    }
    Ok(())
}

fn check_section_name(name: &str, path: &Path) -> Result<(), SerializeError> {
    let invalid = name.is_empty()
        || name != name.trim()
        || name.contains(['[', ']', '\n', '\r']);
    if invalid {
        return Err(SerializeError::new(
            Format::Ini,
            path.clone(),
            format!("section name {name:?} cannot be written in INI"),
        ));
    }
    Ok(())
}
