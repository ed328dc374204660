//! Error types for parsing, serializing, schema loading and merging.
//!
//! Every expected user-input problem is an ordinary value carried in a
//! `Result`. Schema violations are not errors at all: the validator returns
//! them as a list of [`ValidationError`](crate::validate::ValidationError)
//! records.

use crate::document::Format;
use crate::path::Path;
use crate::value::ValueKind;
use std::fmt;
use thiserror::Error;

/// A 1-based line/column location in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate a byte offset within `text`.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = text.get(..offset).unwrap_or(text);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before.get(line_start..).map_or(0, |s| s.chars().count()) + 1;
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Malformed input for a given format.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{format} parse error{}: {message}", at(.position))]
pub struct ParseError {
    pub format: Format,
    /// Where the problem was detected, when the underlying parser reports it.
    pub position: Option<Position>,
    pub message: String,
}

impl ParseError {
    pub fn new(format: Format, position: Option<Position>, message: impl Into<String>) -> Self {
        Self {
            format,
            position,
            message: message.into(),
        }
    }

    pub fn at(format: Format, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::new(format, Some(Position::new(line, column)), message)
    }
}

fn at(position: &Option<Position>) -> String {
    position.map(|p| format!(" at {p}")).unwrap_or_default()
}

/// The target format cannot represent the value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot write {format} at {path}: {message}")]
pub struct SerializeError {
    pub format: Format,
    pub path: Path,
    pub message: String,
}

impl SerializeError {
    pub fn new(format: Format, path: Path, message: impl Into<String>) -> Self {
        Self {
            format,
            path,
            message: message.into(),
        }
    }
}

/// Two documents disagree on a value's variant while strict-types merging is on.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("type conflict at {path}: {left} would be replaced by {right}")]
pub struct MergeConflict {
    pub path: Path,
    pub left: ValueKind,
    pub right: ValueKind,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    /// `merge` was called with no documents.
    #[error("nothing to merge: no input documents")]
    Empty,

    #[error(transparent)]
    Conflict(#[from] MergeConflict),
}

/// A schema document that does not describe a valid schema.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid schema at {path}: {message}")]
pub struct SchemaError {
    pub path: Path,
    pub message: String,
}

impl SchemaError {
    pub fn new(path: Path, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown format '{0}' (expected json, yaml, toml or ini)")]
pub struct UnknownFormat(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown merge strategy '{0}' (expected deep, shallow or override)")]
pub struct UnknownStrategy(pub String);

/// Any error the engine can produce.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForgeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    UnknownFormat(#[from] UnknownFormat),
}

/// Convenience alias used by the string-level entry points.
pub type Result<T> = std::result::Result<T, ForgeError>;
