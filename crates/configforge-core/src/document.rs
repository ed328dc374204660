//! Format tags and parsed documents.

use crate::error::{ParseError, SerializeError, UnknownFormat};
use crate::format::{self, FormatAdapter, SerializeOptions};
use crate::value::Value;
use std::fmt;
use std::path::{Path as FsPath, PathBuf};
use std::str::FromStr;

/// The configuration formats the engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Toml,
    Ini,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Json, Format::Yaml, Format::Toml, Format::Ini];

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
            Format::Ini => "ini",
        }
    }

    /// Infer the format from a file extension (`.json`, `.yaml`/`.yml`,
    /// `.toml`, `.ini`/`.cfg`/`.conf`). Case-insensitive.
    pub fn from_path(path: &FsPath) -> Option<Format> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }

    /// The adapter with default options for this format.
    pub fn adapter(self) -> &'static dyn FormatAdapter {
        match self {
            Format::Json => &format::json::Json,
            Format::Yaml => &format::yaml::Yaml,
            Format::Toml => &format::toml::Toml,
            Format::Ini => &format::ini::UNTYPED,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            "ini" | "cfg" | "conf" => Ok(Format::Ini),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// A parsed value together with where it came from.
///
/// Documents are immutable: merging or converting produces a new document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    value: Value,
    format: Format,
    origin: Option<PathBuf>,
}

impl Document {
    pub fn new(value: Value, format: Format) -> Self {
        Self {
            value,
            format,
            origin: None,
        }
    }

    /// Parse `text` with the default adapter for `format`.
    pub fn parse(text: &str, format: Format) -> Result<Self, ParseError> {
        Self::parse_with(text, format.adapter())
    }

    /// Parse `text` with a specific adapter (e.g. a typed INI reader).
    pub fn parse_with(text: &str, adapter: &dyn FormatAdapter) -> Result<Self, ParseError> {
        let value = adapter.parse(text)?;
        Ok(Self::new(value, adapter.format()))
    }

    /// Record the file this document was read from.
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn origin(&self) -> Option<&FsPath> {
        self.origin.as_deref()
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Render this document's value in `target`.
    pub fn serialize(
        &self,
        target: Format,
        options: &SerializeOptions,
    ) -> Result<String, SerializeError> {
        target.adapter().serialize(&self.value, options)
    }
}

/// Parse `input` as `from` and write it as `to`.
///
/// ```
/// use configforge_core::{convert, Format, SerializeOptions};
///
/// let toml = convert(r#"{"name":"api","port":8080}"#, Format::Json, Format::Toml,
///     &SerializeOptions::default()).unwrap();
/// assert_eq!(toml, "name = \"api\"\nport = 8080\n");
/// ```
pub fn convert(
    input: &str,
    from: Format,
    to: Format,
    options: &SerializeOptions,
) -> crate::error::Result<String> {
    let doc = Document::parse(input, from)?;
    Ok(doc.serialize(to, options)?)
}
