//! Format adapters: one `parse`/`serialize` pair per supported format.
//!
//! Every adapter depends only on the value model. They are selected by
//! [`Format`] tag through [`Format::adapter`], or constructed directly when
//! non-default reading options are wanted (see [`ini::Ini`]).

pub mod ini;
pub mod json;
pub mod toml;
pub mod yaml;

use crate::document::Format;
use crate::error::{ParseError, SerializeError};
use crate::value::Value;

/// Output layout options shared by all serializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Multi-line, indented output. When false, the most compact layout the
    /// format allows.
    pub pretty: bool,
    /// Spaces per nesting level, for formats whose emitter takes one.
    pub indent: usize,
}

impl SerializeOptions {
    pub fn pretty() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
        }
    }
}

/// A format's reader and writer.
pub trait FormatAdapter: Send + Sync {
    fn format(&self) -> Format;

    /// Parse source text into a value tree.
    fn parse(&self, input: &str) -> Result<Value, ParseError>;

    /// Render a value tree, failing when the format cannot represent it.
    fn serialize(&self, value: &Value, options: &SerializeOptions)
        -> Result<String, SerializeError>;
}

/// Drop a trailing ` at line L column C` that serde-based parsers append to
/// their messages, since the position is carried separately.
fn strip_location_suffix(message: String, line: usize, column: usize) -> String {
    let suffix = format!(" at line {line} column {column}");
    match message.strip_suffix(&suffix) {
        Some(stripped) => stripped.to_string(),
        None => message,
    }
}
