//! # configforge-core
//!
//! A configuration-document engine: parse JSON, YAML, TOML and INI into one
//! value model, validate it against a schema, convert between formats and
//! merge several documents under a chosen strategy.
//!
//! ## Quick start
//!
//! ```rust
//! use configforge_core::{
//!     merge_documents, validate, Document, Format, MergeStrategy, Schema, SerializeOptions,
//! };
//!
//! let base = Document::parse("[server]\nhost = localhost\n", Format::Ini).unwrap();
//! let local = Document::parse(r#"{"server": {"port": 8080}}"#, Format::Json).unwrap();
//!
//! let merged = merge_documents(vec![base, local], MergeStrategy::Deep).unwrap();
//! let yaml = merged.serialize(Format::Yaml, &SerializeOptions::default()).unwrap();
//! assert_eq!(yaml, "server:\n  host: localhost\n  port: 8080\n");
//!
//! let schema = Schema::object().require("server");
//! assert!(validate(merged.value(), &schema, true).is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`value`] - `Value` tree shared by every component
//! - [`path`] - key/index paths used in error reports
//! - [`format`] - JSON, YAML, TOML and INI adapters
//! - [`document`] - format tags, parsed documents, `convert`
//! - [`schema`] - schema trees and the schema loader
//! - [`validate`](mod@validate) - accumulate-all-errors schema validation
//! - [`merge`](mod@merge) - shallow/deep/override merging
//! - [`error`] - error types

pub mod document;
pub mod error;
pub mod format;
pub mod merge;
pub mod path;
pub mod schema;
pub mod validate;
pub mod value;

pub use document::{convert, Document, Format};
pub use error::{
    ForgeError, MergeConflict, MergeError, ParseError, Position, SchemaError, SerializeError,
    UnknownFormat, UnknownStrategy,
};
pub use format::ini::{Ini, IniOptions};
pub use format::{FormatAdapter, SerializeOptions};
pub use merge::{merge, merge2, merge_documents, MergeOptions, MergeStrategy};
pub use path::{Path, PathSegment};
pub use schema::{Bound, Schema, SchemaType};
pub use validate::{is_valid, validate, ValidationError, ValidationErrorKind};
pub use value::{Table, Value, ValueKind};
