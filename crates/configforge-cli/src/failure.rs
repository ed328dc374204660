//! Typed failures and the exit codes they map to.
//!
//! Commands return `anyhow::Result`; `main` finds the `Failure` in the error
//! chain to pick the process exit code. Anything without one exits with 1.

use configforge_core::{MergeError, ParseError, SchemaError, SerializeError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub mod code {
    pub const NOT_FOUND: u8 = 3;
    pub const PARSE: u8 = 4;
    pub const INVALID: u8 = 5;
    pub const SERIALIZE: u8 = 6;
    pub const MERGE: u8 = 7;
    pub const SCHEMA: u8 = 8;
    pub const WRITE: u8 = 9;
    pub const UNKNOWN_FORMAT: u8 = 10;
}

#[derive(Error, Debug)]
pub enum Failure {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot tell the format of {}; pass it explicitly", path.display())]
    UnknownFormat { path: PathBuf },

    #[error("{}: {error}", path.display())]
    Parse { path: PathBuf, error: ParseError },

    #[error("{}: {count} validation error(s)", path.display())]
    Invalid { path: PathBuf, count: usize },

    #[error("{}: {error}", path.display())]
    Schema { path: PathBuf, error: SchemaError },

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Failure {
    pub fn exit_code(&self) -> u8 {
        match self {
            Failure::NotFound(_) | Failure::Read { .. } => code::NOT_FOUND,
            Failure::UnknownFormat { .. } => code::UNKNOWN_FORMAT,
            Failure::Parse { .. } => code::PARSE,
            Failure::Invalid { .. } => code::INVALID,
            Failure::Schema { .. } => code::SCHEMA,
            Failure::Serialize(_) => code::SERIALIZE,
            Failure::Merge(_) => code::MERGE,
            Failure::Write { .. } => code::WRITE,
        }
    }
}
