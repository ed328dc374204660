//! Merging an ordered sequence of documents into one.
//!
//! `merge` is a left fold of the pairwise [`merge2`]: the running result is
//! combined with each next document in the order given, so later documents
//! take precedence. Strategies:
//!
//! | Strategy   | Common table keys       | Arrays on both sides | Everything else |
//! |------------|-------------------------|----------------------|-----------------|
//! | `Shallow`  | right value replaces    | right replaces       | right replaces  |
//! | `Deep`     | merged recursively      | left ++ right        | right replaces  |
//! | `Override` | merged recursively      | right replaces       | right replaces  |
//!
//! Keys present on only one side are always carried through unchanged, at
//! their original position; new keys from the right are appended.
//!
//! With `strict_types`, replacing a value by one of a different variant is a
//! [`MergeConflict`] instead of a silent replacement.
//!
//! ```
//! use configforge_core::merge::{merge2, MergeStrategy};
//! use configforge_core::Value;
//!
//! let base = Value::from_iter([("a", Value::from_iter([("x", Value::Int(1))]))]);
//! let over = Value::from_iter([("a", Value::from_iter([("y", Value::Int(2))]))]);
//!
//! let merged = merge2(base, over, MergeStrategy::Deep).unwrap();
//! assert_eq!(merged.get("a").and_then(|a| a.get("x")), Some(&Value::Int(1)));
//! assert_eq!(merged.get("a").and_then(|a| a.get("y")), Some(&Value::Int(2)));
//! ```

use crate::document::Document;
use crate::error::{MergeConflict, MergeError, UnknownStrategy};
use crate::path::Path;
use crate::value::{Table, Value};
use std::fmt;
use std::str::FromStr;

/// How conflicting keys are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MergeStrategy {
    /// Replace top-level keys wholesale; never recurse.
    Shallow,
    /// Recurse into tables and concatenate arrays.
    #[default]
    Deep,
    /// Recurse into tables; arrays and scalars are replaced.
    Override,
}

impl MergeStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeStrategy::Shallow => "shallow",
            MergeStrategy::Deep => "deep",
            MergeStrategy::Override => "override",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shallow" => Ok(MergeStrategy::Shallow),
            "deep" => Ok(MergeStrategy::Deep),
            "override" => Ok(MergeStrategy::Override),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Merge configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub strategy: MergeStrategy,
    /// Fail with a [`MergeConflict`] when a value would be replaced by one of
    /// a different variant.
    pub strict_types: bool,
}

impl MergeOptions {
    pub fn new(strategy: MergeStrategy) -> Self {
        Self {
            strategy,
            strict_types: false,
        }
    }

    pub fn strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }
}

impl From<MergeStrategy> for MergeOptions {
    fn from(strategy: MergeStrategy) -> Self {
        Self::new(strategy)
    }
}

/// Merge `values` left to right.
///
/// Fails with [`MergeError::Empty`] when there is nothing to merge. A single
/// value is returned unchanged.
pub fn merge<I>(values: I, options: impl Into<MergeOptions>) -> Result<Value, MergeError>
where
    I: IntoIterator<Item = Value>,
{
    let options = options.into();
    let mut values = values.into_iter();
    let first = values.next().ok_or(MergeError::Empty)?;
    let mut count = 1usize;
    let merged = values.try_fold(first, |acc, next| {
        count += 1;
        merge2(acc, next, options)
    })?;
    tracing::debug!(documents = count, strategy = %options.strategy, "merged documents");
    Ok(merged)
}

/// Merge two values; `b` takes precedence over `a`.
pub fn merge2(
    a: Value,
    b: Value,
    options: impl Into<MergeOptions>,
) -> Result<Value, MergeConflict> {
    let options = options.into();
    let mut path = Path::root();
    match options.strategy {
        MergeStrategy::Shallow => match (a, b) {
            (Value::Table(left), Value::Table(right)) => {
                merge_tables(left, right, options, &mut path, replace)
            }
            (left, right) => replace(left, right, options, &mut path),
        },
        MergeStrategy::Deep | MergeStrategy::Override => merge_values(a, b, options, &mut path),
    }
}

/// Merge documents in order. The result takes the format of the last
/// document and has no origin.
pub fn merge_documents(
    documents: Vec<Document>,
    options: impl Into<MergeOptions>,
) -> Result<Document, MergeError> {
    let format = documents.last().ok_or(MergeError::Empty)?.format();
    let value = merge(documents.into_iter().map(Document::into_value), options)?;
    Ok(Document::new(value, format))
}

type Resolve = fn(Value, Value, MergeOptions, &mut Path) -> Result<Value, MergeConflict>;

/// Fold `right` into `left`, resolving keys present on both sides with
/// `resolve`. Existing keys keep their position.
fn merge_tables(
    mut left: Table,
    right: Table,
    options: MergeOptions,
    path: &mut Path,
    resolve: Resolve,
) -> Result<Value, MergeConflict> {
    for (key, incoming) in right {
        match left.get_mut(&key) {
            Some(slot) => {
                let current = std::mem::replace(slot, Value::Null);
                path.push_key(key.as_str());
                *slot = resolve(current, incoming, options, path)?;
                path.pop();
            }
            None => {
                left.insert(key, incoming);
            }
        }
    }
    Ok(Value::Table(left))
}

/// Recursive resolution for `Deep` and `Override`.
fn merge_values(
    a: Value,
    b: Value,
    options: MergeOptions,
    path: &mut Path,
) -> Result<Value, MergeConflict> {
    match (a, b) {
        (Value::Table(left), Value::Table(right)) => {
            merge_tables(left, right, options, path, merge_values)
        }
        (Value::Array(mut left), Value::Array(right))
            if options.strategy == MergeStrategy::Deep =>
        {
            left.extend(right);
            Ok(Value::Array(left))
        }
        (left, right) => replace(left, right, options, path),
    }
}

/// The right side wins, unless strict types forbid a variant change.
fn replace(
    a: Value,
    b: Value,
    options: MergeOptions,
    path: &mut Path,
) -> Result<Value, MergeConflict> {
    if options.strict_types && a.kind() != b.kind() {
        return Err(MergeConflict {
            path: path.clone(),
            left: a.kind(),
            right: b.kind(),
        });
    }
    Ok(b)
}
