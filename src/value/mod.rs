//! Value type system for rowguard
//!
//! Change-event snapshots carry dynamically typed column values. This module
//! defines the tagged [`Value`] union those snapshots hold, plus the traits and
//! helpers used to move between `Value` and concrete Rust types.
//!
//! ## Pieces
//!
//! - **`Value`** - The tagged union stored in a snapshot
//! - **`ValueType`** - Maps Rust types to and from their `Value` variant
//! - **`TryGetable`** - Strict extraction with error reporting
//! - **`conv`** - Total, never-failing coercions used by the comparators
//!
//! Note that all type-dependent decisions (emptiness, equality) are made on the
//! column's logical type, never on which `Value` variant happens to be stored.

pub mod conv;
pub mod try_getable;
pub mod types;

#[cfg(test)]
mod integration_tests;

use std::collections::{BTreeMap, HashMap};

pub use try_getable::{TryGetable, ValueExtractionError};
pub use types::ValueType;

/// A single column value inside a row snapshot.
///
/// `Null` is the "null/unset" representation. A column that is missing from a
/// snapshot is a different state altogether and is never modelled as `Null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL NULL, or an explicitly unset value
    #[default]
    Null,
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// Unsigned 64-bit integer
    UInt(u64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 text (also used for temporal, decimal and enum values)
    Text(String),
    /// Raw bytes (binary, blob and bit columns)
    Bytes(Vec<u8>),
    /// Decoded JSON array
    List(Vec<Value>),
    /// Decoded JSON object
    Map(BTreeMap<String, Value>),
}

/// Shared null used when an accessor needs to hand out a reference to "no value".
pub static NULL: Value = Value::Null;

/// A row snapshot: column name to value.
pub type Row = HashMap<String, Value>;

impl Value {
    /// Returns `true` for the null/unset representation.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the stored variant, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::UInt(_) => "UInt",
            Value::Float(_) => "Float",
            Value::Text(_) => "Text",
            Value::Bytes(_) => "Bytes",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }

    /// Borrow the text payload, if this is a `Text` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    /// Formats the canonical text form (see [`conv::to_text`]).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&conv::to_text(self))
    }
}
