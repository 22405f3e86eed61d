//! Type-aware emptiness and equality.
//!
//! Both predicates take the column's logical [`ColumnType`] and dispatch on it.
//! The stored `Value` variant only matters after that choice has been made,
//! through the coercions in [`crate::value::conv`]. Both are total.

use crate::schema::ColumnType;
use crate::value::{conv, Value};

/// Whether `value` counts as empty for a column of type `column_type`.
///
/// - `Null` is empty for every type.
/// - Integer, medium-int, float and decimal columns: the literal zero
///   (`Int(0)`, `UInt(0)`, `Float(0.0)`) is empty.
/// - String, temporal, enum, set, binary, bit and JSON columns: empty text or a
///   zero-length byte sequence is empty.
/// - Anything else is not empty, including numeric text such as `"0"` in an
///   integer column and every non-null point value.
///
/// # Example
///
/// ```rust
/// use rowguard::{compare::is_empty, ColumnType, Value};
///
/// assert!(is_empty(ColumnType::Integer, &Value::Int(0)));
/// assert!(!is_empty(ColumnType::Integer, &Value::Int(5)));
/// assert!(is_empty(ColumnType::String, &Value::Text(String::new())));
/// assert!(is_empty(ColumnType::Json, &Value::Null));
/// ```
#[must_use]
pub fn is_empty(column_type: ColumnType, value: &Value) -> bool {
    if value.is_null() {
        return true;
    }
    match column_type {
        ColumnType::Integer | ColumnType::MediumInt | ColumnType::Float | ColumnType::Decimal => {
            matches!(value, Value::Int(0) | Value::UInt(0))
                || matches!(value, Value::Float(f) if *f == 0.0)
        }
        ColumnType::String
        | ColumnType::DateTime
        | ColumnType::Timestamp
        | ColumnType::Date
        | ColumnType::Time
        | ColumnType::Enum
        | ColumnType::Set
        | ColumnType::Binary
        | ColumnType::Bit
        | ColumnType::Json => match value {
            Value::Text(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            _ => false,
        },
        ColumnType::Point => false,
    }
}

/// Whether two values are equal for a column of type `column_type`.
///
/// `Null` equals only `Null`. Otherwise:
///
/// - Integer and medium-int: both sides coerced to `u64` when `is_unsigned`,
///   to `i64` otherwise. `is_unsigned` must come from column metadata. Under
///   signed comparison every value above `i64::MAX` saturates to `i64::MAX`,
///   so such values only compare exactly on an unsigned column.
/// - Float and decimal: coerced to `f64`. NaN equals NaN.
/// - String, temporal, enum, set and JSON: coerced to canonical text and
///   compared byte for byte. Bytes that are not valid UTF-8 are compared raw.
/// - Binary and bit: compared as raw bytes.
/// - Point: always equal. Spatial comparison is not implemented.
///
/// # Example
///
/// ```rust
/// use rowguard::{compare::is_equal, ColumnType, Value};
///
/// // An unsigned BIGINT captured as its signed bit pattern.
/// let captured = Value::Int(-1);
/// let expected = Value::UInt(u64::MAX);
/// assert!(is_equal(ColumnType::Integer, true, &captured, &expected));
/// assert!(!is_equal(ColumnType::Integer, false, &captured, &expected));
///
/// assert!(is_equal(ColumnType::Decimal, false, &Value::Text("1.50".into()), &Value::Float(1.5)));
/// ```
#[must_use]
pub fn is_equal(column_type: ColumnType, is_unsigned: bool, v1: &Value, v2: &Value) -> bool {
    match (v1.is_null(), v2.is_null()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }

    match column_type {
        ColumnType::Integer | ColumnType::MediumInt => {
            if is_unsigned {
                conv::to_u64(v1) == conv::to_u64(v2)
            } else {
                conv::to_i64(v1) == conv::to_i64(v2)
            }
        }
        ColumnType::Float | ColumnType::Decimal => {
            let (a, b) = (conv::to_f64(v1), conv::to_f64(v2));
            a == b || (a.is_nan() && b.is_nan())
        }
        ColumnType::String
        | ColumnType::DateTime
        | ColumnType::Timestamp
        | ColumnType::Date
        | ColumnType::Time
        | ColumnType::Enum
        | ColumnType::Set
        | ColumnType::Json
        | ColumnType::Binary
        | ColumnType::Bit => conv::to_bytes(v1) == conv::to_bytes(v2),
        // Spatial values are not compared.
        ColumnType::Point => true,
    }
}
