//! Total value coercions
//!
//! Every function here accepts any [`Value`] and always returns a result. An
//! input that cannot be interpreted falls back to the zero value of the target
//! (`0`, `0.0`, `""`, `false`, empty bytes). The comparators and mutators rely
//! on this: coercing a column value must never abort event processing.
//!
//! | Target     | `Null` | unparseable text | list / map            |
//! |------------|--------|------------------|-----------------------|
//! | `to_i64`   | `0`    | `0`              | `0`                   |
//! | `to_u64`   | `0`    | `0`              | `0`                   |
//! | `to_f64`   | `0.0`  | `0.0`            | `0.0`                 |
//! | `to_text`  | `""`   | (text itself)    | compact JSON          |
//! | `to_bool`  | `false`| `false`          | `true` when non-empty |
//! | `to_bytes` | empty  | (UTF-8 bytes)    | compact JSON bytes    |

use super::Value;

/// Coerce to a signed 64-bit integer.
///
/// Unsigned values above `i64::MAX` saturate to `i64::MAX` rather than wrapping,
/// so a signed comparison never mistakes a large unsigned value for a negative one.
/// Floats truncate toward zero.
#[must_use]
pub fn to_i64(value: &Value) -> i64 {
    match value {
        Value::Null | Value::List(_) | Value::Map(_) => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Int(v) => *v,
        Value::UInt(v) => i64::try_from(*v).unwrap_or(i64::MAX),
        #[allow(clippy::cast_possible_truncation)]
        Value::Float(f) => *f as i64,
        Value::Text(s) => parse_i64(s),
        Value::Bytes(b) => std::str::from_utf8(b).map_or(0, parse_i64),
    }
}

/// Coerce to an unsigned 64-bit integer.
///
/// Negative signed values are reinterpreted in two's complement (`-1` becomes
/// `u64::MAX`). Replication decoders commonly emit an UNSIGNED BIGINT column as
/// its signed bit pattern, and this recovers the stored value.
#[must_use]
pub fn to_u64(value: &Value) -> u64 {
    match value {
        Value::Null | Value::List(_) | Value::Map(_) => 0,
        Value::Bool(b) => u64::from(*b),
        #[allow(clippy::cast_sign_loss)]
        Value::Int(v) => *v as u64,
        Value::UInt(v) => *v,
        Value::Float(f) => float_to_u64(*f),
        Value::Text(s) => parse_u64(s),
        Value::Bytes(b) => std::str::from_utf8(b).map_or(0, parse_u64),
    }
}

/// Coerce to a 64-bit float.
#[must_use]
pub fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Null | Value::List(_) | Value::Map(_) => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        #[allow(clippy::cast_precision_loss)]
        Value::Int(v) => *v as f64,
        #[allow(clippy::cast_precision_loss)]
        Value::UInt(v) => *v as f64,
        Value::Float(f) => *f,
        Value::Text(s) => parse_f64(s),
        Value::Bytes(b) => std::str::from_utf8(b).map_or(0.0, parse_f64),
    }
}

/// Coerce to canonical text.
///
/// Bytes are decoded as UTF-8 (lossy), so two distinct invalid sequences can
/// render the same; exact comparisons go through [`to_bytes`] instead. Lists and maps render as compact JSON
/// with object keys in sorted order, so equal structures render identically.
#[must_use]
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        Value::List(_) | Value::Map(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Coerce to a boolean.
///
/// Text is true when it reads as `1`, `t`, `true`, `y`, `yes` or `on`
/// (case-insensitive), or as a non-zero number.
#[must_use]
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(v) => *v != 0,
        Value::UInt(v) => *v != 0,
        Value::Float(f) => *f != 0.0 && !f.is_nan(),
        Value::Text(s) => parse_bool(s),
        Value::Bytes(b) => std::str::from_utf8(b).is_ok_and(parse_bool),
        Value::List(items) => !items.is_empty(),
        Value::Map(entries) => !entries.is_empty(),
    }
}

/// Coerce to raw bytes.
#[must_use]
pub fn to_bytes(value: &Value) -> Vec<u8> {
    match value {
        Value::Null => Vec::new(),
        Value::Bytes(b) => b.clone(),
        Value::Text(s) => s.as_bytes().to_vec(),
        other => to_text(other).into_bytes(),
    }
}

fn parse_i64(s: &str) -> i64 {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return v;
    }
    if let Ok(v) = s.parse::<u64>() {
        return i64::try_from(v).unwrap_or(i64::MAX);
    }
    match s.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation)]
        Ok(f) if f.is_finite() => f as i64,
        _ => 0,
    }
}

#[allow(clippy::cast_sign_loss)]
fn parse_u64(s: &str) -> u64 {
    let s = s.trim();
    if let Ok(v) = s.parse::<u64>() {
        return v;
    }
    if let Ok(v) = s.parse::<i64>() {
        return v as u64;
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => float_to_u64(f),
        _ => 0,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_u64(f: f64) -> u64 {
    if f < 0.0 {
        // Same two's complement reinterpretation as a negative Int.
        (f as i64) as u64
    } else {
        f as u64
    }
}

fn parse_f64(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

fn parse_bool(s: &str) -> bool {
    let s = s.trim();
    if ["1", "t", "true", "y", "yes", "on"]
        .iter()
        .any(|t| s.eq_ignore_ascii_case(t))
    {
        return true;
    }
    s.parse::<f64>().is_ok_and(|f| f != 0.0 && !f.is_nan())
}
