//! ValueType trait for type-safe value conversions
//!
//! The `ValueType` trait maps Rust types to their corresponding [`Value`] variant.
//! Handlers use it to write typed values into a snapshot and to read them back
//! without matching on `Value` by hand.
//!
//! ## Usage
//!
//! ```rust
//! use rowguard::{Value, ValueType};
//!
//! let value = 42i64.into_value();
//! assert_eq!(value, Value::Int(42));
//! assert_eq!(i64::from_value(&value), Some(42));
//! ```
//!
//! ## Canonical text
//!
//! Temporal, decimal and UUID types have no dedicated variant. They are stored
//! as `Value::Text` in the same canonical form the replication source emits
//! (`YYYY-MM-DD hh:mm:ss[.ffffff]` for datetimes), so that text comparison of a
//! rewritten value against a captured one behaves.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::Value;

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Trait for mapping Rust types to their corresponding [`Value`] variant.
///
/// `from_value` is strict: it returns `None` when the stored variant does not
/// match, or when an integer does not fit the target width. For lenient,
/// never-failing coercion use [`crate::value::conv`] instead.
pub trait ValueType: Sized {
    /// Name reported in extraction errors.
    const TYPE_NAME: &'static str;

    /// Convert this value into a [`Value`].
    fn into_value(self) -> Value;

    /// Convert a [`Value`] into this type, if the variant matches.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_value_type_signed {
    ($($type:ty),*) => {
        $(
            impl ValueType for $type {
                const TYPE_NAME: &'static str = stringify!($type);

                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => <$type>::try_from(*v).ok(),
                        Value::UInt(v) => <$type>::try_from(*v).ok(),
                        _ => None,
                    }
                }
            }

            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    v.into_value()
                }
            }
        )*
    };
}

macro_rules! impl_value_type_unsigned {
    ($($type:ty),*) => {
        $(
            impl ValueType for $type {
                const TYPE_NAME: &'static str = stringify!($type);

                fn into_value(self) -> Value {
                    Value::UInt(u64::from(self))
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::UInt(v) => <$type>::try_from(*v).ok(),
                        Value::Int(v) => <$type>::try_from(*v).ok(),
                        _ => None,
                    }
                }
            }

            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    v.into_value()
                }
            }
        )*
    };
}

impl_value_type_signed!(i8, i16, i32, i64);
impl_value_type_unsigned!(u8, u16, u32, u64);

impl ValueType for bool {
    const TYPE_NAME: &'static str = "bool";

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl ValueType for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(v) => Some(*v as f64),
            #[allow(clippy::cast_precision_loss)]
            Value::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl ValueType for String {
    const TYPE_NAME: &'static str = "String";

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl ValueType for Vec<u8> {
    const TYPE_NAME: &'static str = "Vec<u8>";

    fn into_value(self) -> Value {
        Value::Bytes(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b.clone()),
            _ => None,
        }
    }
}

impl ValueType for NaiveDateTime {
    const TYPE_NAME: &'static str = "NaiveDateTime";

    fn into_value(self) -> Value {
        Value::Text(self.format(DATETIME_FORMAT).to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        NaiveDateTime::parse_from_str(value.as_str()?, DATETIME_FORMAT).ok()
    }
}

impl ValueType for NaiveDate {
    const TYPE_NAME: &'static str = "NaiveDate";

    fn into_value(self) -> Value {
        Value::Text(self.format(DATE_FORMAT).to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        NaiveDate::parse_from_str(value.as_str()?, DATE_FORMAT).ok()
    }
}

impl ValueType for NaiveTime {
    const TYPE_NAME: &'static str = "NaiveTime";

    fn into_value(self) -> Value {
        Value::Text(self.format(TIME_FORMAT).to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        NaiveTime::parse_from_str(value.as_str()?, TIME_FORMAT).ok()
    }
}

impl ValueType for Decimal {
    const TYPE_NAME: &'static str = "Decimal";

    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str()?.trim().parse().ok()
    }
}

impl ValueType for Uuid {
    const TYPE_NAME: &'static str = "Uuid";

    fn into_value(self) -> Value {
        Value::Text(self.hyphenated().to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Uuid::parse_str(s).ok(),
            Value::Bytes(b) => Uuid::from_slice(b).ok(),
            _ => None,
        }
    }
}

macro_rules! impl_from_via_value_type {
    ($($type:ty),*) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    v.into_value()
                }
            }
        )*
    };
}

impl_from_via_value_type!(bool, f64, String, Vec<u8>, NaiveDateTime, NaiveDate, NaiveTime, Decimal, Uuid);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        v.naive_utc().into_value()
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
