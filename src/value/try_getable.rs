//! TryGetable trait for safe value extraction
//!
//! Strict, error-aware extraction of typed values from a snapshot [`Value`].
//! Where [`crate::value::conv`] always produces *something*, `TryGetable`
//! tells the caller exactly why a value could not be read.

use super::{Value, ValueType};

/// Error type for value extraction failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueExtractionError {
    /// The value is null
    NullValue,
    /// The value variant doesn't match the expected type
    TypeMismatch {
        expected: String,
        actual: String,
    },
    /// Value conversion failed (e.g., integer overflow)
    ConversionError(String),
}

impl std::fmt::Display for ValueExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueExtractionError::NullValue => write!(f, "Value is null"),
            ValueExtractionError::TypeMismatch { expected, actual } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, actual)
            }
            ValueExtractionError::ConversionError(msg) => {
                write!(f, "Conversion error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValueExtractionError {}

/// Trait for safe value extraction with error handling
///
/// ## Usage
///
/// ```rust
/// use rowguard::{TryGetable, Value, ValueExtractionError};
///
/// let result: Result<i32, _> = TryGetable::try_get(&Value::Int(42));
/// assert_eq!(result, Ok(42));
///
/// let result: Result<i32, _> = TryGetable::try_get(&Value::Null);
/// assert!(matches!(result, Err(ValueExtractionError::NullValue)));
/// ```
pub trait TryGetable: Sized {
    /// Try to extract a value, returning an error if extraction fails.
    ///
    /// Returns:
    /// - `Ok(T)` if the value matches the expected type and is not null
    /// - `Err(ValueExtractionError::NullValue)` if the value is null
    /// - `Err(ValueExtractionError::TypeMismatch)` if the variant doesn't match
    /// - `Err(ValueExtractionError::ConversionError)` if conversion fails (e.g., overflow)
    fn try_get(value: &Value) -> Result<Self, ValueExtractionError>;

    /// Try to extract a value, allowing null values to return `None`.
    fn try_get_opt(value: &Value) -> Result<Option<Self>, ValueExtractionError> {
        match Self::try_get(value) {
            Ok(v) => Ok(Some(v)),
            Err(ValueExtractionError::NullValue) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn mismatch<T: ValueType>(value: &Value) -> ValueExtractionError {
    ValueExtractionError::TypeMismatch {
        expected: T::TYPE_NAME.to_string(),
        actual: format!("{:?}", value),
    }
}

fn overflow(value: impl std::fmt::Display, target: &str) -> ValueExtractionError {
    ValueExtractionError::ConversionError(format!("value {} overflows {}", value, target))
}

macro_rules! impl_try_getable_int {
    ($($type:ty),*) => {
        $(
            impl TryGetable for $type {
                fn try_get(value: &Value) -> Result<Self, ValueExtractionError> {
                    match value {
                        Value::Null => Err(ValueExtractionError::NullValue),
                        Value::Int(v) => {
                            <$type>::try_from(*v).map_err(|_| overflow(v, stringify!($type)))
                        }
                        Value::UInt(v) => {
                            <$type>::try_from(*v).map_err(|_| overflow(v, stringify!($type)))
                        }
                        _ => Err(mismatch::<$type>(value)),
                    }
                }
            }
        )*
    };
}

impl_try_getable_int!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_try_getable {
    ($($type:ty),*) => {
        $(
            impl TryGetable for $type {
                fn try_get(value: &Value) -> Result<Self, ValueExtractionError> {
                    if value.is_null() {
                        return Err(ValueExtractionError::NullValue);
                    }
                    <$type as ValueType>::from_value(value).ok_or_else(|| mismatch::<$type>(value))
                }
            }
        )*
    };
}

impl_try_getable!(
    bool,
    f64,
    String,
    Vec<u8>,
    chrono::NaiveDateTime,
    chrono::NaiveDate,
    chrono::NaiveTime,
    rust_decimal::Decimal,
    uuid::Uuid
);

impl TryGetable for serde_json::Value {
    fn try_get(value: &Value) -> Result<Self, ValueExtractionError> {
        if value.is_null() {
            return Err(ValueExtractionError::NullValue);
        }
        Ok(crate::json_helpers::to_json(value))
    }
}

impl<T: TryGetable> TryGetable for Option<T> {
    fn try_get(value: &Value) -> Result<Self, ValueExtractionError> {
        T::try_get_opt(value)
    }
}
