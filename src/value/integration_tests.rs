//! Integration tests for the value type system
//!
//! These tests verify that the conversion traits, the strict extractors and
//! the lenient coercions agree with each other.

use super::*;
use crate::json_helpers::decode_json;

// Integration: ValueType + TryGetable

#[test]
fn test_value_type_to_try_getable_roundtrip() {
    let value = 42i32.into_value();
    let extracted: Result<i32, _> = TryGetable::try_get(&value);
    assert_eq!(extracted, Ok(42));
}

#[test]
fn test_option_none_to_try_getable() {
    let value = Value::from(None::<String>);
    let extracted: Result<Option<String>, _> = TryGetable::try_get(&value);
    assert_eq!(extracted, Ok(None));
}

// Integration: strict extraction vs lenient coercion

#[test]
fn test_strict_rejects_what_coercion_accepts() {
    let value = Value::Text("17".into());
    let strict: Result<i64, _> = TryGetable::try_get(&value);
    assert!(matches!(strict, Err(ValueExtractionError::TypeMismatch { .. })));
    assert_eq!(conv::to_i64(&value), 17);
}

#[test]
fn test_temporal_text_roundtrip_through_coercion() {
    let date = chrono::NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    let value = Value::from(date);
    assert_eq!(conv::to_text(&value), "2023-12-31");
    let back: Result<chrono::NaiveDate, _> = TryGetable::try_get(&value);
    assert_eq!(back, Ok(date));
}

// Integration: JSON decode + Display

#[test]
fn test_decoded_json_displays_canonically() {
    let value = decode_json(r#"{ "b": 1, "a": [true] }"#).unwrap();
    assert_eq!(value.to_string(), r#"{"a":[true],"b":1}"#);
}

#[test]
fn test_decoded_json_to_serde_json_value() {
    let value = decode_json(r#"[1, "two"]"#).unwrap();
    let json: Result<serde_json::Value, _> = TryGetable::try_get(&value);
    assert_eq!(json, Ok(serde_json::json!([1, "two"])));
}
