//! JSON serialization/deserialization helpers for rowguard
//!
//! This module gives [`Value`] its serde representation and provides the
//! structured-decode utility used by `RowEvent::set_value_as_decode_json`.
//!
//! Floating-point values that JSON cannot express (NaN, Infinity, -Infinity)
//! are written as the strings `"NaN"`, `"Infinity"` and `"-Infinity"` so that a
//! forwarded event never fails to serialize.
//!
//! [`Value::Bytes`] is written as a single-key object `{"$bytes": "<base64>"}`
//! and read back as bytes, so BLOB and BIT columns keep their variant when an
//! event is forwarded. [`decode_json`] does not apply this rule: a JSON column
//! holding such an object decodes to a plain map.

use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Decode JSON text into a nested [`Value`].
///
/// Objects become [`Value::Map`], arrays [`Value::List`]. Non-negative integers
/// that fit in `i64` decode as [`Value::Int`]; larger ones as [`Value::UInt`].
///
/// # Errors
///
/// Returns the underlying `serde_json::Error` for malformed input.
///
/// # Examples
///
/// ```rust
/// use rowguard::{json_helpers::decode_json, Value};
///
/// let value = decode_json(r#"{"tags":["a","b"],"n":3}"#).unwrap();
/// assert!(matches!(value, Value::Map(_)));
/// assert!(decode_json("{not json").is_err());
/// ```
pub fn decode_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str::<serde_json::Value>(text).map(Value::from)
}

/// Key of the single-entry object that carries base64-encoded bytes.
pub const BYTES_TAG: &str = "$bytes";

/// Convert a [`Value`] into a `serde_json::Value`.
///
/// Bytes become a `{"$bytes": "<base64>"}` object and non-finite floats become
/// their string names, matching the `Serialize` impl.
#[must_use]
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(v) => serde_json::Value::from(*v),
        Value::UInt(v) => serde_json::Value::from(*v),
        Value::Float(f) => match serde_json::Number::from_f64(*f) {
            Some(n) => serde_json::Value::Number(n),
            None => serde_json::Value::String(non_finite_name(*f).to_string()),
        },
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(b) => {
            let mut tagged = serde_json::Map::new();
            tagged.insert(
                BYTES_TAG.to_string(),
                serde_json::Value::String(general_purpose::STANDARD.encode(b)),
            );
            serde_json::Value::Object(tagged)
        }
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Value::Int(v)
                } else if let Some(v) = n.as_u64() {
                    Value::UInt(v)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

fn non_finite_name(f: f64) -> &'static str {
    if f.is_nan() {
        "NaN"
    } else if f.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::UInt(v) => serializer.serialize_u64(*v),
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Value::Float(f) => serializer.serialize_str(non_finite_name(*f)),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(b) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(BYTES_TAG, &general_purpose::STANDARD.encode(b))?;
                map.end()
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON-compatible value")
    }

    fn visit_unit<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E>(self, value: bool) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Int(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(i64::try_from(value).map_or(Value::UInt(value), Value::Int))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Float(value))
    }

    fn visit_str<E>(self, value: &str) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Text(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Text(value))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Bytes(value.to_vec()))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((k, v)) = map.next_entry::<String, Value>()? {
            entries.insert(k, v);
        }
        Ok(untag_bytes(entries))
    }
}

/// Turn a `{"$bytes": "<base64>"}` map back into [`Value::Bytes`].
///
/// Any other map, including one whose tag value is not valid base64, stays a map.
fn untag_bytes(entries: BTreeMap<String, Value>) -> Value {
    if entries.len() == 1 {
        if let Some(Value::Text(encoded)) = entries.get(BYTES_TAG) {
            if let Ok(bytes) = general_purpose::STANDARD.decode(encoded) {
                return Value::Bytes(bytes);
            }
        }
    }
    Value::Map(entries)
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}
