//! Lenient serde adapters for backend fields whose JSON type drifts.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Text enums that travel as plain strings, with `""` meaning "not set".
pub trait WireText: Sized {
    /// Parses a wire value. Empty input yields `None`.
    fn from_wire(raw: &str) -> Option<Self>;
    fn as_wire(&self) -> &str;
}

/// `Option<T: WireText>` <-> string. `None` is sent as `""`.
pub mod optional_text {
    use super::{Deserialize, Deserializer, Serializer, Value, WireText};

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: WireText,
    {
        serializer.serialize_str(value.as_ref().map_or("", WireText::as_wire))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: WireText,
    {
        match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Ok(T::from_wire(&s)),
            _ => Ok(None),
        }
    }
}

/// Venom flag: accepts booleans, numbers and `"0"`/`"1"`/`"true"`; sent as `0`/`1`.
pub mod venom_flag {
    use super::{Deserialize, Deserializer, Serializer, Value};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
            _ => false,
        })
    }
}

/// Free text that may arrive as `null` or a number.
///
/// A number is kept as its JSON text and the field is always serialized as a
/// string, so a record read with `"size": 150` is sent back as `"size": "150"`.
/// `null` becomes `""`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

/// Backend identifiers: a plain string or a Mongo-style `{"$oid": "..."}`.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Object(map)) => map
            .get("$oid")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        _ => None,
    })
}
