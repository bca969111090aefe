//! Purpose: Absent-aware read view over JSON trees plus typed soft-fail coercion.
//! Exports: `JsonRef`, `FromJson`, `ToJson`.
//! Role: The only way mapping code reads incoming JSON; all lookups go through here.
//! Invariants: Lookups never fail; a missing key or wrong-shaped node is `Absent`.
//! Invariants: `Absent` is distinct from an explicit `null`.
//! Invariants: Coercion mismatches collapse to `None`, the same outcome as `Absent`.

use crate::core::date::DateCodec;
use serde_json::{Map, Value};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JsonRef<'a> {
    Present(&'a Value),
    Absent,
}

impl<'a> JsonRef<'a> {
    pub fn get(self, key: &str) -> JsonRef<'a> {
        match self {
            JsonRef::Present(Value::Object(map)) => map.get(key).into(),
            _ => JsonRef::Absent,
        }
    }

    pub fn at(self, index: usize) -> JsonRef<'a> {
        match self {
            JsonRef::Present(Value::Array(items)) => items.get(index).into(),
            _ => JsonRef::Absent,
        }
    }

    pub fn value(self) -> Option<&'a Value> {
        match self {
            JsonRef::Present(value) => Some(value),
            JsonRef::Absent => None,
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, JsonRef::Absent)
    }

    pub fn is_null(self) -> bool {
        matches!(self, JsonRef::Present(Value::Null))
    }

    pub fn as_object(self) -> Option<&'a Map<String, Value>> {
        self.value().and_then(Value::as_object)
    }

    pub fn as_array(self) -> Option<&'a Vec<Value>> {
        self.value().and_then(Value::as_array)
    }

    pub fn coerce<T: FromJson>(self) -> Option<T> {
        T::from_json(self)
    }

    pub fn to_owned_value(self) -> Option<Value> {
        self.value().cloned()
    }
}

impl<'a> From<&'a Value> for JsonRef<'a> {
    fn from(value: &'a Value) -> Self {
        JsonRef::Present(value)
    }
}

impl<'a> From<Option<&'a Value>> for JsonRef<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        match value {
            Some(value) => JsonRef::Present(value),
            None => JsonRef::Absent,
        }
    }
}

/// Typed coercion out of a JSON node. `None` means "leave the attribute alone".
pub trait FromJson: Sized {
    /// Set for types that go through the shared date codec.
    const TEMPORAL: bool = false;

    fn from_json(node: JsonRef<'_>) -> Option<Self>;
}

pub trait ToJson {
    fn to_json(&self) -> Value;
}

impl FromJson for String {
    fn from_json(node: JsonRef<'_>) -> Option<Self> {
        node.value().and_then(Value::as_str).map(str::to_string)
    }
}

impl FromJson for bool {
    fn from_json(node: JsonRef<'_>) -> Option<Self> {
        node.value().and_then(Value::as_bool)
    }
}

impl FromJson for i64 {
    fn from_json(node: JsonRef<'_>) -> Option<Self> {
        node.value().and_then(Value::as_i64)
    }
}

impl FromJson for u64 {
    fn from_json(node: JsonRef<'_>) -> Option<Self> {
        node.value().and_then(Value::as_u64)
    }
}

impl FromJson for f64 {
    fn from_json(node: JsonRef<'_>) -> Option<Self> {
        node.value().and_then(Value::as_f64)
    }
}

impl FromJson for OffsetDateTime {
    const TEMPORAL: bool = true;

    fn from_json(node: JsonRef<'_>) -> Option<Self> {
        node.value()
            .and_then(Value::as_str)
            .and_then(|text| DateCodec::shared().parse(text))
    }
}

impl<T: FromJson> FromJson for Option<T> {
    const TEMPORAL: bool = T::TEMPORAL;

    fn from_json(node: JsonRef<'_>) -> Option<Self> {
        if node.is_null() {
            return Some(None);
        }
        T::from_json(node).map(Some)
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    const TEMPORAL: bool = T::TEMPORAL;

    fn from_json(node: JsonRef<'_>) -> Option<Self> {
        node.as_array()?
            .iter()
            .map(|item| T::from_json(JsonRef::Present(item)))
            .collect()
    }
}

impl ToJson for String {
    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToJson for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToJson for i64 {
    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

impl ToJson for u64 {
    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

impl ToJson for f64 {
    // Non-finite floats have no JSON form and serialize as null.
    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

impl ToJson for OffsetDateTime {
    fn to_json(&self) -> Value {
        DateCodec::shared()
            .format(*self)
            .map_or(Value::Null, Value::String)
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self) -> Value {
        match self {
            Some(value) => value.to_json(),
            None => Value::Null,
        }
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(ToJson::to_json).collect())
    }
}
