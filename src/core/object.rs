//! Purpose: Model Object Contract (construct, re-map, serialize) and its type-erased view.
//! Exports: `ModelObject`, `MappedObject`, `ModelObjectFactory`.
//! Role: The sole surface booking entities implement to interoperate with JSON callers.
//! Invariants: `map` only assigns keys present in the input; omitted keys keep prior values.
//! Invariants: `to_json` emits every Field Map key, in Field Map order.
//! Invariants: Factories carry the constructor as data; callers never name the type.

use crate::core::error::{Error, ErrorKind};
use crate::core::field_map::FieldMap;
use crate::core::json::JsonRef;
use serde_json::Value;
use std::any::Any;
use std::fmt;

pub trait ModelObject: Default + Send + Sync + 'static {
    const TYPE_NAME: &'static str;

    fn field_map() -> &'static FieldMap<Self>;

    fn construct(json: &Value) -> Self {
        let mut object = Self::default();
        object.map(json);
        object
    }

    fn map(&mut self, json: &Value) {
        let assigned = Self::field_map().apply(self, JsonRef::from(json));
        tracing::trace!(type_name = Self::TYPE_NAME, assigned, "mapped json");
    }

    fn to_json(&self) -> Value {
        Self::field_map().serialize(self)
    }

    fn attribute_value(&self, attribute: &str) -> Option<Value> {
        Self::field_map().read(self, attribute)
    }

    /// Builds one object per object element; anything else in the array is skipped.
    fn construct_array(json: &Value) -> Vec<Self> {
        let Some(items) = json.as_array() else {
            return Vec::new();
        };
        items
            .iter()
            .filter(|item| item.is_object())
            .map(Self::construct)
            .collect()
    }

    fn from_json_str(input: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(input).map_err(|err| {
            Error::new(ErrorKind::Parse)
                .with_message(format!("invalid {} json", Self::TYPE_NAME))
                .with_source(err)
        })?;
        Ok(Self::construct(&value))
    }
}

/// Object-safe view of a model object whose concrete type is only known to its factory.
pub trait MappedObject: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn map(&mut self, json: &Value);

    fn to_json(&self) -> Value;

    fn attribute_value(&self, attribute: &str) -> Option<Value>;

    /// Attribute value held by a freshly allocated, never mapped instance.
    fn default_attribute_value(&self, attribute: &str) -> Option<Value>;

    fn normalize_attribute(&self, attribute: &str, node: JsonRef<'_>) -> Option<Value>;

    fn field_pairs(&self) -> Vec<(&'static str, &'static str)>;

    fn has_temporal_fields(&self) -> bool;

    /// JSON keys whose attributes go through the date codec.
    fn temporal_keys(&self) -> Vec<&'static str>;

    fn validate_field_map(&self) -> Result<(), Error>;

    fn as_any(&self) -> &dyn Any;
}

struct Erased<E>(E);

impl<E: ModelObject> MappedObject for Erased<E> {
    fn type_name(&self) -> &'static str {
        E::TYPE_NAME
    }

    fn map(&mut self, json: &Value) {
        self.0.map(json);
    }

    fn to_json(&self) -> Value {
        self.0.to_json()
    }

    fn attribute_value(&self, attribute: &str) -> Option<Value> {
        self.0.attribute_value(attribute)
    }

    fn default_attribute_value(&self, attribute: &str) -> Option<Value> {
        E::default().attribute_value(attribute)
    }

    fn normalize_attribute(&self, attribute: &str, node: JsonRef<'_>) -> Option<Value> {
        E::field_map().normalize(attribute, node)
    }

    fn field_pairs(&self) -> Vec<(&'static str, &'static str)> {
        E::field_map().pairs()
    }

    fn has_temporal_fields(&self) -> bool {
        E::field_map().has_temporal_fields()
    }

    fn temporal_keys(&self) -> Vec<&'static str> {
        E::field_map().temporal_keys()
    }

    fn validate_field_map(&self) -> Result<(), Error> {
        E::field_map()
            .validate()
            .map_err(|err| err.with_case(E::TYPE_NAME))
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }
}

#[derive(Clone, Copy)]
pub struct ModelObjectFactory {
    type_name: &'static str,
    construct: fn(&Value) -> Box<dyn MappedObject>,
    produces: fn(&dyn MappedObject) -> bool,
}

impl ModelObjectFactory {
    pub fn of<E: ModelObject>() -> Self {
        Self {
            type_name: E::TYPE_NAME,
            construct: construct_erased::<E>,
            produces: produces_type::<E>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn construct(&self, json: &Value) -> Box<dyn MappedObject> {
        (self.construct)(json)
    }

    pub fn construct_array(&self, json: &Value) -> Vec<Box<dyn MappedObject>> {
        let Some(items) = json.as_array() else {
            return Vec::new();
        };
        items
            .iter()
            .filter(|item| item.is_object())
            .map(|item| self.construct(item))
            .collect()
    }

    /// True when `object` is an instance of the type this factory builds.
    pub fn produced(&self, object: &dyn MappedObject) -> bool {
        (self.produces)(object)
    }
}

impl fmt::Debug for ModelObjectFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelObjectFactory")
            .field("type_name", &self.type_name)
            .finish()
    }
}

fn construct_erased<E: ModelObject>(json: &Value) -> Box<dyn MappedObject> {
    Box::new(Erased(E::construct(json)))
}

fn produces_type<E: ModelObject>(object: &dyn MappedObject) -> bool {
    object.as_any().is::<E>()
}
