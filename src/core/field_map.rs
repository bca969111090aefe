//! Purpose: Declarative per-type table pairing JSON keys with typed attribute accessors.
//! Exports: `FieldMap`, `FieldMapBuilder`, `Field`.
//! Role: Drives both mapping directions so decode and encode cannot drift apart.
//! Invariants: Field order is declaration order; serialization follows it.
//! Invariants: JSON keys are unique and attribute names are unique within one map.
//! Invariants: A field whose node is absent or not coercible is left unchanged.
//! Notes: Maps are built once per type (see `ModelObject::field_map`) and never mutated.

use crate::core::error::{Error, ErrorKind};
use crate::core::json::{FromJson, JsonRef, ToJson};
use crate::core::object::ModelObject;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

type Reader<E> = Box<dyn Fn(&E) -> Value + Send + Sync>;
type Writer<E> = Box<dyn Fn(&mut E, JsonRef<'_>) -> bool + Send + Sync>;
type Normalizer = Box<dyn Fn(JsonRef<'_>) -> Option<Value> + Send + Sync>;

pub struct Field<E> {
    json_key: &'static str,
    attribute: &'static str,
    temporal: bool,
    read: Reader<E>,
    write: Writer<E>,
    normalize: Normalizer,
}

impl<E> Field<E> {
    pub fn json_key(&self) -> &'static str {
        self.json_key
    }

    pub fn attribute(&self) -> &'static str {
        self.attribute
    }

    pub fn is_temporal(&self) -> bool {
        self.temporal
    }
}

impl<E> fmt::Debug for Field<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("json_key", &self.json_key)
            .field("attribute", &self.attribute)
            .field("temporal", &self.temporal)
            .finish()
    }
}

pub struct FieldMap<E> {
    fields: Vec<Field<E>>,
}

impl<E: 'static> FieldMap<E> {
    pub fn builder() -> FieldMapBuilder<E> {
        FieldMapBuilder { fields: Vec::new() }
    }
}

impl<E> FieldMap<E> {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field<E>] {
        &self.fields
    }

    /// `(json_key, attribute)` pairs in declaration order.
    pub fn pairs(&self) -> Vec<(&'static str, &'static str)> {
        self.fields
            .iter()
            .map(|field| (field.json_key, field.attribute))
            .collect()
    }

    pub fn has_temporal_fields(&self) -> bool {
        self.fields.iter().any(|field| field.temporal)
    }

    pub fn temporal_keys(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.temporal)
            .map(|field| field.json_key)
            .collect()
    }

    pub fn field_for_key(&self, json_key: &str) -> Option<&Field<E>> {
        self.fields.iter().find(|field| field.json_key == json_key)
    }

    pub fn field_for_attribute(&self, attribute: &str) -> Option<&Field<E>> {
        self.fields.iter().find(|field| field.attribute == attribute)
    }

    /// Assigns every present, coercible key; returns how many attributes changed hands.
    pub fn apply(&self, entity: &mut E, json: JsonRef<'_>) -> usize {
        let mut assigned = 0;
        for field in &self.fields {
            let node = json.get(field.json_key);
            if node.is_absent() {
                tracing::trace!(json_key = field.json_key, "key absent; attribute unchanged");
                continue;
            }
            if (field.write)(entity, node) {
                assigned += 1;
            } else {
                tracing::trace!(
                    json_key = field.json_key,
                    attribute = field.attribute,
                    "value not coercible; attribute unchanged"
                );
            }
        }
        assigned
    }

    pub fn serialize(&self, entity: &E) -> Value {
        let mut map = Map::new();
        for field in &self.fields {
            map.insert(field.json_key.to_string(), (field.read)(entity));
        }
        Value::Object(map)
    }

    pub fn read(&self, entity: &E, attribute: &str) -> Option<Value> {
        self.field_for_attribute(attribute)
            .map(|field| (field.read)(entity))
    }

    /// Pushes `node` through the attribute's type and back to JSON.
    pub fn normalize(&self, attribute: &str, node: JsonRef<'_>) -> Option<Value> {
        self.field_for_attribute(attribute)
            .and_then(|field| (field.normalize)(node))
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut keys = HashSet::new();
        let mut attributes = HashSet::new();
        for field in &self.fields {
            if !keys.insert(field.json_key) {
                return Err(Error::new(ErrorKind::Config)
                    .with_message(format!("duplicate json key `{}` in field map", field.json_key)));
            }
            if !attributes.insert(field.attribute) {
                return Err(Error::new(ErrorKind::Config).with_message(format!(
                    "duplicate attribute `{}` in field map",
                    field.attribute
                )));
            }
        }
        Ok(())
    }
}

impl<E> fmt::Debug for FieldMap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

pub struct FieldMapBuilder<E> {
    fields: Vec<Field<E>>,
}

impl<E: 'static> FieldMapBuilder<E> {
    /// Scalar, date, optional or list attribute.
    pub fn value<T>(
        self,
        json_key: &'static str,
        attribute: &'static str,
        get: fn(&E) -> &T,
        set: fn(&mut E) -> &mut T,
    ) -> Self
    where
        T: FromJson + ToJson + 'static,
    {
        self.typed(
            json_key,
            attribute,
            T::TEMPORAL,
            get,
            set,
            T::from_json,
            <T as ToJson>::to_json,
        )
    }

    /// Nested model object; `null` clears it, an object replaces it wholesale.
    pub fn entity<T: ModelObject>(
        self,
        json_key: &'static str,
        attribute: &'static str,
        get: fn(&E) -> &Option<T>,
        set: fn(&mut E) -> &mut Option<T>,
    ) -> Self {
        self.typed(
            json_key,
            attribute,
            false,
            get,
            set,
            nested_from_json::<T>,
            nested_to_json::<T>,
        )
    }

    /// Nested collection of model objects built from a JSON array.
    pub fn entities<T: ModelObject>(
        self,
        json_key: &'static str,
        attribute: &'static str,
        get: fn(&E) -> &Vec<T>,
        set: fn(&mut E) -> &mut Vec<T>,
    ) -> Self {
        self.typed(
            json_key,
            attribute,
            false,
            get,
            set,
            nested_list_from_json::<T>,
            nested_list_to_json::<T>,
        )
    }

    pub fn build(self) -> FieldMap<E> {
        let map = FieldMap {
            fields: self.fields,
        };
        debug_assert!(map.validate().is_ok(), "invalid field map: {map:?}");
        map
    }

    #[allow(clippy::too_many_arguments)]
    fn typed<T: 'static>(
        mut self,
        json_key: &'static str,
        attribute: &'static str,
        temporal: bool,
        get: fn(&E) -> &T,
        set: fn(&mut E) -> &mut T,
        decode: fn(JsonRef<'_>) -> Option<T>,
        encode: fn(&T) -> Value,
    ) -> Self {
        self.fields.push(Field {
            json_key,
            attribute,
            temporal,
            read: Box::new(move |entity: &E| encode(get(entity))),
            write: Box::new(move |entity: &mut E, node: JsonRef<'_>| match decode(node) {
                Some(value) => {
                    *set(entity) = value;
                    true
                }
                None => false,
            }),
            normalize: Box::new(move |node: JsonRef<'_>| decode(node).map(|value| encode(&value))),
        });
        self
    }
}

fn nested_from_json<T: ModelObject>(node: JsonRef<'_>) -> Option<Option<T>> {
    if node.is_null() {
        return Some(None);
    }
    let value = node.value().filter(|value| value.is_object())?;
    Some(Some(T::construct(value)))
}

fn nested_to_json<T: ModelObject>(value: &Option<T>) -> Value {
    match value {
        Some(nested) => nested.to_json(),
        None => Value::Null,
    }
}

fn nested_list_from_json<T: ModelObject>(node: JsonRef<'_>) -> Option<Vec<T>> {
    node.value()
        .filter(|value| value.is_array())
        .map(T::construct_array)
}

#[allow(clippy::ptr_arg)]
fn nested_list_to_json<T: ModelObject>(values: &Vec<T>) -> Value {
    Value::Array(values.iter().map(ModelObject::to_json).collect())
}

#[cfg(test)]
mod tests {
    use super::FieldMap;
    use crate::core::json::JsonRef;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Room {
        name: String,
        capacity: Option<u64>,
        tags: Vec<String>,
    }

    fn room_map() -> FieldMap<Room> {
        FieldMap::<Room>::builder()
            .value("name", "name", |room| &room.name, |room| &mut room.name)
            .value(
                "capacity",
                "capacity",
                |room| &room.capacity,
                |room| &mut room.capacity,
            )
            .value("tags", "tags", |room| &room.tags, |room| &mut room.tags)
            .build()
    }

    #[test]
    fn apply_assigns_present_keys_only() {
        let map = room_map();
        let mut room = Room {
            name: "Old".to_string(),
            capacity: Some(4),
            tags: Vec::new(),
        };
        let doc = json!({"name": "Aquarium", "tags": ["tv"], "ignored": true});

        let assigned = map.apply(&mut room, JsonRef::from(&doc));

        assert_eq!(assigned, 2);
        assert_eq!(room.name, "Aquarium");
        assert_eq!(room.capacity, Some(4));
        assert_eq!(room.tags, vec!["tv".to_string()]);
    }

    #[test]
    fn wrong_types_leave_attributes_unchanged() {
        let map = room_map();
        let mut room = Room::default();
        let doc = json!({"name": 7, "capacity": "ten", "tags": ["a", 1]});

        assert_eq!(map.apply(&mut room, JsonRef::from(&doc)), 0);
        assert_eq!(room.name, "");
        assert_eq!(room.capacity, None);
        assert!(room.tags.is_empty());
    }

    #[test]
    fn serialize_follows_declaration_order() {
        let map = room_map();
        let room = Room {
            name: "Aquarium".to_string(),
            capacity: None,
            tags: vec!["tv".to_string()],
        };
        let out = map.serialize(&room);
        let keys = out
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["name", "capacity", "tags"]);
        assert_eq!(out, json!({"name": "Aquarium", "capacity": null, "tags": ["tv"]}));
    }

    #[test]
    fn read_and_normalize_by_attribute() {
        let map = room_map();
        let room = Room {
            name: "Aquarium".to_string(),
            ..Room::default()
        };
        assert_eq!(map.read(&room, "name"), Some(json!("Aquarium")));
        assert_eq!(map.read(&room, "nmae"), None);

        let node = json!(12);
        assert_eq!(map.normalize("capacity", JsonRef::from(&node)), Some(json!(12)));
        assert_eq!(map.normalize("name", JsonRef::from(&node)), None);
        assert_eq!(map.normalize("capacity", JsonRef::Absent), None);
    }

    #[test]
    fn validate_rejects_duplicates() {
        assert!(room_map().validate().is_ok());
        assert_eq!(room_map().pairs()[0], ("name", "name"));

        let duplicate_key = FieldMap::<Room> {
            fields: room_map()
                .fields
                .into_iter()
                .chain(room_map().fields.into_iter().take(1))
                .collect(),
        };
        let err = duplicate_key.validate().expect_err("duplicate");
        assert_eq!(err.kind(), crate::core::error::ErrorKind::Config);
        assert!(err.message().unwrap_or("").contains("`name`"));
    }
}
