//! Purpose: Typed Test Configuration consumed by the mapping harness.
//! Exports: `MappingCase`.
//! Role: One row of data-driven verification: factory, fixture, field pairs, overrides.
//! Invariants: Required parts (factory, fixture, map) are constructor arguments.
//! Invariants: The harness only borrows cases; a case is never mutated by a run.

use crate::core::object::{ModelObject, ModelObjectFactory};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct MappingCase {
    name: String,
    factory: ModelObjectFactory,
    json: Value,
    map: Vec<(String, String)>,
    expected_json: Option<Value>,
    array_json: Option<Value>,
}

impl MappingCase {
    pub fn new<K, A>(
        name: impl Into<String>,
        factory: ModelObjectFactory,
        json: Value,
        map: impl IntoIterator<Item = (K, A)>,
    ) -> Self
    where
        K: Into<String>,
        A: Into<String>,
    {
        Self {
            name: name.into(),
            factory,
            json,
            map: map
                .into_iter()
                .map(|(key, attribute)| (key.into(), attribute.into()))
                .collect(),
            expected_json: None,
            array_json: None,
        }
    }

    /// Case whose map is the entity's own Field Map.
    pub fn for_model<E: ModelObject>(name: impl Into<String>, json: Value) -> Self {
        Self::new(
            name,
            ModelObjectFactory::of::<E>(),
            json,
            E::field_map().pairs(),
        )
    }

    pub fn with_expected_json(mut self, expected: Value) -> Self {
        self.expected_json = Some(expected);
        self
    }

    pub fn with_array_json(mut self, fixtures: Value) -> Self {
        self.array_json = Some(fixtures);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn factory(&self) -> ModelObjectFactory {
        self.factory
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn map(&self) -> &[(String, String)] {
        &self.map
    }

    /// Falls back to the input fixture when no normalized expectation was given.
    pub fn expected_json(&self) -> &Value {
        self.expected_json.as_ref().unwrap_or(&self.json)
    }

    pub fn array_json(&self) -> Option<&Value> {
        self.array_json.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::MappingCase;
    use crate::model::Calendar;
    use serde_json::json;

    #[test]
    fn expected_json_defaults_to_fixture() {
        let case = MappingCase::for_model::<Calendar>("calendar", json!({"id": "c1"}));
        assert_eq!(case.expected_json(), &json!({"id": "c1"}));
        assert_eq!(case.map()[0], ("id".to_string(), "identifier".to_string()));
        assert!(case.array_json().is_none());

        let case = case.with_expected_json(json!({"id": "c2"}));
        assert_eq!(case.expected_json(), &json!({"id": "c2"}));
        assert_eq!(case.json(), &json!({"id": "c1"}));
    }
}
