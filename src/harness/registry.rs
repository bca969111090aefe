//! Purpose: Look up model object factories by type name.
//! Exports: `FactoryRegistry`.
//! Role: Lets manifests name entity types as strings without harness code per type.
//! Invariants: Names are the entities' `TYPE_NAME`; registering a name twice replaces it.

use crate::core::object::{ModelObject, ModelObjectFactory};
use crate::model::{Attendee, Calendar, Event};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<&'static str, ModelObjectFactory>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_booking_models() -> Self {
        Self::new()
            .with::<Attendee>()
            .with::<Calendar>()
            .with::<Event>()
    }

    pub fn with<E: ModelObject>(mut self) -> Self {
        self.register(ModelObjectFactory::of::<E>());
        self
    }

    pub fn register(&mut self, factory: ModelObjectFactory) {
        self.factories.insert(factory.type_name(), factory);
    }

    pub fn get(&self, type_name: &str) -> Option<ModelObjectFactory> {
        self.factories.get(type_name).copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}
