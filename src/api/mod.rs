//! Purpose: Define the stable public Rust API boundary for model object mapping.
//! Exports: Contract traits, JSON view, date codec, booking entities, harness entry points.
//! Role: Public, additive-only surface; callers should not reach into submodules.
//! Invariants: Everything a new entity needs (trait, field map builder, harness case) is here.

pub use crate::core::date::{DATE_PATTERN, DateCodec};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::field_map::{Field, FieldMap, FieldMapBuilder};
pub use crate::core::json::{FromJson, JsonRef, ToJson};
pub use crate::core::object::{MappedObject, ModelObject, ModelObjectFactory};
pub use crate::harness::{
    CONFORMANCE_VERSION, CheckGroup, CheckOutcome, FactoryRegistry, HarnessReport, MappingCase,
    load_manifest, parse_manifest, report_json, run_case, run_cases, run_manifest,
};
pub use crate::model::{Attendee, Calendar, Event};
