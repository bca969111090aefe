//! Purpose: Mapping Verification Harness; proves the mapping contract for any entity type.
//! Exports: `run_case`, `run_cases`, `run_manifest`, plus case/report/registry/manifest types.
//! Role: Data-driven test generator; adding an entity needs a case, not harness code.
//! Invariants: Every group builds fresh instances through the case's factory.
//! Invariants: The date codec group runs only for types declaring temporal fields.
//! Invariants: Date checks read real `to_json` output, never the entity's own claims.
//! Invariants: Absent and non-coercible expectations both mean "attribute left at default".

pub mod case;
pub mod manifest;
pub mod registry;
pub mod report;

pub use case::MappingCase;
pub use manifest::{CONFORMANCE_VERSION, case_from_config, load_manifest, parse_manifest};
pub use registry::FactoryRegistry;
pub use report::{CheckGroup, CheckOutcome, HarnessReport, report_json};

use crate::core::date::{DATE_PATTERN, DateCodec};
use crate::core::error::Error;
use crate::core::json::JsonRef;
use crate::core::object::MappedObject;
use serde_json::Value;
use std::path::Path;

pub fn run_case(case: &MappingCase) -> HarnessReport {
    let factory = case.factory();
    let mut report = HarnessReport::new(case.name(), factory.type_name());

    let sut = factory.construct(case.json());
    check_conformance(case, sut.as_ref(), &mut report);
    if sut.has_temporal_fields() {
        check_date_codec(sut.as_ref(), &mut report);
    }
    check_forward(case, &mut report);
    check_backward(case, &mut report);
    check_array(case, &mut report);

    tracing::info!(
        case = case.name(),
        type_name = factory.type_name(),
        checks = report.checks.len(),
        passed = report.passed(),
        "mapping case finished"
    );
    report
}

pub fn run_cases<'a>(cases: impl IntoIterator<Item = &'a MappingCase>) -> Vec<HarnessReport> {
    cases.into_iter().map(run_case).collect()
}

pub fn run_manifest(path: &Path, registry: &FactoryRegistry) -> Result<Vec<HarnessReport>, Error> {
    let cases = load_manifest(path, registry)?;
    Ok(run_cases(&cases))
}

fn check_conformance(case: &MappingCase, sut: &dyn MappedObject, report: &mut HarnessReport) {
    let factory = case.factory();
    report.record(
        CheckGroup::Conformance,
        "factory produces declared type",
        if factory.produced(sut) && sut.type_name() == factory.type_name() {
            Ok(())
        } else {
            Err(format!(
                "factory `{}` produced `{}`",
                factory.type_name(),
                sut.type_name()
            ))
        },
    );
    report.record(
        CheckGroup::Conformance,
        "field map is well formed",
        sut.validate_field_map().map_err(|err| err.to_string()),
    );

    let serialized = sut.to_json();
    let declared = sut
        .field_pairs()
        .into_iter()
        .map(|(key, _)| key)
        .collect::<Vec<_>>();
    report.record(
        CheckGroup::Conformance,
        "serializes every declared key in order",
        match serialized.as_object() {
            Some(object) => {
                let keys = object.keys().map(String::as_str).collect::<Vec<_>>();
                if keys == declared {
                    Ok(())
                } else {
                    Err(format!("expected keys {declared:?}, got {keys:?}"))
                }
            }
            None => Err(format!("to_json produced a non-object: {serialized}")),
        },
    );
}

fn check_date_codec(sut: &dyn MappedObject, report: &mut HarnessReport) {
    let codec = DateCodec::shared();
    report.record(
        CheckGroup::DateCodec,
        "shared codec uses the date pattern",
        if codec.pattern() == DATE_PATTERN {
            Ok(())
        } else {
            Err(format!("pattern {:?}", codec.pattern()))
        },
    );

    let serialized = sut.to_json();
    let serialized = JsonRef::from(&serialized);
    for key in sut.temporal_keys() {
        report.record(
            CheckGroup::DateCodec,
            format!("{key} renders through the shared codec"),
            expect_canonical_dates(codec, serialized.get(key)),
        );
    }
}

/// Every rendered date must re-parse with `codec` and re-format to the identical text.
fn expect_canonical_dates(codec: &DateCodec, node: JsonRef<'_>) -> Result<(), String> {
    let texts = match node.value() {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(text)) => vec![text.as_str()],
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| format!("expected a date string, got {item}"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => return Err(format!("expected a date string, got {other}")),
    };
    for text in texts {
        let date = codec
            .parse(text)
            .ok_or_else(|| format!("`{text}` does not match {DATE_PATTERN}"))?;
        let canonical = codec
            .format(date)
            .ok_or_else(|| format!("`{text}` cannot be re-formatted"))?;
        if canonical != text {
            return Err(format!(
                "`{text}` is not in the codec offset {}; expected `{canonical}`",
                codec.offset()
            ));
        }
    }
    Ok(())
}

fn check_forward(case: &MappingCase, report: &mut HarnessReport) {
    let mut sut = case.factory().construct(case.json());
    sut.map(case.json());
    let expected = JsonRef::from(case.expected_json());
    for (key, attribute) in case.map() {
        report.record(
            CheckGroup::Forward,
            format!("{key} -> {attribute}"),
            expect_attribute(sut.as_ref(), attribute, expected.get(key)),
        );
    }
}

fn check_backward(case: &MappingCase, report: &mut HarnessReport) {
    let sut = case.factory().construct(case.json());
    let serialized = sut.to_json();
    let serialized = JsonRef::from(&serialized);
    for (key, attribute) in case.map() {
        report.record(
            CheckGroup::Backward,
            format!("{attribute} -> {key}"),
            expect_serialized(sut.as_ref(), attribute, key, serialized.get(key)),
        );
    }
}

fn check_array(case: &MappingCase, report: &mut HarnessReport) {
    let (fixtures, explicit) = match case.array_json() {
        Some(fixtures) => (fixtures.clone(), true),
        None => (Value::Array(vec![case.json().clone()]), false),
    };
    let elements = fixtures
        .as_array()
        .map(|items| items.iter().filter(|item| item.is_object()).collect::<Vec<_>>())
        .unwrap_or_default();
    let objects = case.factory().construct_array(&fixtures);
    report.record(
        CheckGroup::Array,
        "constructs one object per element",
        if objects.len() == elements.len() {
            Ok(())
        } else {
            Err(format!(
                "expected {} objects, got {}",
                elements.len(),
                objects.len()
            ))
        },
    );

    for (index, (object, element)) in objects.iter().zip(elements).enumerate() {
        let expected = if explicit {
            element
        } else {
            case.expected_json()
        };
        let expected = JsonRef::from(expected);
        for (key, attribute) in case.map() {
            report.record(
                CheckGroup::Array,
                format!("[{index}] {key} -> {attribute}"),
                expect_attribute(object.as_ref(), attribute, expected.get(key)),
            );
        }
    }
}

fn expect_attribute(
    sut: &dyn MappedObject,
    attribute: &str,
    expected: JsonRef<'_>,
) -> Result<(), String> {
    let actual = sut
        .attribute_value(attribute)
        .ok_or_else(|| format!("unknown attribute `{attribute}`"))?;
    let wanted = sut
        .normalize_attribute(attribute, expected)
        .or_else(|| sut.default_attribute_value(attribute))
        .ok_or_else(|| format!("no default for attribute `{attribute}`"))?;
    if wanted == actual {
        Ok(())
    } else {
        Err(format!("expected {wanted}, got {actual}"))
    }
}

fn expect_serialized(
    sut: &dyn MappedObject,
    attribute: &str,
    key: &str,
    serialized: JsonRef<'_>,
) -> Result<(), String> {
    let actual = sut
        .attribute_value(attribute)
        .ok_or_else(|| format!("unknown attribute `{attribute}`"))?;
    if serialized.is_absent() {
        return Err(format!("key `{key}` missing from to_json output"));
    }
    let round_tripped = sut
        .normalize_attribute(attribute, serialized)
        .ok_or_else(|| format!("to_json value for `{key}` does not map back to `{attribute}`"))?;
    if round_tripped == actual {
        Ok(())
    } else {
        Err(format!("expected {actual}, got {round_tripped}"))
    }
}
