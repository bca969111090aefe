//! Purpose: Load mapping cases from JSON conformance manifests.
//! Exports: `CONFORMANCE_VERSION`, `load_manifest`, `parse_manifest`, `case_from_config`.
//! Role: Data-driven front door to the harness; new entities need only a manifest row.
//! Invariants: Missing `factory`, `json` or `map` is a Config error, never a skipped case.
//! Invariants: Map order follows the manifest; object and pair-array forms are accepted.
//! Invariants: Errors name the case index (and name when known).

use crate::core::error::{Error, ErrorKind};
use crate::harness::case::MappingCase;
use crate::harness::registry::FactoryRegistry;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const CONFORMANCE_VERSION: u64 = 0;

pub fn load_manifest(path: &Path, registry: &FactoryRegistry) -> Result<Vec<MappingCase>, Error> {
    let content = fs::read_to_string(path).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read manifest")
            .with_path(path)
            .with_source(err)
    })?;
    let manifest: Value = serde_json::from_str(&content).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message("failed to parse manifest json")
            .with_path(path)
            .with_source(err)
    })?;
    parse_manifest(&manifest, registry).map_err(|err| err.with_path(path))
}

pub fn parse_manifest(
    manifest: &Value,
    registry: &FactoryRegistry,
) -> Result<Vec<MappingCase>, Error> {
    let version = manifest
        .get("conformance_version")
        .and_then(Value::as_u64)
        .ok_or_else(|| config_err("missing conformance_version"))?;
    if version != CONFORMANCE_VERSION {
        return Err(config_err(format!(
            "unsupported conformance_version: {version}"
        )));
    }
    let cases = manifest
        .get("cases")
        .and_then(Value::as_array)
        .ok_or_else(|| config_err("manifest cases must be an array"))?;

    cases
        .iter()
        .enumerate()
        .map(|(index, config)| case_from_config(index, config, registry))
        .collect()
}

pub fn case_from_config(
    index: usize,
    config: &Value,
    registry: &FactoryRegistry,
) -> Result<MappingCase, Error> {
    let name = config.get("name").and_then(Value::as_str);
    let fail = |message: &str| case_err(index, name, message);

    let type_name = config
        .get("factory")
        .ok_or_else(|| fail("missing factory"))?
        .as_str()
        .ok_or_else(|| fail("factory must be a type name string"))?;
    let factory = registry.get(type_name).ok_or_else(|| {
        fail(&format!("unknown factory: {type_name}")).with_hint(format!(
            "registered factories: {}",
            registry.names().join(", ")
        ))
    })?;
    let json = config.get("json").ok_or_else(|| fail("missing json"))?;
    let map = config.get("map").ok_or_else(|| fail("missing map"))?;
    let map = parse_map(map).map_err(|err| fail(err.as_str()))?;

    let name = name.map(str::to_string).unwrap_or_else(|| format!("case {index}"));
    let mut case = MappingCase::new(name, factory, json.clone(), map);
    if let Some(expected) = config.get("expectedJSON") {
        case = case.with_expected_json(expected.clone());
    }
    if let Some(fixtures) = config.get("arrayJSON") {
        if !fixtures.is_array() {
            return Err(fail("arrayJSON must be an array"));
        }
        case = case.with_array_json(fixtures.clone());
    }
    Ok(case)
}

fn parse_map(value: &Value) -> Result<Vec<(String, String)>, String> {
    let pairs = match value {
        Value::Object(entries) => entries
            .iter()
            .map(|(key, attribute)| {
                attribute
                    .as_str()
                    .map(|attribute| (key.clone(), attribute.to_string()))
                    .ok_or_else(|| format!("map value for `{key}` must be a string"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Value::Array(entries) => entries
            .iter()
            .map(parse_pair)
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err("map must be an object or an array of pairs".to_string()),
    };

    let mut keys = HashSet::new();
    let mut attributes = HashSet::new();
    for (key, attribute) in &pairs {
        if !keys.insert(key.as_str()) {
            return Err(format!("duplicate json key `{key}` in map"));
        }
        if !attributes.insert(attribute.as_str()) {
            return Err(format!("duplicate attribute `{attribute}` in map"));
        }
    }
    Ok(pairs)
}

fn parse_pair(entry: &Value) -> Result<(String, String), String> {
    match entry.as_array().map(Vec::as_slice) {
        Some([Value::String(key), Value::String(attribute)]) => {
            Ok((key.clone(), attribute.clone()))
        }
        _ => Err("map pairs must be [jsonKey, attribute] string arrays".to_string()),
    }
}

fn config_err(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Config).with_message(message)
}

fn case_err(index: usize, name: Option<&str>, message: &str) -> Error {
    let mut out = format!("case {index}");
    if let Some(name) = name {
        out.push_str(&format!(" ({name})"));
    }
    out.push_str(": ");
    out.push_str(message);
    let err = config_err(out);
    match name {
        Some(name) => err.with_case(name),
        None => err,
    }
}
