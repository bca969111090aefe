//! Purpose: Structured outcome of one harness run over one mapping case.
//! Exports: `CheckGroup`, `CheckOutcome`, `HarnessReport`, `report_json`.
//! Role: Shared result model for tests (`assert_passed`) and the conformance runner.
//! Invariants: Checks are recorded in execution order; groups keep their run order.
//! Invariants: JSON rendering is additive-only; field names stay stable.

use crate::core::error::{Error, ErrorKind};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckGroup {
    Conformance,
    DateCodec,
    Forward,
    Backward,
    Array,
}

impl CheckGroup {
    pub fn label(self) -> &'static str {
        match self {
            CheckGroup::Conformance => "conformance",
            CheckGroup::DateCodec => "date_codec",
            CheckGroup::Forward => "forward",
            CheckGroup::Backward => "backward",
            CheckGroup::Array => "array",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub group: CheckGroup,
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HarnessReport {
    pub case: String,
    pub type_name: String,
    pub checks: Vec<CheckOutcome>,
}

impl HarnessReport {
    pub fn new(case: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            case: case.into(),
            type_name: type_name.into(),
            checks: Vec::new(),
        }
    }

    pub fn record(&mut self, group: CheckGroup, name: impl Into<String>, result: Result<(), String>) {
        let name = name.into();
        match &result {
            Ok(()) => tracing::debug!(
                case = %self.case,
                group = group.label(),
                check = %name,
                "check passed"
            ),
            Err(detail) => tracing::warn!(
                case = %self.case,
                group = group.label(),
                check = %name,
                %detail,
                "check failed"
            ),
        }
        self.checks.push(CheckOutcome {
            group,
            name,
            passed: result.is_ok(),
            detail: result.err(),
        });
    }

    pub fn passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|check| !check.passed)
    }

    pub fn checks_in(&self, group: CheckGroup) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(move |check| check.group == group)
    }

    pub fn failure_summary(&self) -> String {
        let mut out = format!("case `{}` ({})", self.case, self.type_name);
        for failure in self.failures() {
            out.push_str(&format!("\n  [{}] {}", failure.group.label(), failure.name));
            if let Some(detail) = &failure.detail {
                out.push_str(&format!(": {detail}"));
            }
        }
        out
    }

    pub fn into_result(self) -> Result<Self, Error> {
        if self.passed() {
            return Ok(self);
        }
        let failed = self.failures().count();
        Err(Error::new(ErrorKind::Mismatch)
            .with_message(format!("{failed} check(s) failed: {}", self.failure_summary()))
            .with_case(self.case))
    }

    /// Panics with every failed check listed; intended for `#[test]` bodies.
    pub fn assert_passed(&self) {
        if !self.passed() {
            panic!("mapping checks failed for {}", self.failure_summary());
        }
    }
}

pub fn report_json(reports: &[HarnessReport]) -> Result<Value, Error> {
    let cases = serde_json::to_value(reports).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("report encode failed")
            .with_source(err)
    })?;
    let failed = reports.iter().filter(|report| !report.passed()).count();
    Ok(json!({
        "passed": failed == 0,
        "case_count": reports.len(),
        "failed_count": failed,
        "cases": cases,
    }))
}
