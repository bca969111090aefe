// CLI integration tests for the conformance runner and checked-in manifests.
use std::path::{Path, PathBuf};
use std::process::Command;

use roomguru_mapping::api::{ErrorKind, FactoryRegistry, load_manifest, run_manifest};
use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_roomguru-conformance");
    Command::new(exe)
}

fn manifest(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("conformance")
        .join(name)
}

fn parse_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("valid json")
}

#[test]
fn checked_in_manifest_passes_through_library() {
    let registry = FactoryRegistry::with_booking_models();
    let reports = run_manifest(&manifest("booking_models.json"), &registry).expect("manifest");
    assert_eq!(reports.len(), 7);
    for report in &reports {
        report.assert_passed();
    }
}

#[test]
fn runner_reports_ok_lines() {
    let output = cmd()
        .arg(manifest("booking_models.json"))
        .output()
        .expect("run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 7);
    assert!(lines.iter().all(|line| line.starts_with("ok   ")));
    assert!(lines[0].starts_with("ok   event-standup (Event, "));
}

#[test]
fn runner_emits_json_reports() {
    let output = cmd()
        .args(["--format", "json"])
        .arg(manifest("booking_models.json"))
        .arg(manifest("broken_map.json"))
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(5));
    let report = parse_json(&output.stdout);
    assert_eq!(report["passed"], false);
    assert_eq!(report["case_count"], 8);
    assert_eq!(report["failed_count"], 1);
    let broken = &report["cases"][7];
    assert_eq!(broken["case"], "event-typo");
    assert_eq!(broken["type_name"], "Event");
}

#[test]
fn broken_map_fails_with_mismatch_exit_code() {
    let output = cmd()
        .arg(manifest("broken_map.json"))
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(5));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("FAIL case `event-typo` (Event)"));
    assert!(stdout.contains("[forward] summary -> titel: unknown attribute `titel`"));
}

#[test]
fn fail_fast_stops_after_first_failure() {
    let output = cmd()
        .args(["--fail-fast"])
        .arg(manifest("broken_map.json"))
        .arg(manifest("booking_models.json"))
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(5));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().filter(|line| line.starts_with("ok")).count(), 0);
}

#[test]
fn missing_factory_is_a_config_error() {
    let registry = FactoryRegistry::with_booking_models();
    let err = load_manifest(&manifest("missing_factory.json"), &registry).expect_err("config");
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.message(), Some("case 0 (no-factory): missing factory"));

    let output = cmd()
        .arg(manifest("booking_models.json"))
        .arg(manifest("missing_factory.json"))
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty(), "no case may run after a config error");
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = parse_json(stderr.lines().last().expect("error line").as_bytes());
    assert_eq!(stderr["error"]["kind"], "Config");
    assert_eq!(stderr["error"]["case"], "no-factory");
    assert!(
        stderr["error"]["path"]
            .as_str()
            .expect("path")
            .ends_with("missing_factory.json")
    );
}

#[test]
fn unreadable_and_malformed_manifests_are_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let registry = FactoryRegistry::with_booking_models();

    let missing = temp.path().join("absent.json");
    let err = load_manifest(&missing, &registry).expect_err("io");
    assert_eq!(err.kind(), ErrorKind::Io);

    let malformed = temp.path().join("malformed.json");
    std::fs::write(&malformed, "{\"conformance_version\": 0,").expect("write");
    let err = load_manifest(&malformed, &registry).expect_err("parse");
    assert_eq!(err.kind(), ErrorKind::Parse);

    let output = cmd().arg(&malformed).output().expect("run");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn manifest_written_at_runtime_runs() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("calendar.json");
    let body = serde_json::json!({
        "conformance_version": 0,
        "cases": [{
            "name": "calendar",
            "factory": "Calendar",
            "json": {"id": "c1", "summary": "Jungle"},
            "map": [["id", "identifier"], ["summary", "name"]]
        }]
    });
    std::fs::write(&path, body.to_string()).expect("write");

    let output = cmd().arg(&path).output().expect("run");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("ok   calendar (Calendar, "));
}
