//! Purpose: Execute mapping conformance manifests against the registered booking models.
//! Exports: None (binary entry point).
//! Role: Reference runner for JSON manifests; one report per case on stdout.
//! Invariants: Configuration errors abort the run before any case executes.
//! Invariants: Exit code is derived from `api::to_exit_code` (0 when every case passes).
//! Invariants: Errors go to stderr as JSON; logs go to stderr via `RUST_LOG`.

use clap::{Parser, ValueEnum, ValueHint};
use roomguru_mapping::api::{
    DateCodec, Error, ErrorKind, FactoryRegistry, HarnessReport, MappingCase, load_manifest,
    report_json, run_case, to_exit_code,
};
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "roomguru-conformance",
    version,
    about = "Verify model object JSON mapping from conformance manifests",
    after_help = r#"EXAMPLES
  $ roomguru-conformance conformance/booking_models.json
  $ roomguru-conformance --format json conformance/*.json
  $ RUST_LOG=debug roomguru-conformance conformance/booking_models.json"#
)]
struct Cli {
    #[arg(
        required = true,
        value_hint = ValueHint::FilePath,
        help = "Manifest files to run, in order"
    )]
    manifests: Vec<PathBuf>,
    #[arg(
        long,
        default_value = "human",
        value_enum,
        help = "Report format on stdout: human|json"
    )]
    format: OutputFormat,
    #[arg(long, help = "Stop after the first failing case")]
    fail_fast: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();
    // Resolve the local offset while the process is still single-threaded.
    let codec = DateCodec::shared();
    tracing::debug!(offset = %codec.offset(), pattern = codec.pattern(), "date codec ready");

    let exit_code = match run(&cli) {
        Ok(true) => 0,
        Ok(false) => to_exit_code(ErrorKind::Mismatch),
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<bool, Error> {
    let registry = FactoryRegistry::with_booking_models();

    let mut cases: Vec<MappingCase> = Vec::new();
    for path in &cli.manifests {
        cases.extend(load_manifest(path, &registry)?);
    }

    let mut reports: Vec<HarnessReport> = Vec::new();
    for case in &cases {
        let report = run_case(case);
        let failed = !report.passed();
        reports.push(report);
        if failed && cli.fail_fast {
            break;
        }
    }

    match cli.format {
        OutputFormat::Human => {
            for report in &reports {
                println!("{}", report_line(report));
            }
        }
        OutputFormat::Json => {
            let value = report_json(&reports)?;
            let text = serde_json::to_string_pretty(&value).map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message("report encode failed")
                    .with_source(err)
            })?;
            println!("{text}");
        }
    }

    Ok(reports.iter().all(HarnessReport::passed))
}

fn report_line(report: &HarnessReport) -> String {
    if report.passed() {
        return format!(
            "ok   {} ({}, {} checks)",
            report.case,
            report.type_name,
            report.checks.len()
        );
    }
    format!("FAIL {}", report.failure_summary())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("conformance run failed")),
    );
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(case) = err.case() {
        inner.insert("case".to_string(), json!(case));
    }
    json!({ "error": Value::Object(inner) })
}

fn emit_error(err: &Error) {
    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}
