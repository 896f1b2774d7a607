//! Drift detection across successive generation runs.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use declmap::core::rules::ExtractionRules;
use declmap::pipeline::{self, PipelineOptions};
use declmap::{Error, GeneratorConfig};

const TWO_TYPES: &str =
    "export interface User { id: string; }\nexport interface Session { token: string; }\n";

fn write_source(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn options_for(out: &TempDir, fail_on_drift: bool) -> PipelineOptions {
    let mut generator = GeneratorConfig::new(out.path());
    generator.fail_on_drift = fail_on_drift;
    PipelineOptions::new(generator)
}

fn rules_excluding(excluded: &[&str]) -> ExtractionRules {
    let mut rules = ExtractionRules::new("auth");
    for name in excluded {
        rules.exclude_types.insert(name.to_string());
    }
    rules
}

#[test]
fn removed_type_is_reported_under_removed_only() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let file = write_source(&src, "auth.ts", TWO_TYPES);

    let first = pipeline::run(vec![file.clone()], rules_excluding(&[]), &options_for(&out, false))
        .unwrap();
    assert!(!first.report.drift.has_drift());

    let second = pipeline::run(vec![file], rules_excluding(&["Session"]), &options_for(&out, false))
        .unwrap();
    assert_eq!(second.report.drift.removed, vec!["Session"]);
    assert!(second.report.drift.added.is_empty());
}

#[test]
fn fail_on_drift_aborts_before_any_write() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let file = write_source(&src, "auth.ts", TWO_TYPES);

    pipeline::run(vec![file.clone()], rules_excluding(&[]), &options_for(&out, true)).unwrap();
    let contracts_path = out.path().join("auth.contracts.d.ts");
    let committed = fs::read_to_string(&contracts_path).unwrap();

    let failure = pipeline::run(
        vec![file],
        rules_excluding(&["Session"]),
        &options_for(&out, true),
    )
    .unwrap_err();

    match &failure.error {
        Error::Drift { api, added, removed } => {
            assert_eq!(api.as_str(), "auth");
            assert!(added.is_empty());
            assert_eq!(removed, &vec!["Session".to_string()]);
        }
        other => panic!("expected drift error, got {other}"),
    }

    // The committed artifact is untouched by the aborted run.
    assert_eq!(fs::read_to_string(&contracts_path).unwrap(), committed);
}

#[test]
fn rerun_without_changes_reports_no_drift() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let file = write_source(&src, "auth.ts", TWO_TYPES);

    pipeline::run(vec![file.clone()], rules_excluding(&[]), &options_for(&out, true)).unwrap();
    let rerun = pipeline::run(vec![file], rules_excluding(&[]), &options_for(&out, true)).unwrap();
    assert!(!rerun.report.drift.has_drift());
}
