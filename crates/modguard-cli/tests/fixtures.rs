//! End-to-end CLI integration tests using the module fixtures.
//!
//! Each directory in `tests/fixtures/` is a module. These tests run the CLI against each fixture
//! and verify:
//! 1. Exit code matches expected (0=pass, 2=fail)
//! 2. The JSON report carries the expected codes
//! 3. Output is reproducible

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get a Command for the modguard binary.
/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn modguard_cmd() -> Command {
    Command::cargo_bin("modguard").expect("modguard binary not found - run `cargo build` first")
}

/// Get the path to the test fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("modguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

/// Run `modguard check` against a fixture and return the exit code, stdout and JSON report.
fn run_check_on(dir: &Path, extra: &[&str]) -> (i32, String, Value) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    let output = modguard_cmd()
        .arg("check")
        .arg(dir)
        .arg("--report-out")
        .arg(&report_path)
        .args(extra)
        .output()
        .expect("Failed to run command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let report_content = std::fs::read_to_string(&report_path).expect("Failed to read report");
    let report: Value = serde_json::from_str(&report_content).expect("Failed to parse report JSON");
    (exit_code, stdout, report)
}

fn run_check_on_fixture(name: &str) -> (i32, String, Value) {
    run_check_on(&fixtures_dir().join(name), &[])
}

/// `(check_id, code, status)` of every verdict.
fn verdicts(report: &Value) -> Vec<(String, String, String)> {
    report["categories"]
        .as_array()
        .expect("categories")
        .iter()
        .flat_map(|c| c["verdicts"].as_array().expect("verdicts").iter())
        .map(|v| {
            (
                v["check_id"].as_str().unwrap_or_default().to_string(),
                v["code"].as_str().unwrap_or_default().to_string(),
                v["status"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

fn count_code(report: &Value, code: &str, status: &str) -> usize {
    verdicts(report)
        .iter()
        .filter(|(_, c, s)| c == code && s == status)
        .count()
}

fn copy_fixture(name: &str, dest: &Path) {
    let src = fixtures_dir().join(name);
    for entry in walkdir::WalkDir::new(&src) {
        let entry = entry.expect("walk fixture");
        let rel = entry.path().strip_prefix(&src).expect("relative path");
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).expect("create dir");
        } else {
            std::fs::copy(entry.path(), &target).expect("copy file");
        }
    }
}

#[test]
fn clean_fixture_passes() {
    let (code, stdout, report) = run_check_on_fixture("clean");
    assert_eq!(code, 0, "stdout:\n{stdout}");
    assert_eq!(report["passed"], Value::Bool(true));
    assert_eq!(report["summary"]["failed"], 0);
    assert_eq!(report["schema"], "modguard.report.v1");
    assert!(stdout.ends_with("Result: PASS\n"));
}

#[test]
fn missing_files_fixture_reports_three_missing() {
    let (code, stdout, report) = run_check_on_fixture("missing_files");
    assert_eq!(code, 2);
    assert_eq!(count_code(&report, "missing_required_file", "fail"), 3);
    assert!(stdout.contains("✗ variables.tf"));
    assert!(stdout.contains("✗ outputs.tf"));
    assert!(stdout.contains("✗ versions.tf"));
}

#[test]
fn uppercase_cidr_fixture_fails_naming_only_for_that_variable() {
    let (code, _, report) = run_check_on_fixture("uppercase_cidr");
    assert_eq!(code, 2);
    assert_eq!(count_code(&report, "invalid_identifier", "fail"), 1);
    assert_eq!(count_code(&report, "missing_validation", "warn"), 0);
    assert_eq!(count_code(&report, "implausible_validation", "warn"), 0);
}

#[test]
fn region_fixture_warns_but_passes() {
    let (code, stdout, report) = run_check_on_fixture("region_no_validation");
    assert_eq!(code, 0, "stdout:\n{stdout}");
    assert_eq!(count_code(&report, "missing_validation", "warn"), 1);
    assert!(stdout.contains("⚠ var.region"));
}

#[test]
fn duplicate_fixture_has_one_duplicate_verdict() {
    let (code, _, report) = run_check_on_fixture("duplicate");
    assert_eq!(code, 2);
    assert_eq!(count_code(&report, "duplicate_declaration", "fail"), 1);
}

#[test]
fn literal_output_fixture_fails_output_check() {
    let (code, _, report) = run_check_on_fixture("literal_output");
    assert_eq!(code, 2);
    assert_eq!(count_code(&report, "literal_value", "fail"), 1);
}

#[test]
fn unbalanced_fixture_reports_anomalies_and_still_evaluates() {
    let (code, stdout, report) = run_check_on_fixture("unbalanced");
    assert_eq!(code, 2);
    assert!(count_code(&report, "unclosed_block", "fail") >= 1);
    assert!(count_code(&report, "unclosed_delimiter", "fail") >= 1);

    // The truncated subnet is excluded from the model; the rest is still checked.
    let targets: Vec<&str> = report["categories"]
        .as_array()
        .expect("categories")
        .iter()
        .flat_map(|c| c["verdicts"].as_array().expect("verdicts").iter())
        .filter(|v| v["check_id"] == "naming.convention")
        .filter_map(|v| v["target"].as_str())
        .filter(|t| t.starts_with("aws_"))
        .collect();
    assert_eq!(targets, vec!["aws_vpc.main"]);
    assert!(stdout.contains("\nOutput correctness ("));
}

#[test]
fn reports_are_reproducible() {
    let dir = fixtures_dir().join("literal_output");
    let (_, stdout_a, report_a) = run_check_on(&dir, &[]);
    let (_, stdout_b, report_b) = run_check_on(&dir, &[]);
    assert_eq!(stdout_a, stdout_b);
    assert_eq!(report_a, report_b);
}

#[test]
fn write_markdown_writes_report_file_into_module() {
    let tmp = TempDir::new().expect("temp dir");
    copy_fixture("missing_files", tmp.path());

    modguard_cmd()
        .arg("check")
        .arg(tmp.path())
        .arg("--write-markdown")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Result: FAIL"));

    let md = std::fs::read_to_string(tmp.path().join("validation_report.md")).expect("markdown");
    assert!(md.starts_with("# Module validation report"));
    assert!(md.contains("- Result: **FAIL**"));
    assert!(md.contains("## Structure"));
}

#[test]
fn config_file_and_overrides_are_honoured() {
    let tmp = TempDir::new().expect("temp dir");
    copy_fixture("missing_files", tmp.path());
    std::fs::write(
        tmp.path().join("modguard.toml"),
        "required_files = [\"main\"]\n\n[checks.\"version.constraints\"]\nenabled = false\n",
    )
    .expect("write config");

    let (code, stdout, report) = run_check_on(tmp.path(), &[]);
    assert_eq!(code, 0, "stdout:\n{stdout}");
    assert_eq!(count_code(&report, "missing_required_file", "fail"), 0);

    let (code, _, report) = run_check_on(tmp.path(), &["--required-file", "outputs"]);
    assert_eq!(code, 2);
    assert_eq!(count_code(&report, "missing_required_file", "fail"), 1);
}

#[test]
fn invalid_config_is_an_error() {
    let tmp = TempDir::new().expect("temp dir");
    copy_fixture("clean", tmp.path());
    std::fs::write(tmp.path().join("modguard.toml"), "profile = \"lenient\"\n").expect("write");

    modguard_cmd()
        .arg("check")
        .arg(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown profile: lenient"));
}

#[test]
fn md_and_annotations_render_from_json() {
    let tmp = TempDir::new().expect("temp dir");
    let report_path = tmp.path().join("report.json");
    modguard_cmd()
        .arg("check")
        .arg(fixtures_dir().join("literal_output"))
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .code(2);

    modguard_cmd()
        .arg("md")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Output correctness"));

    modguard_cmd()
        .arg("annotations")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "::error file=outputs.tf,line=13::[output.value:literal_value]",
        ));
}
