//! Conformance tests for modguard.
//!
//! These tests validate:
//! 1. All check IDs and codes have explanations
//! 2. Reports emitted for every fixture validate against the generated report schema
//! 3. Report paths are clean (relative, forward slashes only)

use assert_cmd::Command;
use modguard_types::{ModguardReport, explain};
use serde_json::Value;
use std::path::PathBuf;

#[allow(deprecated)]
fn modguard_cmd() -> Command {
    Command::cargo_bin("modguard").expect("modguard binary")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("modguard-cli should have parent")
        .parent()
        .expect("crates should have parent")
        .join("tests")
        .join("fixtures")
}

fn fixture_names() -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(fixtures_dir())
        .expect("read fixtures")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

fn report_for(fixture: &str) -> Value {
    let tmp = tempfile::tempdir().expect("temp dir");
    let out = tmp.path().join("report.json");
    modguard_cmd()
        .arg("check")
        .arg(fixtures_dir().join(fixture))
        .arg("--report-out")
        .arg(&out)
        .output()
        .expect("run modguard");
    let text = std::fs::read_to_string(&out).expect("read report");
    serde_json::from_str(&text).expect("report json")
}

// =============================================================================
// Explanation Coverage Tests
// =============================================================================

#[test]
fn all_check_ids_and_codes_have_explanations() {
    for id in explain::all_check_ids().iter().chain(explain::all_codes()) {
        let exp = explain::lookup_explanation(id)
            .unwrap_or_else(|| panic!("'{id}' has no explanation in registry"));
        assert!(!exp.title.is_empty(), "'{id}' has empty title");
        assert!(!exp.description.is_empty(), "'{id}' has empty description");
        assert!(!exp.remediation.is_empty(), "'{id}' has empty remediation");
    }
}

#[test]
fn check_ids_are_dotted_and_codes_are_snake_case() {
    for check_id in explain::all_check_ids() {
        assert!(check_id.contains('.'), "Check ID '{check_id}' should be dotted");
    }
    for code in explain::all_codes() {
        let valid = code.chars().all(|c| c.is_ascii_lowercase() || c == '_');
        assert!(valid, "Code '{code}' should be snake_case");
    }
}

// =============================================================================
// Schema Conformance
// =============================================================================

#[test]
fn fixture_reports_validate_against_generated_schema() {
    let schema = serde_json::to_value(schemars::schema_for!(ModguardReport)).expect("schema");
    let validator = jsonschema::validator_for(&schema).expect("compile schema");

    let names = fixture_names();
    assert!(!names.is_empty(), "no fixtures found");
    for name in names {
        let report = report_for(&name);
        let errors: Vec<String> = validator.iter_errors(&report).map(|e| e.to_string()).collect();
        assert!(errors.is_empty(), "{name}: {errors:#?}");
    }
}

#[test]
fn fixture_reports_use_known_ids_and_clean_paths() {
    for name in fixture_names() {
        let report = report_for(&name);
        for category in report["categories"].as_array().expect("categories") {
            for v in category["verdicts"].as_array().expect("verdicts") {
                let check_id = v["check_id"].as_str().expect("check_id");
                let code = v["code"].as_str().expect("code");
                assert!(explain::all_check_ids().contains(&check_id), "{name}: {check_id}");
                assert!(
                    code == "ok" || explain::all_codes().contains(&code),
                    "{name}: {code}"
                );
                if let Some(path) = v["location"]["path"].as_str() {
                    assert!(
                        !path.starts_with('/') && !path.contains("..") && !path.contains('\\'),
                        "{name}: unclean path {path}"
                    );
                }
                if v["status"] != "pass" {
                    assert!(v["fingerprint"].is_string(), "{name}: {check_id} lacks fingerprint");
                }
            }
        }
    }
}
