//! Integration tests for the azqr CLI
//!
//! None of these reach Azure: they cover argument handling, the rule catalog
//! and failure paths against an unreachable endpoint.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SUB: &str = "3f2c1a9e-6b1d-4c1e-9d0a-2b7e5c8f1a23";

#[allow(deprecated)]
fn get_cmd() -> Command {
    Command::cargo_bin("azqr").unwrap()
}

#[test]
fn test_rules_lists_every_scanner() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("kv-001"))
        .stdout(predicate::str::contains("agw-007"))
        .stdout(predicate::str::contains("cae-005"))
        .stdout(predicate::str::contains("plan-006"));
}

#[test]
fn test_rules_json_filtered_by_service() {
    let temp_dir = TempDir::new().unwrap();

    let output = get_cmd()
        .current_dir(temp_dir.path())
        .args(["rules", "--services", "agw", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = value["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 7);
    assert!(rules.iter().all(|r| r["scanner"] == "agw"));
    assert_eq!(rules[2]["kind"], "informational");
}

#[test]
fn test_scan_rejects_malformed_subscription() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .env_remove("AZURE_ACCESS_TOKEN")
        .args(["scan", "-s", "not-a-guid"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not a GUID"));
}

#[test]
fn test_scan_rejects_malformed_resource_group() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["scan", "-s", SUB, "-g", "rg/with/slashes"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("resource group"));
}

#[test]
fn test_scan_rejects_unknown_services() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["scan", "-s", SUB, "--services", "storage"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown service"));
}

#[test]
fn test_rules_rejects_unknown_services() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["rules", "--services", "bogus", "-f", "json"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains("\"id\"").not())
        .stderr(predicate::str::contains("No valid services selected"));
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["-c", "missing.toml", "rules"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_invalid_config_value() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".azqr.toml"),
        "[scan]\nmax_concurrent_evaluations = 0\n",
    )
    .unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .arg("rules")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("max_concurrent_evaluations"));
}

#[test]
fn test_unreachable_endpoint_reports_failed_scanners() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".azqr.toml"),
        "[azure]\nendpoint = \"http://127.0.0.1:9\"\nrequest_timeout_secs = 2\n",
    )
    .unwrap();

    let output = get_cmd()
        .current_dir(temp_dir.path())
        .env("AZURE_ACCESS_TOKEN", "test-token")
        .args(["scan", "-s", SUB, "--services", "kv,plan", "-f", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["complete"], false);
    assert_eq!(value["results"].as_array().unwrap().len(), 0);

    let failed: Vec<_> = value["failures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["scanner"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(failed, ["kv", "plan"]);
}

#[test]
fn test_scan_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".azqr.toml"),
        "[azure]\nendpoint = \"http://127.0.0.1:9\"\nrequest_timeout_secs = 2\n",
    )
    .unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .env("AZURE_ACCESS_TOKEN", "test-token")
        .args(["scan", "-s", SUB, "--services", "cae", "-f", "json", "-o", "report.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Report written to"));

    let content = fs::read_to_string(temp_dir.path().join("report.json")).unwrap();
    assert!(content.contains("\"failures\""));
}

#[test]
fn test_version() {
    get_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("azqr"));
}
