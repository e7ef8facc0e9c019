//! Integration tests for the oracle CLI
//!
//! These tests invoke the actual oracle-cli binary and verify:
//! - Exit codes (0 = all pass, 1 = failures, 2 = harness misuse)
//! - stdout/stderr output
//! - JSON output format

use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn oracle_bin() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_BIN_EXE_oracle-cli"));
    if !path.exists() {
        path = PathBuf::from("target/debug/oracle-cli");
    }
    path
}

fn run_oracle(args: &[&str]) -> std::process::Output {
    Command::new(oracle_bin())
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute oracle-cli")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("should be valid JSON")
}

// ── Version / List ────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_oracle(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("oracle"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    assert!(stdout.contains(&format!("(oracle-core {})", oracle_core::VERSION)));
}

#[test]
fn test_version_flag() {
    let output = run_oracle(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_shows_catalogue() {
    let output = run_oracle(&["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["add", "divide", "calculate_average", "is_even", "reverse_string", "flatten"] {
        assert!(stdout.contains(name), "list should mention {}", name);
    }
}

// ── Run ───────────────────────────────────────────────────

#[test]
fn test_run_clean_operation_exits_0() {
    let output = run_oracle(&["run", "is_even"]);
    assert!(output.status.success(), "is_even should pass");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("is_even"));
    assert!(stdout.contains("0 failed"));
}

#[test]
fn test_run_seeded_divide_exits_1() {
    let output = run_oracle(&["run", "divide"]);
    assert_eq!(output.status.code(), Some(1), "seeded divide should fail");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("divide(1.0, 0.0)"));
    assert!(stdout.contains("expected: error DivisionByZero"));
    assert!(stdout.contains("actual:   inf"));
}

#[test]
fn test_run_reference_divide_exits_0() {
    let output = run_oracle(&["run", "divide", "--reference"]);
    assert!(output.status.success(), "reference divide should pass");
}

#[test]
fn test_run_unknown_operation_exits_2() {
    let output = run_oracle(&["run", "multiply"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("multiply"));
    assert!(stderr.contains("not registered"));
}

#[test]
fn test_run_names_are_case_sensitive() {
    let output = run_oracle(&["run", "Divide"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_run_json_output() {
    let output = run_oracle(&["run", "calculate_average", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["passed"], false);
    assert_eq!(json["summary"]["fail_count"], 3);
    assert_eq!(json["report"]["operation"], "calculate_average");
    let results = json["report"]["results"].as_array().unwrap();
    let total = json["summary"]["pass_count"].as_u64().unwrap()
        + json["summary"]["fail_count"].as_u64().unwrap()
        + json["summary"]["error_count"].as_u64().unwrap();
    assert_eq!(results.len() as u64, total);
}

#[test]
fn test_run_without_edge_cases() {
    let output = run_oracle(&["run", "divide", "--no-edge-cases", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    let results = json["report"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r["case"]["is_edge_case"] == false));
    assert_eq!(json["summary"]["fail_count"], 1);
}

#[test]
fn test_run_with_timeout_still_classifies() {
    let output = run_oracle(&["run", "add", "--timeout-ms", "1000"]);
    assert!(output.status.success());
}

#[test]
fn test_run_quiet() {
    let output = run_oracle(&["--quiet", "run", "divide"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "quiet mode should produce no stdout");
}

// ── Run-all ───────────────────────────────────────────────

#[test]
fn test_run_all_seeded_exits_1() {
    let output = run_oracle(&["run-all"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("total:"));
    assert!(stdout.contains("8 failed"));
}

#[test]
fn test_run_seeded_shows_planted_assertions() {
    let output = run_oracle(&["run", "reverse_string"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("reverse_string(\"hello\")"));
    assert!(stdout.contains("expected: \"lorand\""));

    let output = run_oracle(&["run", "reverse_string", "--reference"]);
    assert!(output.status.success(), "reference suite has no planted assertions");
}

#[test]
fn test_run_json_keeps_infinity() {
    let output = run_oracle(&["run", "divide", "--json"]);
    let json = stdout_json(&output);
    let results = json["report"]["results"].as_array().unwrap();
    let by_zero = results
        .iter()
        .find(|r| r["case"]["inputs"] == serde_json::json!([1.0, 0.0]))
        .expect("divide(1.0, 0.0) should be reported");
    assert_eq!(by_zero["actual"]["kind"], "value");
    assert_eq!(by_zero["actual"]["actual"], "inf");
    assert_eq!(by_zero["status"], "fail");
}

#[test]
fn test_run_all_reference_exits_0() {
    let output = run_oracle(&["run-all", "--reference"]);
    assert!(output.status.success(), "reference catalogue should pass");
}

#[test]
fn test_run_all_json_lists_reports_in_name_order() {
    let output = run_oracle(&["run-all", "--json"]);
    let json = stdout_json(&output);
    let names: Vec<&str> = json["reports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["operation"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["add", "calculate_average", "divide", "flatten", "is_even", "reverse_string"]
    );
}

#[test]
fn test_run_all_deterministic() {
    let first = run_oracle(&["run-all", "--json"]);
    for _ in 0..3 {
        let again = run_oracle(&["run-all", "--json"]);
        assert_eq!(first.stdout, again.stdout, "run-all output must be deterministic");
    }
}
