//! End-to-end tests that run the `emi` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fs;
use std::str::FromStr;

fn emi() -> Command {
    Command::cargo_bin("emi").unwrap()
}

fn run_json(args: &[&str]) -> Value {
    let assert = emi().args(args).assert().success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

// ===========================================================================
// Solvers
// ===========================================================================

#[test]
fn test_installment_minimal() {
    emi()
        .args([
            "installment",
            "--principal",
            "1000000",
            "--rate",
            "10",
            "--years",
            "20",
            "--output",
            "minimal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("9650.2"));
}

#[test]
fn test_installment_json_envelope() {
    let value = run_json(&[
        "installment",
        "--principal",
        "500000",
        "--rate",
        "0",
        "--years",
        "5",
    ]);
    assert_eq!(value["result"]["term_months"], "60");
    assert!(value["result"]["installment"]
        .as_str()
        .unwrap()
        .starts_with("8333.33"));
    assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
}

#[test]
fn test_term_breakdown() {
    let value = run_json(&[
        "term",
        "--principal",
        "10000",
        "--rate",
        "0",
        "--installment",
        "300",
    ]);
    assert_eq!(value["result"]["periods"], 34);
    assert_eq!(value["result"]["term_breakdown"]["years"], 2);
    assert_eq!(value["result"]["term_breakdown"]["months"], 10);
}

#[test]
fn test_term_non_amortizing_fails() {
    emi()
        .args([
            "term",
            "--principal",
            "100000",
            "--rate",
            "12",
            "--installment",
            "500",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Non-amortizing loan"));
}

#[test]
fn test_negative_principal_fails() {
    emi()
        .args(["installment", "--principal", "-5", "--rate", "5", "--years", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rate or principal"));
}

#[test]
fn test_non_numeric_input_rejected() {
    emi()
        .args(["installment", "--principal", "abc", "--rate", "5", "--years", "1"])
        .assert()
        .failure();
}

#[test]
fn test_missing_flag_reported() {
    emi()
        .args(["installment", "--principal", "1000", "--rate", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--years is required"));
}

// ===========================================================================
// Full calculation
// ===========================================================================

#[test]
fn test_calculate_term_mode() {
    let value = run_json(&[
        "calculate",
        "--principal",
        "1000000",
        "--rate",
        "10",
        "--years",
        "20",
    ]);
    let result = &value["result"];
    assert_eq!(result["periods"], 240);
    let schedule = result["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 240);
    assert_eq!(schedule[239]["period"], 240);
    assert_eq!(schedule[239]["balance"], "0");
}

#[test]
fn test_calculate_installment_mode_minimal_prints_term() {
    emi()
        .args([
            "calculate",
            "--principal",
            "12000",
            "--rate",
            "0",
            "--installment",
            "1000",
            "--output",
            "minimal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("12"));
}

#[test]
fn test_calculate_rejects_both_modes() {
    emi()
        .args([
            "calculate",
            "--principal",
            "1000",
            "--rate",
            "5",
            "--years",
            "1",
            "--installment",
            "100",
        ])
        .assert()
        .failure();
}

#[test]
fn test_calculate_requires_a_mode() {
    emi()
        .args(["calculate", "--principal", "1000", "--rate", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one of --years or --installment"));
}

#[test]
fn test_calculate_from_stdin() {
    let assert = emi()
        .arg("calculate")
        .write_stdin(
            r#"{"principal": "1200", "annual_rate_percent": "0",
                "mode": {"installment": {"amount": "100"}}, "currency": "EUR"}"#,
        )
        .assert()
        .success();
    let value: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value["result"]["periods"], 12);
    assert_eq!(value["result"]["currency"], "EUR");
}

#[test]
fn test_calculate_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loan.json");
    fs::write(
        &path,
        r#"{"principal": "250000", "annual_rate_percent": "6.5",
            "mode": {"term": {"years": "30"}}}"#,
    )
    .unwrap();

    let value = run_json(&["calculate", "--input", path.to_str().unwrap()]);
    assert_eq!(value["result"]["periods"], 360);
    assert_eq!(value["result"]["currency"], "INR");
}

#[test]
fn test_currency_flag_applies_to_file_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loan.json");
    fs::write(
        &path,
        r#"{"principal": "1200", "annual_rate_percent": "0",
            "mode": {"term": {"years": "1"}}}"#,
    )
    .unwrap();

    let value = run_json(&[
        "--currency",
        "USD",
        "calculate",
        "--input",
        path.to_str().unwrap(),
    ]);
    assert_eq!(value["result"]["currency"], "USD");

    let sheet = dir.path().join("schedule.csv");
    let value = run_json(&[
        "--currency",
        "USD",
        "export",
        "--input",
        path.to_str().unwrap(),
        "--file",
        sheet.to_str().unwrap(),
    ]);
    assert_eq!(value["result"]["currency"], "USD");
    let contents = fs::read_to_string(&sheet).unwrap();
    assert!(contents.contains("Principal Amount,\"$1,200\""));
    assert!(!contents.contains('₹'));
}

#[test]
fn test_file_currency_wins_over_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loan.json");
    fs::write(
        &path,
        r#"{"principal": "1200", "annual_rate_percent": "0",
            "mode": {"term": {"years": "1"}}, "currency": "EUR"}"#,
    )
    .unwrap();

    emi()
        .args([
            "--currency",
            "USD",
            "calculate",
            "--input",
            path.to_str().unwrap(),
            "--output",
            "table",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("€1,200"))
        .stdout(predicate::str::contains("$1,200").not());
}

#[test]
fn test_calculate_missing_file() {
    emi()
        .args(["calculate", "--input", "does/not/exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_calculate_input_directory_rejected() {
    let dir = tempfile::tempdir().unwrap();
    emi()
        .args(["calculate", "--input", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a file"));
}

#[test]
fn test_malformed_stdin_rejected() {
    emi()
        .arg("calculate")
        .write_stdin("{\"principal\": ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse stdin"));
}

#[test]
fn test_fractional_term_warns() {
    let value = run_json(&[
        "calculate",
        "--principal",
        "10000",
        "--rate",
        "0",
        "--installment",
        "3000",
    ]);
    assert_eq!(value["result"]["periods"], 4);
    let warnings = value["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w.as_str().unwrap().contains("rounded up")));
}

#[test]
fn test_oversized_term_reports_error() {
    emi()
        .args([
            "installment",
            "--principal",
            "1000",
            "--rate",
            "5",
            "--years",
            "70000000000000000000000000000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("representable decimal range"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_growing_balance_schedule_reports_error() {
    emi()
        .args([
            "schedule",
            "--principal",
            "1000000000000000000",
            "--rate",
            "600",
            "--periods",
            "200",
            "--installment",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("representable decimal range"));
}

// ===========================================================================
// Display, charts, export
// ===========================================================================

#[test]
fn test_schedule_csv_rows() {
    let assert = emi()
        .args([
            "schedule",
            "--principal",
            "1200",
            "--rate",
            "0",
            "--periods",
            "12",
            "--installment",
            "100",
            "--output",
            "csv",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 13);
    assert!(lines[0].contains("period"));
    assert!(lines[0].contains("balance"));
}

#[test]
fn test_table_uses_currency_label() {
    emi()
        .args([
            "calculate",
            "--principal",
            "1200",
            "--rate",
            "0",
            "--years",
            "1",
            "--output",
            "table",
            "--currency",
            "USD",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("$1,200"))
        .stdout(predicate::str::contains("$100"));
}

#[test]
fn test_unknown_currency_rejected() {
    emi()
        .args(["currencies", "--currency", "XYZ"])
        .assert()
        .failure();
}

#[test]
fn test_charts_series() {
    let value = run_json(&[
        "charts",
        "--principal",
        "600",
        "--rate",
        "0",
        "--years",
        "0.5",
    ]);
    let result = &value["result"];
    assert_eq!(result["labels"].as_array().unwrap().len(), 6);
    assert_eq!(result["labels"][0], "Month 1");
    let total_interest =
        Decimal::from_str(result["split"]["total_interest"].as_str().unwrap()).unwrap();
    assert!(total_interest.is_zero());
}

#[test]
fn test_export_writes_spreadsheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.csv");

    let value = run_json(&[
        "export",
        "--principal",
        "1200",
        "--rate",
        "0",
        "--years",
        "1",
        "--currency",
        "GBP",
        "--file",
        path.to_str().unwrap(),
    ]);
    assert_eq!(value["result"]["rows"], 27);
    assert_eq!(value["result"]["currency"], "GBP");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Monthly Breakdown"));
    assert!(contents.contains("Total Amount,\"£1,200\""));
}

#[test]
fn test_currencies_listed() {
    emi()
        .args(["currencies", "--output", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INR"))
        .stdout(predicate::str::contains("UAE Dirham"));
}

#[test]
fn test_version() {
    emi()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("emi "));
}
