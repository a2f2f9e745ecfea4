//! End-to-end tests for the `perfcalc` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn perfcalc() -> Command {
    let mut cmd = Command::cargo_bin("perfcalc").unwrap();
    cmd.env_remove("PERFCALC_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const ACCOUNT: &str = r#"{
    "account_id": "ACC-1",
    "period": {"start": "2024-01-01", "end": "2024-12-31"},
    "valuations": [
        {"date": "2024-01-01", "value": 1000},
        {"date": "2024-06-29", "value": 1100},
        {"date": "2024-07-01", "value": 1600},
        {"date": "2024-12-31", "value": 1760}
    ],
    "cash_flows": [
        {"date": "2024-06-30", "amount": 500, "kind": "ClientContribution"},
        {"date": "2024-09-15", "amount": 16, "kind": "dividend"}
    ]
}"#;

#[test]
fn classify_known_kind() {
    perfcalc()
        .args(["classify", "client-contribution", "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ClientContribution\tExternal flow"));
}

#[test]
fn classify_all_lists_every_kind() {
    perfcalc()
        .args(["--format", "csv", "classify", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dividend"))
        .stdout(predicate::str::contains("CashSweep"));
}

#[test]
fn classify_unknown_kind_fails() {
    perfcalc()
        .args(["classify", "Bonus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown cash-flow kind: Bonus"));
}

#[test]
fn twr_minimal_output() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "account.json", ACCOUNT);

    perfcalc()
        .args(["twr", "--format", "minimal", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ACC-1\t0.199"));
}

#[test]
fn twr_json_output_for_many_accounts() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "accounts.json", &format!("[{ACCOUNT}, {ACCOUNT}]"));

    let output = perfcalc()
        .args(["--format", "json", "twr", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let accounts = parsed.as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0]["account_id"], "ACC-1");
    assert_eq!(accounts[0]["result"]["sub_periods"].as_array().unwrap().len(), 2);
}

#[test]
fn twr_table_with_sub_periods() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "account.json", ACCOUNT);

    perfcalc()
        .args(["twr", "--sub-periods", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Time-Weighted Return"))
        .stdout(predicate::str::contains("19.9000%"))
        .stdout(predicate::str::contains("Sub-periods: ACC-1"));
}

#[test]
fn missing_input_file_is_reported() {
    perfcalc()
        .args(["twr", "--input", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read does-not-exist.json"));
}

#[test]
fn malformed_input_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bad.json", r#"{"valuations": "nope"}"#);

    perfcalc()
        .args(["risk", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn risk_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "valuations.json",
        r#"{"valuations": [
            {"date": "2024-01-03", "value": 95},
            {"date": "2024-01-01", "value": 100},
            {"date": "2024-01-02", "value": 90},
            {"date": "2024-01-04", "value": 80},
            {"date": "2024-01-05", "value": 120}
        ]}"#,
    );

    let output = perfcalc()
        .args(["--format", "json", "risk", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["metrics"]["maximum_drawdown"].as_f64().unwrap(), 0.2);
}

#[test]
fn contribution_minimal_output() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "holdings.json",
        r#"{
            "period": {"start": "2024-01-01", "end": "2024-12-31"},
            "start_holdings": [{"ticker": "AAA", "value": 600}, {"ticker": "BBB", "value": 400}],
            "end_holdings": [{"ticker": "AAA", "value": 690}, {"ticker": "BBB", "value": 380}]
        }"#,
    );

    perfcalc()
        .args(["contribution", "--format", "minimal", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0.07"));
}

#[test]
fn attribution_requires_ids_without_sector() {
    perfcalc()
        .args(["attribution", "--input", "source.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--portfolio"));
}

#[test]
fn attribution_active_return() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "source.json",
        r#"{
            "portfolios": [{"id": "GROWTH", "positions": [{"instrument_id": "TECH", "units": 10}]}],
            "benchmarks": [{"id": "INDEX", "constituents": [
                {"instrument_id": "TECH", "weight": 0.5},
                {"instrument_id": "UTIL", "weight": 0.5}
            ]}],
            "prices": [
                {"instrument_id": "TECH", "date": "2024-01-01", "price": 100},
                {"instrument_id": "TECH", "date": "2024-12-31", "price": 110},
                {"instrument_id": "UTIL", "date": "2024-01-01", "price": 50},
                {"instrument_id": "UTIL", "date": "2024-12-31", "price": 51}
            ]
        }"#,
    );

    perfcalc()
        .args([
            "attribution", "--format", "minimal", "--portfolio", "GROWTH", "--benchmark", "INDEX",
            "--start", "2024-01-01", "--end", "2024-12-31", "--input",
        ])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0.04"));
}

#[test]
fn attribution_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "source.json", "{}");

    perfcalc()
        .args([
            "attribution", "-p", "GROWTH", "-b", "INDEX", "--start", "2024/01/01", "--end",
            "2024-12-31", "--input",
        ])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format: 2024/01/01"));
}

#[test]
fn sector_attribution_json() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "sectors.json",
        r#"{
            "portfolio": [{"security": "A", "sector": "Tech", "weight": 1, "return": 0.05}],
            "benchmark": [
                {"security": "A", "sector": "Tech", "weight": 0.5, "return": 0.05},
                {"security": "B", "sector": "Utilities", "weight": 0.5, "return": 0.01}
            ]
        }"#,
    );

    let output = perfcalc()
        .args(["--format", "json", "attribution", "--sector", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["sectors"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["total_effect"].as_f64().unwrap(), 0.02);
}

#[test]
fn config_init_then_validate() {
    let dir = TempDir::new().unwrap();

    let init = perfcalc().args(["config", "init"]).output().unwrap();
    assert!(init.status.success());
    let text = String::from_utf8(init.stdout).unwrap();
    assert!(text.contains("rolling_window = 30"));

    let path = write(&dir, "perfcalc.toml", &text);
    perfcalc()
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("is valid"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "perfcalc.toml", "var_confidence = 1.5\n");

    perfcalc()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("var_confidence"));
}

#[test]
fn config_from_env_is_shown() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "perfcalc.toml", "rolling_window = 20\n");

    perfcalc()
        .env("PERFCALC_CONFIG", &path)
        .args(["--format", "csv", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rolling_window,20"));
}
