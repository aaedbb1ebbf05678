//! CLI integration tests.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn cliutil() -> Command {
    let mut cmd = cargo_bin_cmd!("cliutil");
    cmd.env_remove("CLIUTIL_TIMEZONE").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    cliutil()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("anchor"))
        .stdout(predicate::str::contains("range"))
        .stdout(predicate::str::contains("month"));
}

// ── range ───────────────────────────────────────────────────────────────────

#[test]
fn test_range_days() {
    cliutil()
        .args(["range", "2021-04-19", "3", "-f", "d"])
        .assert()
        .success()
        .stdout("2021-04-17 2021-04-19\n");
}

#[test]
fn test_range_weeks() {
    cliutil()
        .args(["range", "2021-04-19", "2", "--frequency", "week"])
        .assert()
        .success()
        .stdout("2021-04-12 2021-04-25\n");
}

#[test]
fn test_range_weeks_sunday_start() {
    cliutil()
        .args(["--week-start", "sunday", "range", "2021-04-19", "-f", "w"])
        .assert()
        .success()
        .stdout("2021-04-18 2021-04-24\n");
}

#[test]
fn test_range_default_records() {
    cliutil()
        .args(["range", "2021-04-05", "-f", "m", "--default-records", "2"])
        .assert()
        .success()
        .stdout("2021-03-01 2021-04-30\n");
}

#[test]
fn test_range_defaults_to_today() {
    cliutil()
        .arg("range")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^(\d{4}-\d{2}-\d{2}) (\d{4}-\d{2}-\d{2})\n$").unwrap());
}

#[test]
fn test_range_json() {
    let json = stdout_json(cliutil().args(["--json", "range", "2021-01-02", "2", "-f", "month"]));
    assert_eq!(json["start"], "2020-12-01");
    assert_eq!(json["end"], "2021-01-31");
    assert_eq!(json["nrecords"], 2);
    assert_eq!(json["frequency"], "month");
}

#[test]
fn test_range_invalid_date_fails() {
    cliutil()
        .args(["range", "2021-13-40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

// ── anchor ──────────────────────────────────────────────────────────────────

#[test]
fn test_anchor_literal_week() {
    cliutil()
        .args(["anchor", "2021-04-22", "-f", "week"])
        .assert()
        .success()
        .stdout("2021-04-19\n");
}

#[test]
fn test_anchor_literal_month() {
    cliutil()
        .args(["anchor", "2021-04-22", "-f", "m"])
        .assert()
        .success()
        .stdout("2021-04-01\n");
}

#[test]
fn test_anchor_negative_offset_is_accepted() {
    cliutil()
        .args(["anchor", "-1", "-f", "month"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d{4}-\d{2}-01\n$").unwrap());
}

#[test]
fn test_anchor_json() {
    let json = stdout_json(cliutil().args(["anchor", "2021-04-25", "-f", "w", "--json"]));
    assert_eq!(json["anchor"], "2021-04-19");
    assert_eq!(json["frequency"], "week");
}

#[test]
fn test_anchor_bad_offset_fails() {
    cliutil()
        .args(["anchor", "12x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid numeric offset"));
}

#[test]
fn test_invalid_timezone_fails() {
    cliutil()
        .args(["--timezone", "Mars/Olympus", "anchor", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_timezone_from_env() {
    cliutil()
        .env("CLIUTIL_TIMEZONE", "Mars/Olympus")
        .args(["anchor", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --timezone"));
}

// ── month ───────────────────────────────────────────────────────────────────

#[test]
fn test_month_empty_prints_nothing() {
    cliutil().arg("month").assert().success().stdout("");
}

#[test]
fn test_month_name() {
    cliutil()
        .args(["month", "mar"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d{4}-03-01\n$").unwrap());
}

#[test]
fn test_month_unknown_token_fails() {
    cliutil()
        .args(["month", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized month token"));
}

#[test]
fn test_month_empty_json_is_null() {
    let json = stdout_json(cliutil().args(["--json", "month"]));
    assert!(json["month"].is_null());
}

// ── text ────────────────────────────────────────────────────────────────────

#[test]
fn test_camel() {
    cliutil()
        .args(["camel", "PDFLoader"])
        .assert()
        .success()
        .stdout("PDF Loader\n");
}

#[test]
fn test_wrap() {
    cliutil()
        .args(["wrap", "abcdefghij", "--width", "4"])
        .assert()
        .success()
        .stdout("abcd\nefgh\nij\n");
}
