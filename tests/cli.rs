//! End-to-end tests for the home-exercises binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("home-exercises").unwrap();
    cmd.env_remove("NUMBER_PRECISION")
        .env_remove("NUMBER_SCALE")
        .env_remove("NUMBER_ONLY_POSITIVE")
        .env_remove("RUST_LOG");
    cmd
}

const IVAN: &str = r#"{
    "name": "Ivan IV The Terrible", "age": 54, "height": 170, "weight": 70,
    "parent": {"name": "Vasili III of Russia", "age": 28, "height": 170, "weight": 60}
}"#;

// ==================== CHECK ====================

#[test]
fn test_check_all_valid() {
    cmd()
        .args(["check", "--precision", "4", "--scale", "2", "--only-positive", "+1.23", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+1.23\tvalid"))
        .stdout(predicate::str::contains("0\tvalid"));
}

#[test]
fn test_check_reports_invalid_values() {
    cmd()
        .args(["check", "-p", "3", "-s", "2", "--only-positive", "00.00", "a.sd"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("00.00\tinvalid (4 digits"))
        .stdout(predicate::str::contains("a.sd\tinvalid (value is not a decimal number)"));
}

#[test]
fn test_check_negative_value_argument() {
    cmd()
        .args(["check", "--format", "N(17.2)", "--only-positive", "--", "-12,3"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("negative values are not allowed"));

    cmd()
        .args(["check", "--format", "N(17.2)", "--", "-12,3"])
        .assert()
        .success();
}

#[test]
fn test_check_rejects_bad_configuration() {
    cmd()
        .args(["check", "--precision", "3", "--scale", "3", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid number format"));

    cmd()
        .args(["check", "--format", "N(0)", "1"])
        .assert()
        .failure();
}

#[test]
fn test_check_rejects_format_mixed_with_precision() {
    cmd()
        .args(["check", "--format", "N(17.2)", "--precision", "3", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));

    cmd()
        .args(["check", "--format", "N(17.2)", "--scale", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_check_requires_precision_or_format() {
    cmd()
        .args(["check", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--precision or --format"));
}

#[test]
fn test_check_reads_csv_and_prints_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("values.csv");
    fs::write(&path, "value\n0.0\n0.000\n").unwrap();

    let output = cmd()
        .args(["check", "--format", "N(17.2)", "--json", "--input"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["valid"], true);
    assert_eq!(rows[1]["valid"], false);
    assert_eq!(rows[1]["rejection"]["kind"], "too_many_fraction_digits");
}

#[test]
fn test_check_reads_precision_from_env() {
    cmd()
        .env("NUMBER_PRECISION", "2")
        .args(["check", "12", "123"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("12\tvalid"))
        .stdout(predicate::str::contains("123\tinvalid"));
}

// ==================== COMPARE ====================

#[test]
fn test_compare_equal_records() {
    let dir = TempDir::new().unwrap();
    let actual = dir.path().join("actual.json");
    let expected = dir.path().join("expected.json");
    fs::write(&actual, IVAN).unwrap();
    fs::write(&expected, IVAN.replace("\"name\": \"Ivan", "\"id\": 42, \"name\": \"Ivan")).unwrap();

    cmd()
        .arg("compare")
        .arg(&actual)
        .arg(&expected)
        .assert()
        .success()
        .stdout(predicate::str::diff("equal\n"));
}

#[test]
fn test_compare_reports_first_difference() {
    let dir = TempDir::new().unwrap();
    let actual = dir.path().join("actual.json");
    let expected = dir.path().join("expected.json");
    fs::write(&actual, IVAN).unwrap();
    fs::write(&expected, IVAN.replace("\"age\": 28", "\"age\": 29")).unwrap();

    cmd()
        .arg("compare")
        .arg(&actual)
        .arg(&expected)
        .assert()
        .failure()
        .stdout(predicate::str::contains("not equal: parent.age: expected 29 but found 28"));
}

#[test]
fn test_compare_with_custom_exclusions() {
    let dir = TempDir::new().unwrap();
    let actual = dir.path().join("actual.json");
    let expected = dir.path().join("expected.json");
    fs::write(&actual, IVAN).unwrap();
    fs::write(&expected, IVAN.replace("\"age\": 28", "\"age\": 29")).unwrap();

    cmd()
        .arg("compare")
        .arg(&actual)
        .arg(&expected)
        .args(["--exclude-everywhere", "id", "--exclude", "parent.age"])
        .assert()
        .success();
}

#[test]
fn test_compare_missing_file() {
    let dir = TempDir::new().unwrap();
    let actual = dir.path().join("actual.json");
    fs::write(&actual, IVAN).unwrap();

    cmd()
        .arg("compare")
        .arg(&actual)
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
