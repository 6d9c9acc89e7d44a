//! Integration tests for the recibo binary (offline commands only).

use assert_cmd::Command;
use predicates::prelude::*;

fn recibo() -> Command {
    Command::cargo_bin("recibo").unwrap()
}

const STRUCTURED: &str = r#"{
    "prediction": {
        "supplier_name": {"value": "Carrefour"},
        "date": {"value": "07/08/2025"},
        "total_amount": {"value": "12,50"}
    }
}"#;

#[test]
fn normalize_structured_response() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.json");
    std::fs::write(&input, STRUCTURED).unwrap();

    recibo()
        .arg("normalize")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""supplier":"Carrefour""#))
        .stdout(predicate::str::contains(r#""dateISO":"2025-08-07""#))
        .stdout(predicate::str::contains(r#""total":12.5"#));
}

#[test]
fn normalize_without_prediction_emits_empty_triple() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.json");
    std::fs::write(&input, r#"{"status": "done", "id": "abc123"}"#).unwrap();

    recibo()
        .arg("normalize")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""supplier":"""#))
        .stdout(predicate::str::contains(r#""dateISO":null"#))
        .stdout(predicate::str::contains(r#""total":null"#));
}

#[test]
fn normalize_debug_reports_missing_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.json");
    std::fs::write(&input, r#"{"status": "done"}"#).unwrap();

    recibo()
        .arg("normalize")
        .arg(&input)
        .arg("--debug")
        .assert()
        .success()
        .stdout(predicate::str::contains("prediction not found"));
}

#[test]
fn normalize_rejects_non_object_root() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.json");
    std::fs::write(&input, "[1, 2, 3]").unwrap();

    recibo()
        .arg("normalize")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unusable recognition payload"));
}

#[test]
fn batch_writes_summary_csv() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.json"), STRUCTURED).unwrap();
    std::fs::write(
        dir.path().join("b.json"),
        r#"{"ocr": {"text": "Total à payer 45,90 €"}}"#,
    )
    .unwrap();
    let summary = dir.path().join("summary.csv");

    recibo()
        .arg("batch")
        .arg(format!("{}/*.json", dir.path().display()))
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&summary).unwrap();
    assert!(csv.contains("Carrefour"));
    assert!(csv.contains("45.90"));
}

#[test]
fn config_show_prints_defaults() {
    recibo()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reservation_penalty"));
}

#[test]
fn missing_input_fails() {
    recibo()
        .args(["normalize", "/no/such/file.json"])
        .assert()
        .failure();
}
