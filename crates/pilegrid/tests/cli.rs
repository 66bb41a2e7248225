use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

fn write_row(dir: &Path) -> std::path::PathBuf {
    // One row at y = 100 with a missing pile at x = 80 and two strays.
    let mut dets: Vec<Value> = [0.0, 20.0, 40.0, 60.0, 100.0, 120.0, 140.0]
        .iter()
        .map(|x| json!({"bbox": [x - 8.0, 92.0, 16.0, 16.0], "confidence": 0.9, "category_id": 1}))
        .collect();
    dets.push(json!({"bbox": [62.0, 292.0, 16.0, 16.0], "confidence": 0.3, "category_id": 1}));
    dets.push(json!({"bbox": [392.0, 32.0, 16.0, 16.0], "confidence": 0.2, "category_id": 1}));

    let path = dir.join("detections.json");
    fs::write(&path, serde_json::to_string(&dets).unwrap()).unwrap();
    path
}

fn write_config(dir: &Path, params: Value) -> std::path::PathBuf {
    let dets = write_row(dir);
    let cfg = json!({
        "detections_path": dets,
        "image": {"height": 480, "width": 640},
        "output_path": dir.join("report.json"),
        "params": params,
    });
    let path = dir.join("config.json");
    fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();
    path
}

#[test]
fn help_lists_options() {
    Command::cargo_bin("pilegrid")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--chains"))
        .stdout(predicate::str::contains("--log-level"));
}

#[test]
fn chain_run_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), json!({"chain_search_radius": 50.0}));

    Command::cargo_bin("pilegrid")
        .unwrap()
        .arg(&config)
        .arg("--chains")
        .assert()
        .success()
        .stdout(predicate::str::contains("9 -> 8 detections (added 1, removed 2)"));

    let report: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["diagnostics"]["pipeline"], "chains");
    assert_eq!(report["stats"]["corrected_count"], 8);
    assert_eq!(report["detections"].as_array().unwrap().len(), 8);
}

#[test]
fn output_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), json!({"use_grid_fill": false, "ransac_degree": 1}));
    let out = dir.path().join("elsewhere.json");

    Command::cargo_bin("pilegrid")
        .unwrap()
        .arg(&config)
        .args(["--log-level", "warn", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("9 -> 9 detections"));

    assert!(out.exists());
    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn invalid_params_fail() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), json!({"chain_min_length": 1}));

    Command::cargo_bin("pilegrid")
        .unwrap()
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("chain_min_length"));
}

#[test]
fn missing_config_fails() {
    Command::cargo_bin("pilegrid")
        .unwrap()
        .arg("/nonexistent/config.json")
        .assert()
        .failure();
}
