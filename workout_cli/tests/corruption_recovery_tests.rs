//! Corruption recovery tests for fittrack.
//!
//! These tests verify the system can handle:
//! - Corrupted session snapshots
//! - Corrupted history logs
//! - Missing or empty files

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use std::path::Path;
use tempfile::TempDir;

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fittrack"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_snapshot_starts_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::create_dir_all(data_dir.join("store")).unwrap();
    fs::write(
        data_dir.join("store/workout-storage.json"),
        "{ invalid json }}}}",
    )
    .expect("Failed to write corrupted snapshot");

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session"));

    // A fresh session overwrites the bad snapshot
    cli(data_dir)
        .args(["start", "--session-id", "fresh"])
        .assert()
        .success();

    let raw = fs::read_to_string(data_dir.join("store/workout-storage.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["sessionId"], "fresh");
}

#[test]
fn test_snapshot_missing_required_fields() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::create_dir_all(data_dir.join("store")).unwrap();
    fs::write(
        data_dir.join("store/workout-storage.json"),
        r#"{"exercises": [], "isPaused": false}"#,
    )
    .unwrap();

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session"));
}

#[test]
fn test_snapshot_written_by_app_is_restored() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // Older snapshots carry no pausePeriods field
    fs::create_dir_all(data_dir.join("store")).unwrap();
    fs::write(
        data_dir.join("store/workout-storage.json"),
        r#"{
            "sessionId": "from-app",
            "startedAt": "2024-01-01T10:00:00Z",
            "currentExerciseId": null,
            "exercises": [{"id": "plank", "name": "Plank", "sortOrder": 0, "sets": []}],
            "isPaused": true,
            "pausedAt": "2024-01-01T10:20:00Z"
        }"#,
    )
    .unwrap();

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session from-app (Paused)"))
        .stdout(predicate::str::contains("Elapsed: 20:00"));
}

#[test]
fn test_corrupted_history_lines_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "--exercise", "Back Squat"])
        .assert()
        .success();
    cli(data_dir)
        .args(["log-set", "--exercise", "Back Squat", "--reps", "5", "--weight", "100"])
        .assert()
        .success();
    cli(data_dir).arg("end").assert().success();

    // Simulate a crash mid-write
    let log_path = data_dir.join("history/sessions.jsonl");
    {
        let mut file = fs::OpenOptions::new().append(true).open(&log_path).unwrap();
        write!(file, "{{\"id\": \"partial").unwrap();
    }

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions: 1"));

    cli(data_dir)
        .arg("records")
        .assert()
        .success()
        .stdout(predicate::str::contains("Back Squat"));
}

#[test]
fn test_suggest_with_unreadable_history_lines() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::create_dir_all(data_dir.join("history")).unwrap();
    fs::write(
        data_dir.join("history/sessions.jsonl"),
        "{ invalid json }\n{ more invalid }",
    )
    .unwrap();

    cli(data_dir)
        .args(["suggest", "--tags", "Back"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pull-up"));
}

#[test]
fn test_empty_files() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::create_dir_all(data_dir.join("store")).unwrap();
    fs::create_dir_all(data_dir.join("history")).unwrap();
    fs::write(data_dir.join("store/workout-storage.json"), "").unwrap();
    fs::write(data_dir.join("history/sessions.jsonl"), "").unwrap();

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session"));

    cli(data_dir)
        .arg("records")
        .assert()
        .success()
        .stdout(predicate::str::contains("No personal records yet"));
}

#[test]
fn test_missing_catalog_file_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let config_dir = data_dir.join("config/fittrack");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!(
            "[data]\ndata_dir = {:?}\ncatalog_path = {:?}\n",
            data_dir.display().to_string(),
            data_dir.join("nope.json").display().to_string()
        ),
    )
    .unwrap();

    cli(data_dir).args(["catalog"]).assert().failure();
}
