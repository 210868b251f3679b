//! Integration tests for the fittrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Session start / pause / resume / end workflow
//! - Snapshot persistence across runs
//! - History logging, stats and personal records
//! - Recommendations

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary pointed at an isolated data directory
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fittrack"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn snapshot(data_dir: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(data_dir.join("store/workout-storage.json"))
        .expect("Failed to read snapshot");
    serde_json::from_str(&raw).expect("Snapshot is not JSON")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("fittrack"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout session tracker and exercise recommender",
        ));
}

#[test]
fn test_start_writes_snapshot() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "--session-id", "s1"])
        .args(["--exercise", "Back Squat", "--exercise", "Plank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session s1 started"))
        .stdout(predicate::str::contains("[back_squat]"));

    let json = snapshot(data_dir);
    assert_eq!(json["sessionId"], "s1");
    assert_eq!(json["isPaused"], false);
    assert!(json["pausedAt"].is_null());
    assert_eq!(json["currentExerciseId"], "back_squat");
    assert_eq!(json["exercises"].as_array().unwrap().len(), 2);
    assert_eq!(json["exercises"][1]["id"], "plank");
}

#[test]
fn test_custom_and_duplicate_exercises_get_unique_ids() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "--exercise", "Plank", "--exercise", "plank"])
        .args(["--exercise", "Sled Push"])
        .assert()
        .success();

    let json = snapshot(data_dir);
    let ids: Vec<&str> = json["exercises"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["plank", "plank_2", "sled_push"]);
}

#[test]
fn test_pause_and_resume_persist() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "--session-id", "s1"]).assert().success();

    cli(data_dir)
        .arg("pause")
        .assert()
        .success()
        .stdout(predicate::str::contains("Paused at 00:0"));

    let json = snapshot(data_dir);
    assert_eq!(json["isPaused"], true);
    assert!(json["pausedAt"].is_string());

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("(Paused)"));

    cli(data_dir)
        .arg("resume")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resumed"));

    let json = snapshot(data_dir);
    assert_eq!(json["isPaused"], false);
    assert!(json["pausedAt"].is_null());
    assert_eq!(json["pausePeriods"].as_array().unwrap().len(), 1);

    cli(data_dir)
        .arg("resume")
        .assert()
        .success()
        .stdout(predicate::str::contains("already running"));
}

#[test]
fn test_commands_without_session_are_no_ops() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for cmd in ["pause", "resume", "status", "end"] {
        cli(data_dir)
            .arg(cmd)
            .assert()
            .success()
            .stdout(predicate::str::contains("No active session"));
    }

    assert!(!data_dir.join("store/workout-storage.json").exists());
}

#[test]
fn test_log_set_uses_current_exercise() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "--exercise", "Back Squat", "--exercise", "Plank"])
        .assert()
        .success();

    cli(data_dir)
        .args(["current", "Back Squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current exercise: back_squat"));

    cli(data_dir)
        .args(["log-set", "--reps", "5", "--weight", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Back Squat set 1: 5 × 100"))
        .stdout(predicate::str::contains("Rest 3m"));

    cli(data_dir)
        .args(["log-set", "--reps", "8", "--weight", "90", "--rir", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set 2"))
        .stdout(predicate::str::contains("Rest 1m 30s"));

    let json = snapshot(data_dir);
    let sets = json["exercises"][0]["sets"].as_array().unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[1]["setNumber"], 2);
    assert_eq!(sets[1]["rir"], 2);
    assert!(json["exercises"][1]["sets"].as_array().unwrap().is_empty());
}

#[test]
fn test_log_set_rejects_invalid_input() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "--exercise", "Plank"])
        .assert()
        .success();

    cli(data_dir)
        .args(["log-set", "--exercise", "plank", "--reps", "0"])
        .assert()
        .failure();

    cli(data_dir)
        .args(["log-set", "--exercise", "plank", "--reps", "5", "--rir", "11"])
        .assert()
        .failure();

    let json = snapshot(data_dir);
    assert!(json["exercises"][0]["sets"].as_array().unwrap().is_empty());
}

#[test]
fn test_log_set_unknown_exercise_is_ignored() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "--exercise", "Plank"])
        .assert()
        .success();

    cli(data_dir)
        .args(["log-set", "--exercise", "Deadlift", "--reps", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing logged"));
}

#[test]
fn test_exercises_update_keeps_logged_sets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "--exercise", "Back Squat", "--exercise", "Plank"])
        .assert()
        .success();
    cli(data_dir)
        .args(["log-set", "--exercise", "back_squat", "--reps", "5", "--weight", "100"])
        .assert()
        .success();

    cli(data_dir)
        .args(["exercises", "--exercise", "Goblet Squat", "--exercise", "Back Squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 exercises"));

    let json = snapshot(data_dir);
    assert_eq!(json["exercises"][0]["id"], "goblet_squat");
    assert_eq!(json["exercises"][1]["id"], "back_squat");
    assert_eq!(json["exercises"][1]["sets"].as_array().unwrap().len(), 1);
}

#[test]
fn test_end_logs_history_and_clears_snapshot() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "--session-id", "leg-day", "--exercise", "Back Squat"])
        .assert()
        .success();
    cli(data_dir)
        .args(["log-set", "--exercise", "Back Squat", "--reps", "5", "--weight", "100"])
        .assert()
        .success();

    cli(data_dir)
        .arg("end")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session logged"))
        .stdout(predicate::str::contains("Sets: 1  Reps: 5"))
        .stdout(predicate::str::contains("Volume: 500.0"));

    assert!(!data_dir.join("store/workout-storage.json").exists());

    let history = fs::read_to_string(data_dir.join("history/sessions.jsonl"))
        .expect("Failed to read history");
    let line: serde_json::Value = serde_json::from_str(history.lines().next().unwrap()).unwrap();
    assert_eq!(line["sessionId"], "leg-day");
    assert_eq!(line["totalVolume"], 500.0);
}

#[test]
fn test_end_discard_skips_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").assert().success();
    cli(data_dir)
        .args(["end", "--discard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("discarded"));

    assert!(!data_dir.join("store/workout-storage.json").exists());
    assert!(!data_dir.join("history/sessions.jsonl").exists());
}

#[test]
fn test_start_replaces_unfinished_session() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "--session-id", "old"]).assert().success();
    cli(data_dir)
        .args(["start", "--session-id", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replacing unfinished session old"));

    assert_eq!(snapshot(data_dir)["sessionId"], "new");
}

#[test]
fn test_focus_resyncs_running_timer() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("focus")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing running"));

    cli(data_dir).arg("start").assert().success();
    cli(data_dir)
        .arg("focus")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer resynced: 00:0"));

    cli(data_dir).arg("pause").assert().success();
    cli(data_dir)
        .arg("focus")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing running"));
}

#[test]
fn test_suggest_excludes_session_exercises() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["suggest", "--tags", "Chest", "--equipment", "Dumbbells"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dumbbell Bench Press"))
        .stdout(predicate::str::contains("Barbell Bench Press").not());

    cli(data_dir)
        .args(["start", "--exercise", "Dumbbell Bench Press"])
        .assert()
        .success();

    cli(data_dir)
        .args(["suggest", "--tags", "Chest", "--equipment", "Dumbbells"])
        .arg("--explain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dumbbell Bench Press").not())
        .stdout(predicate::str::contains("Push-up"));
}

fn log_session(data_dir: &Path, exercise: &str, reps: &str, weight: &str) {
    cli(data_dir).args(["start", "--exercise", exercise]).assert().success();
    cli(data_dir)
        .args(["log-set", "--exercise", exercise, "--reps", reps, "--weight", weight])
        .assert()
        .success();
}

#[test]
fn test_records_track_best_sets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("records")
        .assert()
        .success()
        .stdout(predicate::str::contains("No personal records yet"));

    log_session(data_dir, "Back Squat", "5", "100");
    cli(data_dir)
        .arg("end")
        .assert()
        .success()
        .stdout(predicate::str::contains("New personal records"))
        .stdout(predicate::str::contains("Back Squat"));

    log_session(data_dir, "Back Squat", "5", "90");
    cli(data_dir)
        .arg("end")
        .assert()
        .success()
        .stdout(predicate::str::contains("New personal records").not());

    cli(data_dir)
        .arg("records")
        .assert()
        .success()
        .stdout(predicate::str::contains("100 × 5"))
        .stdout(predicate::str::contains("est. 1RM 116.7"));
}

#[test]
fn test_status_shows_estimated_max() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_session(data_dir, "Back Squat", "5", "100");

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Back Squat: 1 sets (est. 1RM 116.7)"));
}

#[test]
fn test_stats_with_huge_window_covers_all_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_session(data_dir, "Back Squat", "5", "100");
    cli(data_dir).arg("end").assert().success();

    cli(data_dir)
        .args(["stats", "--days", "9999999999999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions: 1"));

    cli(data_dir)
        .args(["stats", "--days", &i64::MAX.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions: 1"));
}

#[test]
fn test_out_of_range_history_days_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let config_dir = data_dir.join("config/fittrack");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[recommendations]\nhistory_days = 9223372036854775807\n",
    )
    .unwrap();

    cli(data_dir)
        .args(["suggest", "-t", "Chest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("history_days"));
}

#[test]
fn test_stats_reports_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions"));

    cli(data_dir).args(["start", "--exercise", "Back Squat"]).assert().success();
    cli(data_dir)
        .args(["log-set", "--exercise", "Back Squat", "--reps", "5", "--weight", "100"])
        .assert()
        .success();
    cli(data_dir).arg("end").assert().success();

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions: 1"))
        .stdout(predicate::str::contains("Total volume: 500.0"))
        .stdout(predicate::str::contains("Best estimated 1RM: Back Squat"));
}

#[test]
fn test_catalog_filters() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["catalog", "--muscle", "Calves"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Standing Calf Raise"))
        .stdout(predicate::str::contains("Plank").not());

    cli(data_dir)
        .args(["catalog", "--search", "squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Back Squat"))
        .stdout(predicate::str::contains("Goblet Squat"));

    cli(data_dir)
        .args(["catalog", "--search", "squat", "--muscle", "Quads"])
        .args(["--equipment", "Dumbbells"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goblet Squat"))
        .stdout(predicate::str::contains("Back Squat").not());
}

#[test]
fn test_config_pause_accounting_wall_clock() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let config_dir = data_dir.join("config/fittrack");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[session]\npause_accounting = \"wall_clock\"\n",
    )
    .unwrap();

    cli(data_dir).arg("start").assert().success();
    cli(data_dir).arg("pause").assert().success();
    cli(data_dir).arg("resume").assert().success();

    // Wall-clock accounting keeps no pause history
    let json = snapshot(data_dir);
    assert!(json
        .get("pausePeriods")
        .and_then(|p| p.as_array())
        .map_or(true, |p| p.is_empty()));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let config_dir = data_dir.join("config/fittrack");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[recommendations]\nmoderate_fatigue_volume = 9000.0\nhigh_fatigue_volume = 100.0\n").unwrap();

    cli(data_dir).arg("status").assert().failure();
}
