//! Integration tests for the wkt binary.
//!
//! These tests verify end-to-end behavior including:
//! - Creating, checking off and resetting workouts
//! - Statistics output (text and JSON)
//! - CSV export
//! - Data persistence across runs

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("wkt"))
}

/// Add a workout and return the id printed by the CLI
fn add_workout(data_dir: &Path, name: &str, exercises: &[&str]) -> String {
    let mut cmd = cli();
    cmd.arg("add")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--name")
        .arg(name);
    for exercise in exercises {
        cmd.arg("--exercise").arg(exercise);
    }

    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&output);
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("✓ Added workout "))
        .expect("Add output should contain the new id")
        .trim()
        .to_string()
}

fn read_workouts(data_dir: &Path) -> Vec<Value> {
    let contents =
        fs::read_to_string(data_dir.join("workouts.json")).expect("Failed to read workouts");
    serde_json::from_str(&contents).expect("Workout file should be a JSON array")
}

fn stats_json(data_dir: &Path, extra_args: &[&str]) -> Value {
    let output = cli()
        .arg("stats")
        .arg("--json")
        .arg("--data-dir")
        .arg(data_dir)
        .args(extra_args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("Stats output should be JSON")
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout progress and statistics tracker",
        ));
}

#[test]
fn test_add_persists_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let id = add_workout(data_dir, "Push - Chest", &["Bench Press:3:8-12:90", "Dips:3:10"]);

    let workouts = read_workouts(data_dir);
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0]["id"], id.as_str());
    assert_eq!(workouts[0]["progress"], 0);
    assert_eq!(workouts[0]["exercises"][0]["sets"], 3);
    assert_eq!(workouts[0]["exercises"][0]["reps"], "8-12");
    assert!(workouts[0].get("createdAt").is_some());

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Push - Chest"));
}

#[test]
fn test_check_off_workout_end_to_end() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let id = add_workout(data_dir, "Full Body", &["Squat", "Row"]);

    cli()
        .args(["check", id.as_str(), "0", "--data-dir"])
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("at 50%"));
    let workouts = read_workouts(data_dir);
    assert_eq!(workouts[0]["completed"], false);
    assert!(workouts[0].get("completedAt").is_none());

    cli()
        .args(["check", id.as_str(), "1", "--data-dir"])
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout complete!"));
    let workouts = read_workouts(data_dir);
    assert_eq!(workouts[0]["progress"], 100);
    assert_eq!(workouts[0]["completed"], true);
    assert!(workouts[0]["completedAt"].is_string());

    cli()
        .args(["complete", id.as_str(), "--undo", "--data-dir"])
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout reopened"));
    let workouts = read_workouts(data_dir);
    assert_eq!(workouts[0]["progress"], 0);
    assert_eq!(workouts[0]["completed"], false);
    assert!(workouts[0].get("completedAt").is_none());
    assert_eq!(workouts[0]["exercises"][1]["completed"], false);
}

#[test]
fn test_reset_clears_progress() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let id = add_workout(data_dir, "Legs", &["Squat", "Lunge", "Calf Raise"]);

    cli()
        .args(["complete", id.as_str(), "--data-dir"])
        .arg(data_dir)
        .assert()
        .success();
    cli()
        .args(["reset", id.as_str(), "--data-dir"])
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("at 0%"));

    let workouts = read_workouts(data_dir);
    assert_eq!(workouts[0]["completed"], false);
}

#[test]
fn test_out_of_range_exercise_fails_without_changes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let id = add_workout(data_dir, "Legs", &["Squat"]);
    let before = fs::read_to_string(data_dir.join("workouts.json")).unwrap();

    cli()
        .args(["check", id.as_str(), "5", "--data-dir"])
        .arg(data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ExerciseOutOfRange"));

    let after = fs::read_to_string(data_dir.join("workouts.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_unknown_workout_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["complete", "does-not-exist", "--data-dir"])
        .arg(data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WorkoutNotFound"));

    assert!(!data_dir.join("workouts.json").exists());
}

#[test]
fn test_edit_and_remove() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let id = add_workout(data_dir, "Pull - Back", &["Row"]);

    cli()
        .args(["complete", id.as_str(), "--data-dir"])
        .arg(data_dir)
        .assert()
        .success();
    cli()
        .args(["edit", id.as_str(), "--exercise", "Row", "--exercise", "Pullup", "--data-dir"])
        .arg(data_dir)
        .assert()
        .success();

    let workouts = read_workouts(data_dir);
    assert_eq!(workouts[0]["exercises"].as_array().unwrap().len(), 2);
    assert_eq!(workouts[0]["progress"], 0);
    assert_eq!(workouts[0]["completed"], false);

    cli()
        .args(["remove", id.as_str(), "--data-dir"])
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));
    assert!(read_workouts(data_dir).is_empty());
}

#[test]
fn test_stats_on_empty_store() {
    let temp_dir = setup_test_dir();
    let stats = stats_json(temp_dir.path(), &[]);

    assert_eq!(stats["totalWorkouts"], 0);
    assert_eq!(stats["averageDuration"], 0);
    assert_eq!(stats["streakDays"], 0);
    assert_eq!(stats["completionRate"], 0);
    assert_eq!(stats["weeklyTrend"], "stable");

    let activity = stats["weeklyActivity"].as_array().unwrap();
    assert_eq!(activity.len(), 7);
    assert_eq!(
        activity.iter().filter(|d| d["isToday"] == true).count(),
        1
    );
}

#[test]
fn test_stats_after_completing_today() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let id = add_workout(data_dir, "Push - Chest", &["Bench"]);
    add_workout(data_dir, "Morning Run", &["Run"]);

    cli()
        .args(["check", id.as_str(), "0", "--data-dir"])
        .arg(data_dir)
        .assert()
        .success();

    let stats = stats_json(data_dir, &["--period", "week"]);
    assert_eq!(stats["period"], "week");
    assert_eq!(stats["totalWorkouts"], 1);
    assert_eq!(stats["streakDays"], 1);
    assert_eq!(stats["completionRate"], 50);
    assert_eq!(stats["weeklyTrend"], "up");
    assert_eq!(stats["muscleGroupDistribution"][0]["name"], "Chest");
    assert_eq!(stats["weeklyActivity"][6]["count"], 1);

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak: 1 days"));
}

#[test]
fn test_config_default_period() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[stats]\ndefault_period = \"year\"\n").unwrap();

    let stats = stats_json(
        temp_dir.path(),
        &["--config", config_path.to_str().unwrap()],
    );
    assert_eq!(stats["period"], "year");
}

#[test]
fn test_invalid_period_is_rejected() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["stats", "--period", "fortnight", "--data-dir"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown period"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add_workout(data_dir, "Push - Chest", &["Bench"]);
    add_workout(data_dir, "Lower + Legs", &["Squat"]);

    let csv_path = data_dir.join("export.csv");
    cli()
        .arg("export")
        .arg("--out")
        .arg(&csv_path)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 workouts"));

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv_content.starts_with("id,name,day,completed"));
    assert!(csv_content.contains(",Legs\n"));
}
