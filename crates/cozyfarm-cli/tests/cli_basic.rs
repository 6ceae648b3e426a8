//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary home directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cozyfarm-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("COZYFARM_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command, expect success and parse stdout as JSON.
fn run_json(home: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

fn adopt(home: &Path, animal_type: &str, name: &str) -> String {
    let animal = run_json(
        home,
        &["animal", "create", "--type", animal_type, "--name", name, "--habit", "Read"],
    );
    animal["id"].as_str().unwrap().to_string()
}

#[test]
fn test_init_is_idempotent() {
    let home = tempfile::tempdir().unwrap();
    let first = run_json(home.path(), &["init"]);
    assert_eq!(first["created"], true);
    assert_eq!(first["user"]["coins"], 0);

    let second = run_json(home.path(), &["init"]);
    assert_eq!(second["created"], false);
    assert_eq!(second["user"]["id"], first["user"]["id"]);
}

#[test]
fn test_onboard() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["init"]);
    let user = run_json(home.path(), &["onboard"]);
    assert_eq!(user["hasCompletedOnboarding"], true);
}

#[test]
fn test_species_catalog() {
    let home = tempfile::tempdir().unwrap();
    let species = run_json(home.path(), &["animal", "species"]);
    let names: Vec<&str> = species
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["displayName"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Kitty", "Bunny", "Bear", "Fox", "Duckling", "Hamster"]);
}

#[test]
fn test_animal_create_and_list() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["init"]);
    let id = adopt(home.path(), "bunny", "Clover");

    let list = run_json(home.path(), &["animal", "list"]);
    let animals = list.as_array().unwrap();
    assert_eq!(animals.len(), 1);
    assert_eq!(animals[0]["id"], id.as_str());
    assert_eq!(animals[0]["type"], "bunny");
    assert_eq!(animals[0]["level"], 1);
}

#[test]
fn test_animal_create_rejects_unknown_species() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(
        home.path(),
        &["animal", "create", "--type", "dragon", "--name", "Smaug", "--habit", "Hoard"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_checkin_once_per_day() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["init"]);
    let id = adopt(home.path(), "cat", "Mochi");

    let can = run_json(home.path(), &["can-checkin", &id]);
    assert_eq!(can["canCheckIn"], true);

    let first = run_json(home.path(), &["checkin", &id]);
    assert_eq!(first["reward"]["xpEarned"], 10);
    assert_eq!(first["reward"]["coinsEarned"], 5);
    assert_eq!(first["coins"], 5);
    assert_eq!(first["animal"]["checkInStreak"], 1);

    let second = run_json(home.path(), &["checkin", &id]);
    assert_eq!(second["reward"]["xpEarned"], 0);
    assert_eq!(second["coins"], 5);

    let can = run_json(home.path(), &["can-checkin", &id]);
    assert_eq!(can["canCheckIn"], false);
}

#[test]
fn test_animal_show() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["init"]);
    let id = adopt(home.path(), "fox", "Ember");
    run_json(home.path(), &["checkin", &id]);

    let shown = run_json(home.path(), &["animal", "show", &id]);
    assert_eq!(shown["habit"]["description"], "Read");
    assert_eq!(shown["species"]["displayName"], "Fox");
    assert_eq!(shown["progress"]["level"], 2);
    assert_eq!(shown["mood"], "Ember is doing well.");

    let (_, stderr, code) = run_cli(home.path(), &["animal", "show", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("animal not found"));
}

#[test]
fn test_coins_spend() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["init"]);
    run_json(home.path(), &["coins", "add", "12"]);

    let (stdout, _, code) = run_cli(home.path(), &["coins", "spend", "13"]);
    assert_eq!(code, 1);
    let refused: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(refused["spent"], false);
    assert_eq!(refused["coins"], 12);

    let spent = run_json(home.path(), &["coins", "spend", "12"]);
    assert_eq!(spent["spent"], true);
    assert_eq!(spent["coins"], 0);

    let balance = run_json(home.path(), &["coins", "balance"]);
    assert_eq!(balance["coins"], 0);
}

#[test]
fn test_refresh_reports_changes() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["init"]);
    adopt(home.path(), "duck", "Puddle");

    let refreshed = run_json(home.path(), &["refresh"]);
    assert_eq!(refreshed["changed"], 0);
    assert_eq!(refreshed["animals"][0]["state"], "resting");
}

#[test]
fn test_farm_capacity() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["config", "set", "farm.max_animals", "1"]);
    adopt(home.path(), "bear", "Honey");

    let (_, stderr, code) = run_cli(
        home.path(),
        &["animal", "create", "--type", "cat", "--name", "Extra", "--habit", "Nap"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Farm is full"));
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "rewards.xp_per_check_in"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");

    let set = run_json(home.path(), &["config", "set", "rewards.xp_per_check_in", "20"]);
    assert_eq!(set["value"], "20");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "refresh.interval_secs", "0"]);
    assert_eq!(code, 1);

    let (_, _, code) = run_cli(home.path(), &["config", "get", "rewards.nope"]);
    assert_eq!(code, 1);

    let config = run_json(home.path(), &["config", "reset"]);
    assert_eq!(config["rewards"]["xp_per_check_in"], 10);
}
