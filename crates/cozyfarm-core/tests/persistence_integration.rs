//! Integration tests for snapshot persistence across farm restarts.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use cozyfarm_core::storage::SNAPSHOT_KEY;
use cozyfarm_core::{
    AnimalState, AnimalType, Calendar, Config, CoreError, Database, Farm, IntegrityError,
    ManualClock, MemoryStore,
};

fn calendar() -> (Calendar, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap(),
    ));
    (Calendar::new(clock.clone()), clock)
}

#[test]
fn farm_survives_a_restart_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cozyfarm.db");
    let (cal, clock) = calendar();

    let id = {
        let db = Database::open_at(&path).unwrap();
        let mut farm = Farm::open(&Config::default(), cal.clone(), Box::new(db)).unwrap();
        farm.initialize_user().unwrap();
        let id = farm
            .create_animal_and_habit(AnimalType::Fox, "Juniper", "Practice guitar")
            .unwrap();
        farm.check_in(&id).unwrap();
        id
    };

    clock.advance_days(1);
    let db = Database::open_at(&path).unwrap();
    let mut farm = Farm::open(&Config::default(), cal, Box::new(db)).unwrap();
    let animal = farm.animal_by_id(&id).unwrap();
    assert_eq!(animal.name, "Juniper");
    assert_eq!(animal.experience, 10);
    assert_eq!(farm.coins(), 5);
    assert_eq!(farm.habit_by_animal_id(&id).unwrap().description, "Practice guitar");

    farm.check_in(&id).unwrap();
    assert_eq!(farm.animal_by_id(&id).unwrap().check_in_streak, 2);
}

#[test]
fn every_mutation_is_saved() {
    let store = MemoryStore::new();
    let (cal, _) = calendar();
    let mut farm = Farm::open(&Config::default(), cal, Box::new(store.clone())).unwrap();
    assert_eq!(store.write_count(), 0);

    farm.initialize_user().unwrap();
    assert_eq!(store.write_count(), 1);
    let id = farm
        .create_animal_and_habit(AnimalType::Cat, "Miso", "Tidy desk")
        .unwrap();
    assert_eq!(store.write_count(), 2);
    farm.check_in(&id).unwrap();
    assert_eq!(store.write_count(), 3);

    // Refused operations write nothing.
    farm.check_in(&id).unwrap();
    farm.spend_coins(99).unwrap();
    assert_eq!(store.write_count(), 3);

    let saved: serde_json::Value = serde_json::from_str(&store.contents().unwrap()).unwrap();
    assert_eq!(saved["user"]["coins"], 5);
    assert_eq!(saved["animals"][0]["type"], "cat");
    assert_eq!(saved["animals"][0]["checkInStreak"], 1);
    assert_eq!(saved["habits"][0]["animalId"], id.as_str());
}

#[test]
fn corrupted_snapshot_starts_an_empty_farm() {
    let (cal, _) = calendar();
    let store = MemoryStore::with_contents("this is not json");
    let farm = Farm::open(&Config::default(), cal, Box::new(store)).unwrap();
    assert!(farm.user().is_none());
    assert!(farm.animals().is_empty());
}

#[test]
fn snapshot_lives_under_the_namespaced_key() {
    let db = Database::open_memory().unwrap();
    db.kv_set(SNAPSHOT_KEY, r#"{"user":null,"animals":[],"habits":[],"decorations":[]}"#)
        .unwrap();
    let (cal, _) = calendar();
    let farm = Farm::open(&Config::default(), cal, Box::new(db)).unwrap();
    assert!(farm.animals().is_empty());
}

#[test]
fn animal_without_habit_is_rejected_on_load() {
    let raw = r#"{
        "user": null,
        "animals": [{
            "id": "a1",
            "type": "duck",
            "name": "Waddles",
            "habitId": "h1",
            "state": "neutral",
            "level": 1,
            "experience": 0,
            "lastCheckIn": null,
            "checkInStreak": 0,
            "createdAt": "2026-06-01T00:00:00Z"
        }],
        "habits": [],
        "decorations": []
    }"#;
    let (cal, _) = calendar();
    let err = Farm::open(&Config::default(), cal, Box::new(MemoryStore::with_contents(raw)))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        CoreError::Integrity(IntegrityError::MissingHabit { .. })
    ));
}

#[test]
fn startup_refresh_reclassifies_and_saves() {
    let raw = r#"{
        "user": {"id": "u1", "coins": 40, "createdAt": "2026-05-01T00:00:00Z", "hasCompletedOnboarding": true},
        "animals": [{
            "id": "a1",
            "type": "bear",
            "name": "Maple",
            "habitId": "h1",
            "state": "thriving",
            "level": 1,
            "experience": 120,
            "lastCheckIn": "2026-06-09T18:00:00Z",
            "checkInStreak": 9,
            "createdAt": "2026-05-01T00:00:00Z"
        }],
        "habits": [{"id": "h1", "description": "Yoga", "animalId": "a1", "createdAt": "2026-05-01T00:00:00Z"}],
        "decorations": [{"id": "d1", "type": "fence", "position": {"x": 1.5, "y": 2.0}}]
    }"#;
    let store = MemoryStore::with_contents(raw);
    let (cal, _) = calendar();
    let farm = Farm::open(&Config::default(), cal, Box::new(store.clone())).unwrap();

    let animal = farm.animal_by_id("a1").unwrap();
    assert_eq!(animal.state, AnimalState::Resting);
    assert_eq!(animal.level, 5);
    assert_eq!(animal.check_in_streak, 9);
    assert_eq!(farm.coins(), 40);
    assert_eq!(store.write_count(), 1);
    assert_eq!(farm.snapshot().decorations.len(), 1);
}
