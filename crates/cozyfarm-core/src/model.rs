//! Farm entities and the persisted snapshot layout.
//!
//! Field names serialize in camelCase so the stored record reads
//! `{ user, animals[], habits[], decorations[] }` with animals carrying
//! `id, type, name, habitId, state, level, experience, lastCheckIn,
//! checkInStreak, createdAt`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::species::AnimalType;
use crate::state::AnimalState;

pub type UserId = String;
pub type AnimalId = String;
pub type HabitId = String;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The single owner of the farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub coins: u64,
    pub created_at: DateTime<Utc>,
    pub has_completed_onboarding: bool,
}

impl User {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            coins: 0,
            created_at: now,
            has_completed_onboarding: false,
        }
    }

    pub fn credit(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Debit `amount` if the balance covers it. Leaves the balance untouched
    /// and returns `false` otherwise.
    pub fn try_spend(&mut self, amount: u64) -> bool {
        match self.coins.checked_sub(amount) {
            Some(rest) => {
                self.coins = rest;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: AnimalId,
    #[serde(rename = "type")]
    pub animal_type: AnimalType,
    pub name: String,
    pub habit_id: HabitId,
    pub state: AnimalState,
    pub level: u32,
    pub experience: u32,
    pub last_check_in: Option<DateTime<Utc>>,
    pub check_in_streak: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub description: String,
    pub animal_id: AnimalId,
    pub created_at: DateTime<Utc>,
}

impl Animal {
    /// A freshly adopted animal and its habit, linked to each other.
    ///
    /// Starts at level 1 with no experience, no streak, no check-in and a
    /// neutral mood.
    pub fn adopt(
        animal_type: AnimalType,
        name: impl Into<String>,
        habit_description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> (Animal, Habit) {
        let animal_id = new_id();
        let habit_id = new_id();

        let animal = Animal {
            id: animal_id.clone(),
            animal_type,
            name: name.into(),
            habit_id: habit_id.clone(),
            state: AnimalState::Neutral,
            level: 1,
            experience: 0,
            last_check_in: None,
            check_in_streak: 0,
            created_at: now,
        };
        let habit = Habit {
            id: habit_id,
            description: habit_description.into(),
            animal_id,
            created_at: now,
        };
        (animal, habit)
    }
}

/// Reserved for farm decorations. No operation creates one yet; stored ones
/// are carried through load and save untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmDecoration {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Everything that is persisted, saved and loaded as one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub animals: Vec<Animal>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub decorations: Vec<FarmDecoration>,
}
