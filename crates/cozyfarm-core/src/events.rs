use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AnimalId, HabitId, UserId};
use crate::progression::CheckInReward;
use crate::species::AnimalType;
use crate::state::AnimalState;

/// Every committed change to the farm produces an Event.
/// The UI subscribes to them and re-renders from the updated snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FarmEvent {
    UserInitialized {
        user_id: UserId,
        at: DateTime<Utc>,
    },
    OnboardingCompleted {
        user_id: UserId,
        at: DateTime<Utc>,
    },
    AnimalAdopted {
        animal_id: AnimalId,
        habit_id: HabitId,
        animal_type: AnimalType,
        at: DateTime<Utc>,
    },
    CheckedIn {
        animal_id: AnimalId,
        reward: CheckInReward,
        streak: u32,
        level: u32,
        state: AnimalState,
        at: DateTime<Utc>,
    },
    /// Periodic reclassification changed at least one animal's state.
    StatesRefreshed {
        changed: usize,
        at: DateTime<Utc>,
    },
    CoinsAdded {
        amount: u64,
        balance: u64,
        at: DateTime<Utc>,
    },
    CoinsSpent {
        amount: u64,
        balance: u64,
        at: DateTime<Utc>,
    },
}
