//! Emotional state of a companion.
//!
//! There is deliberately no failure state: the lowest mood is `Resting`, which
//! only means the animal has not seen its owner for a while.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{DaysElapsed, Today};

/// Streak length at which an animal counts as thriving.
pub const DEFAULT_THRIVING_STREAK: u32 = 3;

/// Days without a check-in that still read as recent.
const RECENT_DAYS: u32 = 1;

/// Longest lapse that still leaves an animal neutral.
const LAPSE_GRACE_DAYS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalState {
    Thriving,
    #[default]
    Neutral,
    Resting,
}

impl AnimalState {
    /// Message the companion shows its owner.
    pub fn mood_line(&self, name: &str) -> String {
        match self {
            AnimalState::Thriving => format!("{name} is so happy! Keep it up!"),
            AnimalState::Neutral => format!("{name} is doing well."),
            AnimalState::Resting => format!("{name} missed you! Welcome back!"),
        }
    }
}

/// Maps check-in history to a state. Pure: the output depends only on the
/// days elapsed and the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateClassifier {
    thriving_streak: u32,
}

impl StateClassifier {
    pub fn new(thriving_streak: u32) -> Self {
        Self { thriving_streak }
    }

    pub fn classify(
        &self,
        today: &Today,
        last_check_in: Option<DateTime<Utc>>,
        streak: u32,
    ) -> AnimalState {
        self.classify_elapsed(today.days_since(last_check_in), streak)
    }

    pub fn classify_elapsed(&self, elapsed: DaysElapsed, streak: u32) -> AnimalState {
        if elapsed.within(RECENT_DAYS) {
            self.after_check_in(streak)
        } else if elapsed.within(LAPSE_GRACE_DAYS) {
            AnimalState::Neutral
        } else {
            AnimalState::Resting
        }
    }

    /// State right after a check-in that produced `streak`.
    pub fn after_check_in(&self, streak: u32) -> AnimalState {
        if streak >= self.thriving_streak {
            AnimalState::Thriving
        } else {
            AnimalState::Neutral
        }
    }
}

impl Default for StateClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_THRIVING_STREAK)
    }
}
