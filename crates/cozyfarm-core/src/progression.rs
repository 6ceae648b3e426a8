//! Check-in transactions: eligibility, streaks, rewards and leveling.
//!
//! The engine is pure. It reads an [`Animal`] and a captured [`Today`] and
//! returns the animal as it should look after the check-in together with the
//! reward; committing the result (and crediting coins) is the caller's job.
//!
//! ## Check-in flow
//!
//! ```text
//! eligible? --no--> zero reward, nothing changes
//!    |
//!   yes -> streak (continue if last check-in <= 1 day ago, else 1)
//!       -> xp = base + bonus (new streak >= threshold)
//!       -> level = levels.level_for(experience + xp)
//!       -> state = thriving if streak >= thriving_streak else neutral
//! ```

use serde::{Deserialize, Serialize};

use crate::calendar::{DaysElapsed, Today};
use crate::leveling::LevelTable;
use crate::model::Animal;
use crate::state::{AnimalState, StateClassifier, DEFAULT_THRIVING_STREAK};

/// A check-in continues the streak when the previous one was at most this
/// many days ago.
const STREAK_CONTINUATION_DAYS: u32 = 1;

/// Reward constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPolicy {
    #[serde(default = "default_coins_per_check_in")]
    pub coins_per_check_in: u64,
    #[serde(default = "default_xp_per_check_in")]
    pub xp_per_check_in: u32,
    #[serde(default = "default_streak_bonus_xp")]
    pub streak_bonus_xp: u32,
    /// New streak length that earns the bonus.
    #[serde(default = "default_streak_threshold")]
    pub streak_bonus_threshold: u32,
    /// New streak length that makes an animal thrive.
    #[serde(default = "default_streak_threshold")]
    pub thriving_streak: u32,
}

fn default_coins_per_check_in() -> u64 {
    5
}
fn default_xp_per_check_in() -> u32 {
    10
}
fn default_streak_bonus_xp() -> u32 {
    5
}
fn default_streak_threshold() -> u32 {
    DEFAULT_THRIVING_STREAK
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            coins_per_check_in: default_coins_per_check_in(),
            xp_per_check_in: default_xp_per_check_in(),
            streak_bonus_xp: default_streak_bonus_xp(),
            streak_bonus_threshold: default_streak_threshold(),
            thriving_streak: default_streak_threshold(),
        }
    }
}

/// What a check-in earned, for reward presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReward {
    pub coins_earned: u64,
    pub xp_earned: u32,
    pub leveled_up: bool,
}

impl CheckInReward {
    /// Reward for a check-in that did not happen.
    pub const NONE: CheckInReward = CheckInReward {
        coins_earned: 0,
        xp_earned: 0,
        leveled_up: false,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Result of an eligible check-in, not yet committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub animal: Animal,
    pub reward: CheckInReward,
    /// False when the streak was reset to 1.
    pub streak_continued: bool,
}

#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    policy: RewardPolicy,
    levels: LevelTable,
    classifier: StateClassifier,
}

impl ProgressionEngine {
    pub fn new(policy: RewardPolicy, levels: LevelTable) -> Self {
        Self {
            classifier: StateClassifier::new(policy.thriving_streak),
            policy,
            levels,
        }
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    /// An animal may check in once per calendar day.
    pub fn can_check_in(&self, today: &Today, animal: &Animal) -> bool {
        !today.contains(animal.last_check_in)
    }

    pub fn next_streak(&self, elapsed: DaysElapsed, previous: u32) -> u32 {
        if elapsed.within(STREAK_CONTINUATION_DAYS) {
            previous.saturating_add(1)
        } else {
            1
        }
    }

    /// XP awarded for a check-in that produced `new_streak`.
    pub fn xp_for(&self, new_streak: u32) -> u32 {
        if new_streak >= self.policy.streak_bonus_threshold {
            self.policy
                .xp_per_check_in
                .saturating_add(self.policy.streak_bonus_xp)
        } else {
            self.policy.xp_per_check_in
        }
    }

    /// Compute the check-in for `animal`, or `None` when it already checked
    /// in today.
    pub fn check_in(&self, today: &Today, animal: &Animal) -> Option<CheckInOutcome> {
        if !self.can_check_in(today, animal) {
            return None;
        }

        let elapsed = today.days_since(animal.last_check_in);
        let streak = self.next_streak(elapsed, animal.check_in_streak);
        let xp_earned = self.xp_for(streak);
        let experience = animal.experience.saturating_add(xp_earned);
        let level = self.levels.level_for(experience);

        let reward = CheckInReward {
            coins_earned: self.policy.coins_per_check_in,
            xp_earned,
            leveled_up: level > animal.level,
        };
        let updated = Animal {
            last_check_in: Some(today.now()),
            check_in_streak: streak,
            experience,
            level,
            state: self.classifier.after_check_in(streak),
            ..animal.clone()
        };

        Some(CheckInOutcome {
            animal: updated,
            reward,
            streak_continued: streak > 1,
        })
    }

    /// State `animal` should display right now, from elapsed time alone.
    pub fn reclassify(&self, today: &Today, animal: &Animal) -> AnimalState {
        self.classifier
            .classify(today, animal.last_check_in, animal.check_in_streak)
    }
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new(RewardPolicy::default(), LevelTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::AnimalType;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 10, 0, 0).unwrap()
    }

    fn animal_with(last_days_ago: Option<i64>, streak: u32, experience: u32) -> Animal {
        let (mut animal, _) = Animal::adopt(AnimalType::Fox, "Rusty", "Walk", now());
        animal.last_check_in = last_days_ago.map(|d| now() - Duration::days(d));
        animal.check_in_streak = streak;
        animal.experience = experience;
        animal.level = LevelTable::default().level_for(experience);
        animal
    }

    #[test]
    fn first_check_in_starts_streak() {
        let engine = ProgressionEngine::default();
        let today = Today::at_utc(now());
        let animal = animal_with(None, 0, 0);
        assert!(engine.can_check_in(&today, &animal));

        let outcome = engine.check_in(&today, &animal).unwrap();
        assert_eq!(outcome.animal.check_in_streak, 1);
        assert_eq!(outcome.reward.xp_earned, 10);
        assert_eq!(outcome.reward.coins_earned, 5);
        assert_eq!(outcome.animal.state, AnimalState::Neutral);
        assert_eq!(outcome.animal.last_check_in, Some(now()));
        assert!(!outcome.streak_continued);
    }

    #[test]
    fn third_consecutive_day_earns_bonus_and_thrives() {
        let engine = ProgressionEngine::default();
        let today = Today::at_utc(now());
        let outcome = engine.check_in(&today, &animal_with(Some(1), 2, 20)).unwrap();
        assert_eq!(outcome.animal.check_in_streak, 3);
        assert_eq!(outcome.reward.xp_earned, 15);
        assert_eq!(outcome.animal.experience, 35);
        assert_eq!(outcome.animal.state, AnimalState::Thriving);
        assert!(outcome.streak_continued);
    }

    #[test]
    fn lapse_resets_streak_and_bonus() {
        let engine = ProgressionEngine::default();
        let today = Today::at_utc(now());
        let outcome = engine.check_in(&today, &animal_with(Some(5), 4, 60)).unwrap();
        assert_eq!(outcome.animal.check_in_streak, 1);
        assert_eq!(outcome.reward.xp_earned, 10);
        assert_eq!(outcome.animal.state, AnimalState::Neutral);
    }

    #[test]
    fn two_day_gap_also_resets() {
        let engine = ProgressionEngine::default();
        let today = Today::at_utc(now());
        let outcome = engine.check_in(&today, &animal_with(Some(2), 6, 0)).unwrap();
        assert_eq!(outcome.animal.check_in_streak, 1);
    }

    #[test]
    fn crossing_a_threshold_levels_up_once() {
        let engine = ProgressionEngine::default();
        let today = Today::at_utc(now());
        let outcome = engine.check_in(&today, &animal_with(Some(3), 0, 8)).unwrap();
        assert_eq!(outcome.animal.experience, 18);
        assert_eq!(outcome.animal.level, 2);
        assert!(outcome.reward.leveled_up);
    }

    #[test]
    fn staying_inside_a_level_is_not_a_level_up() {
        let engine = ProgressionEngine::default();
        let today = Today::at_utc(now());
        let outcome = engine.check_in(&today, &animal_with(Some(1), 0, 10)).unwrap();
        assert_eq!(outcome.animal.level, 2);
        assert!(!outcome.reward.leveled_up);
    }

    #[test]
    fn already_checked_in_today_is_ineligible() {
        let engine = ProgressionEngine::default();
        let today = Today::at_utc(now());
        let animal = animal_with(Some(0), 1, 10);
        assert!(!engine.can_check_in(&today, &animal));
        assert!(engine.check_in(&today, &animal).is_none());
    }

    #[test]
    fn future_dated_check_in_is_eligible_and_continues_streak() {
        // Clock skew is tolerated: the stored instant is not today, so a new
        // check-in is allowed, and it counts as zero days ago.
        let engine = ProgressionEngine::default();
        let today = Today::at_utc(now());
        let animal = animal_with(Some(-2), 2, 20);

        assert!(engine.can_check_in(&today, &animal));
        let outcome = engine.check_in(&today, &animal).unwrap();
        assert_eq!(outcome.animal.check_in_streak, 3);
        assert_eq!(outcome.animal.last_check_in, Some(now()));
        assert!(!engine.can_check_in(&today, &outcome.animal));
    }

    #[test]
    fn custom_policy_changes_rewards() {
        let policy = RewardPolicy {
            coins_per_check_in: 2,
            xp_per_check_in: 1,
            streak_bonus_xp: 9,
            streak_bonus_threshold: 2,
            thriving_streak: 5,
        };
        let engine = ProgressionEngine::new(policy, LevelTable::default());
        let today = Today::at_utc(now());
        let outcome = engine.check_in(&today, &animal_with(Some(1), 1, 0)).unwrap();
        assert_eq!(outcome.reward.coins_earned, 2);
        assert_eq!(outcome.reward.xp_earned, 10);
        assert_eq!(outcome.animal.state, AnimalState::Neutral);
    }

    #[test]
    fn reclassify_ignores_experience() {
        let engine = ProgressionEngine::default();
        let today = Today::at_utc(now());
        let a = animal_with(Some(1), 3, 0);
        let b = animal_with(Some(1), 3, 700);
        assert_eq!(engine.reclassify(&today, &a), engine.reclassify(&today, &b));
    }

    #[test]
    fn reward_serializes_camel_case() {
        let json = serde_json::to_value(CheckInReward::NONE).unwrap();
        assert_eq!(json["coinsEarned"], 0);
        assert_eq!(json["xpEarned"], 0);
        assert_eq!(json["leveledUp"], false);
    }
}
