//! The farm: repository, progression engine and persistence behind one owner.
//!
//! Every mutating operation takes `&mut self` and runs to completion before
//! returning: compute with the engine, stage the result on a copy of the
//! repository, save that copy, then swap it in and broadcast one
//! [`FarmEvent`]. A save failure leaves the live farm untouched. Sharing a farm between
//! tasks goes through [`SharedFarm`], whose mutex keeps a check-in and a
//! refresh tick from interleaving on the same animal.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::calendar::Calendar;
use crate::error::{CoreError, Result, ValidationError};
use crate::events::FarmEvent;
use crate::leveling::LevelProgress;
use crate::model::{Animal, AnimalId, Habit, Snapshot, User};
use crate::progression::{CheckInReward, ProgressionEngine};
use crate::repository::Repository;
use crate::species::AnimalType;
use crate::storage::{load_snapshot, save_snapshot, Config, MemoryStore, SnapshotStore};

/// Capacity of the event channel; slow subscribers skip older events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A farm shared between the UI and the refresh task.
pub type SharedFarm = Arc<Mutex<Farm>>;

pub struct Farm {
    repo: Repository,
    engine: ProgressionEngine,
    calendar: Calendar,
    store: Box<dyn SnapshotStore>,
    events: broadcast::Sender<FarmEvent>,
    max_animals: usize,
}

impl Farm {
    /// Load the farm from `store` and reclassify every animal.
    ///
    /// A missing or undecodable snapshot yields an empty farm.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read, or if the stored
    /// snapshot breaks animal/habit integrity.
    pub fn open(config: &Config, calendar: Calendar, store: Box<dyn SnapshotStore>) -> Result<Self> {
        let engine = config.engine();
        let snapshot = load_snapshot(store.as_ref())?;
        let repo = Repository::from_snapshot(snapshot, engine.levels()).map_err(|e| {
            error!(error = %e, "persisted farm violates referential integrity");
            CoreError::from(e)
        })?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut farm = Self {
            repo,
            engine,
            calendar,
            store,
            events,
            max_animals: config.farm.max_animals,
        };
        info!(animals = farm.repo.animal_count(), "farm loaded");
        farm.refresh_states()?;
        Ok(farm)
    }

    /// A farm backed by a fresh in-memory store.
    ///
    /// # Errors
    /// Never fails in practice; kept fallible to match [`Farm::open`].
    pub fn in_memory(config: &Config, calendar: Calendar) -> Result<Self> {
        Self::open(config, calendar, Box::new(MemoryStore::new()))
    }

    pub fn into_shared(self) -> SharedFarm {
        Arc::new(Mutex::new(self))
    }

    /// Receive an event after every committed change.
    pub fn subscribe(&self) -> broadcast::Receiver<FarmEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.repo.to_snapshot()
    }

    /// Save `next` and only then make it the live repository.
    ///
    /// A failed save leaves the farm exactly as it was before the command.
    fn commit(&mut self, next: Repository, event: FarmEvent) -> Result<()> {
        save_snapshot(self.store.as_mut(), &next.to_snapshot()).map_err(|e| {
            error!(error = %e, "failed to save farm snapshot, change discarded");
            e
        })?;
        self.repo = next;
        debug!(?event, "committed");
        // No subscribers is fine.
        let _ = self.events.send(event);
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn user(&self) -> Option<&User> {
        self.repo.user()
    }

    pub fn coins(&self) -> u64 {
        self.repo.user().map_or(0, |u| u.coins)
    }

    pub fn animal_by_id(&self, id: &str) -> Option<&Animal> {
        self.repo.animal_by_id(id)
    }

    pub fn habit_by_animal_id(&self, animal_id: &str) -> Option<&Habit> {
        self.repo.habit_by_animal_id(animal_id)
    }

    pub fn animals(&self) -> Vec<&Animal> {
        self.repo.animals()
    }

    pub fn has_room(&self) -> bool {
        self.repo.animal_count() < self.max_animals
    }

    /// Unknown animals cannot check in.
    pub fn can_check_in(&self, animal_id: &str) -> bool {
        let today = self.calendar.today();
        self.repo
            .animal_by_id(animal_id)
            .is_some_and(|animal| self.engine.can_check_in(&today, animal))
    }

    pub fn level_progress(&self, animal_id: &str) -> Option<LevelProgress> {
        let animal = self.repo.animal_by_id(animal_id)?;
        Some(self.engine.levels().progress(animal.experience))
    }

    // ── Commands ─────────────────────────────────────────────────────
    //
    // Every command stages its change on a copy of the repository and hands
    // it to `commit`, so an error return always means nothing changed.

    /// Create the user if none exists. Returns whether one was created.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be saved.
    pub fn initialize_user(&mut self) -> Result<bool> {
        let now = self.calendar.now();
        let mut next = self.repo.clone();
        let Some(user) = next.initialize_user(now) else {
            return Ok(false);
        };
        let user_id = user.id.clone();
        self.commit(next, FarmEvent::UserInitialized {
            user_id: user_id.clone(),
            at: now,
        })?;
        info!(%user_id, "user initialized");
        Ok(true)
    }

    /// # Errors
    /// Returns an error if the snapshot cannot be saved.
    pub fn complete_onboarding(&mut self) -> Result<()> {
        let mut next = self.repo.clone();
        if !next.complete_onboarding() {
            return Ok(());
        }
        let user_id = next.user().map(|u| u.id.clone()).unwrap_or_default();
        self.commit(next, FarmEvent::OnboardingCompleted {
            user_id,
            at: self.calendar.now(),
        })
    }

    /// Adopt an animal with its habit and return the animal's id.
    ///
    /// # Errors
    /// Returns an error if the name or description is blank, the farm is
    /// full, or the snapshot cannot be saved.
    pub fn create_animal_and_habit(
        &mut self,
        animal_type: AnimalType,
        name: &str,
        description: &str,
    ) -> Result<AnimalId> {
        let name = non_blank("name", name)?;
        let description = non_blank("description", description)?;
        if !self.has_room() {
            return Err(CoreError::FarmFull {
                capacity: self.max_animals,
            });
        }

        let now = self.calendar.now();
        let mut next = self.repo.clone();
        let animal = next.create_animal_and_habit(animal_type, name, description, now);
        let animal_id = animal.id.clone();
        let habit_id = animal.habit_id.clone();

        self.commit(next, FarmEvent::AnimalAdopted {
            animal_id: animal_id.clone(),
            habit_id,
            animal_type,
            at: now,
        })?;
        info!(%animal_id, %animal_type, "animal adopted");
        Ok(animal_id)
    }

    /// Check in an animal's habit for today.
    ///
    /// Unknown animals and animals that already checked in today get
    /// [`CheckInReward::NONE`] and nothing changes.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be saved. The check-in is then
    /// not applied and may be retried.
    pub fn check_in(&mut self, animal_id: &str) -> Result<CheckInReward> {
        let today = self.calendar.today();
        let Some(animal) = self.repo.animal_by_id(animal_id) else {
            debug!(animal_id, "check-in for unknown animal");
            return Ok(CheckInReward::NONE);
        };
        let Some(outcome) = self.engine.check_in(&today, animal) else {
            debug!(animal_id, "already checked in today");
            return Ok(CheckInReward::NONE);
        };

        let reward = outcome.reward;
        let streak = outcome.animal.check_in_streak;
        let level = outcome.animal.level;
        let state = outcome.animal.state;

        let mut next = self.repo.clone();
        next.replace_animal(outcome.animal);
        match next.user_mut() {
            Some(user) => user.credit(reward.coins_earned),
            None => warn!(animal_id, "no user to credit check-in coins to"),
        }

        self.commit(next, FarmEvent::CheckedIn {
            animal_id: animal_id.to_string(),
            reward,
            streak,
            level,
            state,
            at: today.now(),
        })?;
        info!(
            animal_id,
            streak,
            level,
            xp = reward.xp_earned,
            coins = reward.coins_earned,
            leveled_up = reward.leveled_up,
            "checked in"
        );
        Ok(reward)
    }

    /// Reclassify every animal from elapsed time. Experience, level, streak
    /// and coins are untouched. Returns how many animals changed state.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be saved.
    pub fn refresh_states(&mut self) -> Result<usize> {
        let today = self.calendar.today();
        let mut next = self.repo.clone();
        let mut changed = 0;
        for animal in next.animals_mut() {
            let state = self.engine.reclassify(&today, animal);
            if state != animal.state {
                debug!(animal_id = %animal.id, from = ?animal.state, to = ?state, "state changed");
                animal.state = state;
                changed += 1;
            }
        }

        if changed > 0 {
            self.commit(next, FarmEvent::StatesRefreshed {
                changed,
                at: today.now(),
            })?;
        }
        Ok(changed)
    }

    /// Credit coins to the user. Without a user this does nothing.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be saved.
    pub fn add_coins(&mut self, amount: u64) -> Result<()> {
        let mut next = self.repo.clone();
        let Some(user) = next.user_mut() else {
            warn!(amount, "no user to credit coins to");
            return Ok(());
        };
        user.credit(amount);
        let balance = user.coins;
        self.commit(next, FarmEvent::CoinsAdded {
            amount,
            balance,
            at: self.calendar.now(),
        })
    }

    /// Spend coins if the balance covers `amount`. Returns whether the spend
    /// happened; a refused spend leaves the balance untouched.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be saved.
    pub fn spend_coins(&mut self, amount: u64) -> Result<bool> {
        let mut next = self.repo.clone();
        let Some(user) = next.user_mut() else {
            return Ok(false);
        };
        if !user.try_spend(amount) {
            debug!(amount, balance = user.coins, "spend refused");
            return Ok(false);
        }
        let balance = user.coins;
        self.commit(next, FarmEvent::CoinsSpent {
            amount,
            balance,
            at: self.calendar.now(),
        })?;
        Ok(true)
    }
}

fn non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(trimmed)
}
