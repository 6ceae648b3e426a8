//! Authoritative in-memory collections of the farm.
//!
//! The repository stores entities and keeps the animal/habit pairing intact.
//! It performs no game-rule computation: check-ins and reclassification are
//! computed by the progression engine and written back here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{error, warn};

use crate::error::IntegrityError;
use crate::leveling::LevelTable;
use crate::model::{Animal, AnimalId, FarmDecoration, Habit, HabitId, Snapshot, User};
use crate::species::AnimalType;

#[derive(Debug, Clone, Default)]
pub struct Repository {
    user: Option<User>,
    animals: HashMap<AnimalId, Animal>,
    habits: HashMap<HabitId, Habit>,
    decorations: Vec<FarmDecoration>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a repository from a persisted snapshot.
    ///
    /// Levels are re-derived from experience with `levels`.
    ///
    /// # Errors
    /// Returns an error if identifiers repeat or an animal and its habit do
    /// not point at each other.
    pub fn from_snapshot(snapshot: Snapshot, levels: &LevelTable) -> Result<Self, IntegrityError> {
        let mut habits = HashMap::with_capacity(snapshot.habits.len());
        for habit in snapshot.habits {
            if habits.contains_key(&habit.id) {
                return Err(IntegrityError::DuplicateId {
                    kind: "habit",
                    id: habit.id,
                });
            }
            habits.insert(habit.id.clone(), habit);
        }

        let mut animals = HashMap::with_capacity(snapshot.animals.len());
        for mut animal in snapshot.animals {
            if animals.contains_key(&animal.id) {
                return Err(IntegrityError::DuplicateId {
                    kind: "animal",
                    id: animal.id,
                });
            }
            let habit = habits
                .get(&animal.habit_id)
                .ok_or_else(|| IntegrityError::MissingHabit {
                    animal_id: animal.id.clone(),
                    habit_id: animal.habit_id.clone(),
                })?;
            if habit.animal_id != animal.id {
                return Err(IntegrityError::HabitOwnerMismatch {
                    animal_id: animal.id.clone(),
                    habit_id: habit.id.clone(),
                    owner_id: habit.animal_id.clone(),
                });
            }

            let derived = levels.level_for(animal.experience);
            if derived != animal.level {
                warn!(
                    animal_id = %animal.id,
                    stored = animal.level,
                    derived,
                    "stored level disagrees with experience, re-deriving"
                );
                animal.level = derived;
            }
            animals.insert(animal.id.clone(), animal);
        }

        if let Some(orphan) = habits.values().find(|h| !animals.contains_key(&h.animal_id)) {
            return Err(IntegrityError::MissingAnimal {
                habit_id: orphan.id.clone(),
                animal_id: orphan.animal_id.clone(),
            });
        }

        Ok(Self {
            user: snapshot.user,
            animals,
            habits,
            decorations: snapshot.decorations,
        })
    }

    /// The persisted layout, animals and habits ordered by creation.
    pub fn to_snapshot(&self) -> Snapshot {
        let mut habits: Vec<Habit> = self.habits.values().cloned().collect();
        habits.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Snapshot {
            user: self.user.clone(),
            animals: self.animals().into_iter().cloned().collect(),
            habits,
            decorations: self.decorations.clone(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub(crate) fn user_mut(&mut self) -> Option<&mut User> {
        self.user.as_mut()
    }

    /// Create the user unless one already exists. Returns the user when it
    /// was created by this call.
    pub fn initialize_user(&mut self, now: DateTime<Utc>) -> Option<&User> {
        if self.user.is_some() {
            return None;
        }
        self.user = Some(User::new(now));
        self.user.as_ref()
    }

    /// Returns `true` if the flag flipped.
    pub fn complete_onboarding(&mut self) -> bool {
        match self.user.as_mut() {
            Some(user) if !user.has_completed_onboarding => {
                user.has_completed_onboarding = true;
                true
            }
            _ => false,
        }
    }

    /// Adopt a new animal together with its habit.
    pub fn create_animal_and_habit(
        &mut self,
        animal_type: AnimalType,
        name: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> &Animal {
        let (animal, habit) = Animal::adopt(animal_type, name, description, now);
        let animal_id = animal.id.clone();
        self.habits.insert(habit.id.clone(), habit);
        self.animals.entry(animal_id).or_insert(animal)
    }

    pub fn animal_by_id(&self, id: &str) -> Option<&Animal> {
        self.animals.get(id)
    }

    pub fn habit_by_animal_id(&self, animal_id: &str) -> Option<&Habit> {
        let animal = self.animals.get(animal_id)?;
        let habit = self.habits.get(&animal.habit_id);
        if habit.is_none() {
            error!(animal_id, habit_id = %animal.habit_id, "animal has no habit");
        }
        habit
    }

    /// All animals, oldest first.
    pub fn animals(&self) -> Vec<&Animal> {
        let mut animals: Vec<&Animal> = self.animals.values().collect();
        animals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        animals
    }

    pub fn animal_count(&self) -> usize {
        self.animals.len()
    }

    /// Overwrite a stored animal with a newer version of itself. Unknown
    /// animals are not inserted; returns whether the write happened.
    pub(crate) fn replace_animal(&mut self, animal: Animal) -> bool {
        match self.animals.get_mut(&animal.id) {
            Some(slot) => {
                *slot = animal;
                true
            }
            None => false,
        }
    }

    pub(crate) fn animals_mut(&mut self) -> impl Iterator<Item = &mut Animal> {
        self.animals.values_mut()
    }
}
