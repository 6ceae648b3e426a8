//! # Cozy Farm Core Library
//!
//! Progression engine for a habit tracker where every habit is a small
//! companion animal. Checking a habit in once per calendar day earns the
//! animal experience and the user coins; skipping days never hurts, it only
//! lets the animal drift from thriving to resting.
//!
//! The CLI is a thin shell over this crate: every game rule lives here.
//!
//! ## Architecture
//!
//! - **Calendar**: day-granularity arithmetic against an injectable clock
//! - **Progression**: pure rules for streaks, experience, levels and state
//! - **Repository**: in-memory entity store with animal/habit integrity
//! - **Farm**: commits progression outcomes, persists them and broadcasts events
//! - **Storage**: SQLite snapshot slot and TOML-based configuration
//! - **Refresh**: background task that reclassifies states as days pass
//!
//! ## Key Components
//!
//! - [`Farm`]: The single owner of farm state
//! - [`ProgressionEngine`]: Check-in and reclassification rules
//! - [`Database`]: Snapshot persistence
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod error;
pub mod events;
pub mod farm;
pub mod leveling;
pub mod model;
pub mod progression;
pub mod refresh;
pub mod repository;
pub mod species;
pub mod state;
pub mod storage;

pub use calendar::{Calendar, Clock, DaysElapsed, ManualClock, SystemClock, Today};
pub use error::{ConfigError, CoreError, DatabaseError, IntegrityError, Result, ValidationError};
pub use events::FarmEvent;
pub use farm::{Farm, SharedFarm};
pub use leveling::{LevelProgress, LevelTable};
pub use model::{Animal, AnimalId, FarmDecoration, Habit, HabitId, Position, Snapshot, User, UserId};
pub use progression::{CheckInOutcome, CheckInReward, ProgressionEngine, RewardPolicy};
pub use refresh::{RefreshHandle, RefreshTask};
pub use repository::Repository;
pub use species::{AnimalInfo, AnimalType};
pub use state::{AnimalState, StateClassifier};
pub use storage::{Config, Database, MemoryStore, SnapshotStore};
