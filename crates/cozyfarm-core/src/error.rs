//! Core error types for cozyfarm-core.
//!
//! Game-rule refusals (ineligible check-ins, unaffordable spends, unknown
//! identifiers) are not errors: those operations return zero rewards, `false`
//! or `None`. The types here cover persistence, configuration, input
//! validation and broken referential integrity.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cozyfarm-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persisted snapshot references entities that do not exist
    #[error("Integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The farm already holds the configured number of animals
    #[error("Farm is full: at most {capacity} animals can be adopted")]
    FarmFull { capacity: usize },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Referential integrity violations between animals and habits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// An animal points at a habit that is not in the snapshot
    #[error("Animal '{animal_id}' references missing habit '{habit_id}'")]
    MissingHabit { animal_id: String, habit_id: String },

    /// A habit points at an animal that is not in the snapshot
    #[error("Habit '{habit_id}' references missing animal '{animal_id}'")]
    MissingAnimal { habit_id: String, animal_id: String },

    /// The animal and habit do not point at each other
    #[error("Habit '{habit_id}' is owned by '{owner_id}', not by animal '{animal_id}'")]
    HabitOwnerMismatch {
        animal_id: String,
        habit_id: String,
        owner_id: String,
    },

    /// Two entities of the same kind share an identifier
    #[error("Duplicate {kind} identifier '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Experience thresholds are not a usable level table
    #[error("Invalid level table: {0}")]
    InvalidLevelTable(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
