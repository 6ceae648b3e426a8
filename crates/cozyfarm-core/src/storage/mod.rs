mod config;
pub mod database;
pub mod memory;

pub use config::{CalendarConfig, Config, FarmConfig, LevelingConfig, RefreshConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use tracing::warn;

use crate::error::Result;
use crate::model::Snapshot;

/// Storage slot holding the whole farm snapshot.
pub const SNAPSHOT_KEY: &str = "cozy-habit-farm-storage";

/// Opaque load/save boundary for the farm snapshot.
///
/// A store holds one serialized record. It knows nothing about entities;
/// decoding and fallback live in [`load_snapshot`].
pub trait SnapshotStore: Send {
    /// Raw contents of the slot, `None` when nothing was ever saved.
    fn read_slot(&self) -> Result<Option<String>>;

    /// Replace the slot atomically.
    fn write_slot(&mut self, contents: &str) -> Result<()>;
}

/// Load the snapshot, falling back to an empty farm when the slot is missing
/// or cannot be decoded.
///
/// # Errors
/// Returns an error only if the store itself cannot be read.
pub fn load_snapshot(store: &dyn SnapshotStore) -> Result<Snapshot> {
    let Some(raw) = store.read_slot()? else {
        return Ok(Snapshot::default());
    };
    match serde_json::from_str::<Snapshot>(&raw) {
        Ok(snapshot) => Ok(snapshot),
        Err(e) => {
            warn!(error = %e, "stored snapshot is corrupted, starting from an empty farm");
            Ok(Snapshot::default())
        }
    }
}

/// # Errors
/// Returns an error if encoding or writing fails.
pub fn save_snapshot(store: &mut dyn SnapshotStore, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string(snapshot)?;
    store.write_slot(&json)
}

/// Returns `~/.config/cozyfarm[-dev]/` based on COZYFARM_ENV.
///
/// Set COZYFARM_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("COZYFARM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("cozyfarm-dev")
    } else {
        base_dir.join("cozyfarm")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
