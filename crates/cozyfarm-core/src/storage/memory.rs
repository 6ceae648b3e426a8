//! In-memory snapshot store.
//!
//! Clones share the same slot, so a test can hand one clone to a farm and
//! inspect what was saved through another.

use std::sync::{Arc, Mutex};

use super::SnapshotStore;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        let store = Self::new();
        *store.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(contents.to_string());
        store
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SnapshotStore for MemoryStore {
    fn read_slot(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write_slot(&mut self, contents: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(contents.to_string());
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
