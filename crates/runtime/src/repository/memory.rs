//! In-memory VitalsRepository implementation for tests and offline tools.

use std::collections::HashMap;
use std::sync::Mutex;

use stats_core::{CharacterId, VitalsRatios};

use super::{Result, VitalsRepository};

/// HashMap-backed repository with the same replace-on-save semantics as the
/// file implementation.
#[derive(Default)]
pub struct MemoryVitalsRepository {
    snapshots: Mutex<HashMap<CharacterId, VitalsRatios>>,
}

impl MemoryVitalsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots (test helper).
    pub fn len(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VitalsRepository for MemoryVitalsRepository {
    fn save(&self, id: &CharacterId, ratios: &VitalsRatios) -> Result<()> {
        self.snapshots
            .lock()
            .unwrap()
            .insert(id.clone(), *ratios);
        Ok(())
    }

    fn load(&self, id: &CharacterId) -> Result<Option<VitalsRatios>> {
        Ok(self.snapshots.lock().unwrap().get(id).copied())
    }

    fn delete(&self, id: &CharacterId) -> Result<()> {
        self.snapshots.lock().unwrap().remove(id);
        Ok(())
    }
}
