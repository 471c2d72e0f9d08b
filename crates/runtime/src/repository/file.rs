//! File-based VitalsRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use stats_core::{CharacterId, VitalsRatios};

use super::{RepositoryError, Result, VitalsRepository};

/// One JSON file per entity identity under a fixed directory/prefix.
///
/// # File Format
///
/// Snapshots are stored as `{prefix}_{uid}.json`, a flat record of the six
/// ratio fields. Writes replace the whole file (delete-then-write, matching
/// the persisted-file contract); reads treat anything missing or unparsable
/// as "no prior snapshot".
pub struct FileVitalsRepository {
    base_dir: PathBuf,
    prefix: String,
}

impl FileVitalsRepository {
    /// Create a new file-based vitals repository.
    pub fn new(base_dir: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            prefix: prefix.into(),
        })
    }

    fn snapshot_path(&self, id: &CharacterId) -> PathBuf {
        self.base_dir.join(format!("{}_{}.json", self.prefix, id))
    }
}

impl VitalsRepository for FileVitalsRepository {
    fn save(&self, id: &CharacterId, ratios: &VitalsRatios) -> Result<()> {
        let path = self.snapshot_path(id);

        let json = serde_json::to_string(ratios)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        if path.exists() {
            fs::remove_file(&path)?;
        }
        fs::write(&path, json)?;

        tracing::debug!("Saved vitals[{}] to {}", id, path.display());
        Ok(())
    }

    fn load(&self, id: &CharacterId) -> Result<Option<VitalsRatios>> {
        let path = self.snapshot_path(id);

        if !path.exists() {
            return Ok(None);
        }

        let Ok(text) = fs::read_to_string(&path) else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(ratios) => Ok(Some(ratios)),
            Err(e) => {
                // Corrupt snapshot degrades to a cache miss.
                tracing::warn!("Unparsable vitals snapshot at {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn delete(&self, id: &CharacterId) -> Result<()> {
        let path = self.snapshot_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
