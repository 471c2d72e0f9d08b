//! Persistence for per-entity vitals snapshots.
//!
//! One record per entity identity, six ratio fields, overwritten wholesale
//! on every save. A missing or unreadable record is a cache miss, never an
//! error the tick path has to care about.
mod file;
mod memory;

use stats_core::{CharacterId, VitalsRatios};

pub use file::FileVitalsRepository;
pub use memory::MemoryVitalsRepository;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Repository for vitals ratio snapshots keyed by entity identity.
pub trait VitalsRepository: Send + Sync {
    /// Replace the stored snapshot for an identity.
    fn save(&self, id: &CharacterId, ratios: &VitalsRatios) -> Result<()>;

    /// Load the stored snapshot, `None` on miss or unparsable data.
    fn load(&self, id: &CharacterId) -> Result<Option<VitalsRatios>>;

    /// Drop the stored snapshot for an identity.
    fn delete(&self, id: &CharacterId) -> Result<()>;
}
