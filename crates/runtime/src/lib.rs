//! Tick-driven shell around the `stats-core` engine.
//!
//! The runtime owns everything `stats-core` deliberately leaves out: the
//! per-frame driver, the session and transport boundaries, the vitals
//! snapshot repository, and the configuration-change event bus. All engine
//! state is mutated from a single logical thread of control; the async
//! worker exists only so network sends do not block the tick.
pub mod engine;
pub mod error;
pub mod events;
pub mod repository;
pub mod session;
pub mod transport;
pub mod worker;

pub use engine::{StatsEngine, VITALS_SAVE_INTERVAL};
pub use error::EngineError;
pub use events::{ConfigBus, ConfigEvent};
pub use repository::{
    FileVitalsRepository, MemoryVitalsRepository, RepositoryError, VitalsRepository,
};
pub use session::SessionOracle;
pub use transport::{SyncMessage, SyncTransport, TransportError};
pub use worker::{Command, SyncWorker, WorkerHandles};
