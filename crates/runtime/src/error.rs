//! Runtime-level error aggregation.

use crate::repository::RepositoryError;
use crate::transport::TransportError;

/// Errors surfaced by explicit (non-tick) engine operations.
///
/// The tick path never returns these; there a failed send or save degrades
/// to a `warn!` and the next tick retries.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
