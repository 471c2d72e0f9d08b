//! Remote-call boundary for configuration sync.
//!
//! Four logical operations travel over it: a subordinate asks the host for
//! its current player/AI configuration, and the host broadcasts full
//! named-value dumps back. Sends are fire-and-forget from the driver's point
//! of view; a request that never resolves is superseded the next time
//! `needs_sync` re-evaluates true.

use serde::{Deserialize, Serialize};
use stats_core::SyncPayload;

/// Wire messages exchanged between session participants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SyncMessage {
    /// Subordinate → host: "send me your player configuration now."
    RequestPlayerSync,
    /// Subordinate → host: "send me your AI configuration now."
    RequestAiSync,
    /// Host → subordinates: full player configuration dump.
    PlayerSync(SyncPayload),
    /// Host → subordinates: full AI configuration dump.
    AiSync(SyncPayload),
}

/// Errors surfaced by a transport implementation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport disconnected")]
    Disconnected,

    #[error("failed to encode message: {0}")]
    Encode(String),

    #[error("send failed: {0}")]
    Send(String),
}

/// Outbound half of the remote-call dispatch.
///
/// Implementations route requests to the current master and broadcasts to
/// all subordinates; the engine does not address individual peers.
#[async_trait::async_trait]
pub trait SyncTransport: Send + Sync {
    async fn send(&self, message: SyncMessage) -> Result<(), TransportError>;
}
