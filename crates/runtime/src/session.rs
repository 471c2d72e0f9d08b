//! Read-only view of the network session the host process runs in.
//!
//! The engine never talks to the lobby or the netcode directly; the game
//! implements this oracle and the driver consults it once per tick.

/// Session membership and authority flags.
pub trait SessionOracle: Send + Sync {
    /// Number of participants currently in the session (including us).
    fn participant_count(&self) -> usize;

    /// Gameplay frozen by a pause menu or similar.
    fn is_gameplay_paused(&self) -> bool;

    /// A level/scene load is in progress.
    fn is_gameplay_loading(&self) -> bool;

    /// Running without any network backend at all.
    fn is_offline_mode(&self) -> bool;

    /// Connected to a session where somebody else is master.
    fn is_non_master_client(&self) -> bool;

    /// Acting as the session's simulation authority.
    fn is_master_client(&self) -> bool;

    /// Network layer still connected (drop-to-single checks this before
    /// restoring local authority).
    fn is_connected(&self) -> bool;
}
