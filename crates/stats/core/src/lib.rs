//! Deterministic custom-stat modifier logic shared across host and clients.
//!
//! `stats-core` defines the canonical rules of the modifier engine: the
//! attribute-tag dispatch table, the clamp policy that keeps modifiers inside
//! physically meaningful bounds, the idempotent stack applier, the vitals
//! ratio cache, and the host-authoritative sync state machine. Everything
//! here is a pure function of its inputs; I/O, clocks, and transport live in
//! the `runtime` crate. Entity attribute storage is owned by the game and
//! reached only through the capability traits in [`env`].
pub mod config;
pub mod env;
pub mod resolver;
pub mod stacks;
pub mod sync;
pub mod tags;
pub mod vitals;

pub use config::{ConfigValue, StatsConfig, SyncPayload, setting};
pub use env::{AbsoluteVitals, CharacterHandle, CharacterId, CharacterRoster, VitalPool};
pub use resolver::{ResolvePolicy, clamp_delta, compute_delta};
pub use stacks::{AppliedVitals, ModTarget, apply_config};
pub use sync::{ReceiveOutcome, RequestSet, SyncState, SyncTracker};
pub use tags::{AttributeKey, DamageAxis, StatTag};
pub use vitals::{VitalsRatios, capture_ratios, restore_ratios};
