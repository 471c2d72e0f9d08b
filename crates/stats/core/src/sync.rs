//! Host-authoritative sync state tracking.
//!
//! A subordinate participant tracks, per target class, whether it has ever
//! received the host's configuration (`Uninitialized` → `AwaitingHostData` →
//! `Synced`) together with the identity of the host it believes in. Absence
//! of sync data is a distinct situation from "host disabled the feature": a
//! missing configuration suppresses application entirely, while a received
//! configuration with the toggle off still applies (and clears stacks).
//!
//! All transitions are plain functions of the current state and one event;
//! there are no loose boolean flags that can disagree with each other.

use crate::config::{StatsConfig, SyncPayload};
use crate::env::CharacterId;
use crate::stacks::ModTarget;

/// Per-target sync progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    /// Never received anything from a host.
    #[default]
    Uninitialized,
    /// A request is out (or the host changed); no usable configuration.
    AwaitingHostData,
    /// Holding the recognized host's configuration.
    Synced,
}

#[derive(Clone, Debug, Default)]
struct TargetSync {
    state: SyncState,
    config: Option<StatsConfig>,
}

impl TargetSync {
    fn initialized(&self) -> bool {
        self.state != SyncState::Uninitialized
    }
}

/// Which target classes a request round must cover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestSet {
    pub player: bool,
    pub ai: bool,
}

impl RequestSet {
    pub fn is_empty(&self) -> bool {
        !self.player && !self.ai
    }
}

/// Result of feeding an inbound payload into the tracker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Payload accepted; the cached configuration for this target is fresh.
    Accepted(ModTarget),
    /// Payload came from a host we no longer recognize; discarded.
    StaleHost {
        expected: CharacterId,
        received: CharacterId,
    },
}

/// Sync state for one local participant, both target classes.
#[derive(Clone, Debug, Default)]
pub struct SyncTracker {
    player: TargetSync,
    ai: TargetSync,
    current_host: Option<CharacterId>,
}

impl SyncTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn target(&self, target: ModTarget) -> &TargetSync {
        match target {
            ModTarget::Player => &self.player,
            ModTarget::Ai => &self.ai,
        }
    }

    fn target_mut(&mut self, target: ModTarget) -> &mut TargetSync {
        match target {
            ModTarget::Player => &mut self.player,
            ModTarget::Ai => &mut self.ai,
        }
    }

    pub fn state(&self, target: ModTarget) -> SyncState {
        self.target(target).state
    }

    /// The cached synchronized configuration for a target, if received.
    pub fn config(&self, target: ModTarget) -> Option<&StatsConfig> {
        self.target(target).config.as_ref()
    }

    /// The host identity recorded at the last request/receive.
    pub fn current_host(&self) -> Option<&CharacterId> {
        self.current_host.as_ref()
    }

    /// Have both target classes been initialized at least once?
    pub fn both_initialized(&self) -> bool {
        self.player.initialized() && self.ai.initialized()
    }

    /// Must this participant re-request the host configuration?
    ///
    /// True only once both targets are initialized, and then whenever the
    /// recognized host changed or either cached configuration is missing.
    /// Without a world host there is nobody to ask; requests are deferred.
    pub fn needs_sync(&self, world_host: Option<&CharacterId>) -> bool {
        if !self.both_initialized() {
            return false;
        }
        let Some(host) = world_host else {
            return false;
        };
        if self.current_host.as_ref() != Some(host) {
            return true;
        }
        self.player.config.is_none() || self.ai.config.is_none()
    }

    /// Record the current world host and report which targets need a
    /// request (those without a cached configuration).
    ///
    /// Targets that already hold a configuration snap back to `Synced`
    /// under the new host; they are not refetched.
    pub fn begin_request(&mut self, world_host: CharacterId) -> RequestSet {
        self.current_host = Some(world_host);

        let mut requests = RequestSet::default();
        for (target, flag) in [
            (ModTarget::Player, &mut requests.player),
            (ModTarget::Ai, &mut requests.ai),
        ] {
            let slot = self.target_mut(target);
            if slot.config.is_none() {
                slot.state = SyncState::AwaitingHostData;
                *flag = true;
            } else {
                slot.state = SyncState::Synced;
            }
        }
        requests
    }

    /// Feed an inbound host broadcast into the tracker.
    ///
    /// The payload is validated against the currently recognized world host;
    /// a late response from a since-replaced host is discarded. With no
    /// recognized host yet there is nothing to contradict, so the payload is
    /// accepted and its sender becomes the recognized host.
    pub fn receive(
        &mut self,
        payload: &SyncPayload,
        world_host: Option<&CharacterId>,
    ) -> ReceiveOutcome {
        if let Some(host) = world_host {
            if *host != payload.host {
                return ReceiveOutcome::StaleHost {
                    expected: host.clone(),
                    received: payload.host.clone(),
                };
            }
        }

        let target = ModTarget::for_config(&payload.config_name);
        self.current_host = Some(payload.host.clone());
        let slot = self.target_mut(target);
        slot.config = Some(StatsConfig::from_payload(payload));
        slot.state = SyncState::Synced;
        ReceiveOutcome::Accepted(target)
    }

    /// Drop back to single-participant authority: forget the host and both
    /// cached configurations.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
