//! Engine context and per-tick driver.
//!
//! [`StatsEngine`] is constructed once at session start and owns all mutable
//! engine state: the two local configuration bundles, the sync tracker, and
//! the last-persisted vitals per entity. Every transition runs on the tick
//! thread; the engine returns outbound [`SyncMessage`]s instead of touching
//! the network itself, so the driver stays synchronous and testable.

use std::collections::HashMap;
use std::sync::Arc;

use stats_core::{
    CharacterHandle, CharacterId, CharacterRoster, ModTarget, ReceiveOutcome, StatsConfig,
    SyncPayload, SyncTracker, VitalPool, VitalsRatios, apply_config, capture_ratios,
};
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::repository::VitalsRepository;
use crate::session::SessionOracle;
use crate::transport::SyncMessage;

/// Seconds between vitals persistence checks.
pub const VITALS_SAVE_INTERVAL: f32 = 12.0;

/// All engine state for one local participant.
pub struct StatsEngine {
    player_config: StatsConfig,
    ai_config: StatsConfig,
    tracker: SyncTracker,
    last_vitals: HashMap<CharacterId, VitalsRatios>,
    repository: Arc<dyn VitalsRepository>,
    /// Armed on the first single-occupancy tick; the drop-to-single reset
    /// only runs on the second consecutive one, so a one-tick membership
    /// blip does not force a full resync.
    pending_single: bool,
    online: bool,
    last_vitals_save: f32,
}

impl StatsEngine {
    /// Build an engine with default (all-zero, disabled) local bundles.
    pub fn new(repository: Arc<dyn VitalsRepository>) -> Self {
        Self::with_configs(
            StatsConfig::player_default(),
            StatsConfig::ai_default(),
            repository,
        )
    }

    /// Build an engine with pre-loaded local bundles.
    pub fn with_configs(
        player_config: StatsConfig,
        ai_config: StatsConfig,
        repository: Arc<dyn VitalsRepository>,
    ) -> Self {
        Self {
            player_config,
            ai_config,
            tracker: SyncTracker::new(),
            last_vitals: HashMap::new(),
            repository,
            pending_single: false,
            online: false,
            last_vitals_save: -VITALS_SAVE_INTERVAL,
        }
    }

    /// The local (not synchronized) bundle for a target class.
    pub fn local_config(&self, target: ModTarget) -> &StatsConfig {
        match target {
            ModTarget::Player => &self.player_config,
            ModTarget::Ai => &self.ai_config,
        }
    }

    /// Mutable access for the settings editor.
    pub fn local_config_mut(&mut self, target: ModTarget) -> &mut StatsConfig {
        match target {
            ModTarget::Player => &mut self.player_config,
            ModTarget::Ai => &mut self.ai_config,
        }
    }

    /// Current sync state (read-only).
    pub fn tracker(&self) -> &SyncTracker {
        &self.tracker
    }

    /// Advance the engine by one frame.
    ///
    /// Returns the sync requests this tick decided to issue. Skipped
    /// entirely while the session is empty, paused, or loading.
    pub fn tick(
        &mut self,
        now: f32,
        session: &dyn SessionOracle,
        roster: &mut dyn CharacterRoster,
    ) -> Vec<SyncMessage> {
        let mut outbound = Vec::new();

        if session.participant_count() < 1
            || session.is_gameplay_paused()
            || session.is_gameplay_loading()
        {
            return outbound;
        }

        if session.participant_count() > 1 {
            if self.pending_single {
                // The blip resolved back to multi-occupancy; re-assert the
                // player bundle once and forget the pending drop.
                self.pending_single = false;
                self.apply_local(ModTarget::Player, roster);
            }

            if !session.is_offline_mode() && session.is_non_master_client() {
                self.online = true;

                let world_host = roster.host_character();
                if self.tracker.needs_sync(world_host.as_ref()) {
                    if let Some(host) = world_host {
                        debug!("Sync drift detected; requesting from host {host}");
                        let requests = self.tracker.begin_request(host);
                        if requests.player {
                            outbound.push(SyncMessage::RequestPlayerSync);
                        }
                        if requests.ai {
                            outbound.push(SyncMessage::RequestAiSync);
                        }
                    }
                }
            }
        } else if self.pending_single {
            if self.online && session.is_connected() {
                self.online = false;
                self.tracker.reset();
                info!("Session dropped to single occupancy; restoring local authority");
                self.apply_local(ModTarget::Player, roster);
                self.apply_local(ModTarget::Ai, roster);
            }
        } else {
            self.pending_single = true;
        }

        if self.vitals_dirty(now, roster) {
            self.save_local_vitals(roster);
        }

        outbound
    }

    /// Dispatch one inbound remote call. Requests are answered only by the
    /// master; payloads are validated against the recognized host.
    pub fn handle_message(
        &mut self,
        message: SyncMessage,
        session: &dyn SessionOracle,
        roster: &mut dyn CharacterRoster,
    ) -> Vec<SyncMessage> {
        match message {
            SyncMessage::RequestPlayerSync => self.answer_request(ModTarget::Player, session, roster),
            SyncMessage::RequestAiSync => self.answer_request(ModTarget::Ai, session, roster),
            SyncMessage::PlayerSync(payload) | SyncMessage::AiSync(payload) => {
                self.receive_payload(payload, roster);
                Vec::new()
            }
        }
    }

    /// React to a locally saved configuration bundle: broadcast it when we
    /// are the session authority, and re-apply it to our own simulation.
    pub fn on_config_saved(
        &mut self,
        target: ModTarget,
        session: &dyn SessionOracle,
        roster: &mut dyn CharacterRoster,
    ) -> Vec<SyncMessage> {
        if session.participant_count() < 1 {
            return Vec::new();
        }

        let mut outbound = Vec::new();
        if !session.is_offline_mode() && !session.is_non_master_client() {
            match roster.host_character() {
                Some(host) => {
                    let payload = self.local_config(target).to_payload(host);
                    outbound.push(match target {
                        ModTarget::Player => SyncMessage::PlayerSync(payload),
                        ModTarget::Ai => SyncMessage::AiSync(payload),
                    });
                }
                // No host entity yet; the broadcast waits for the next save
                // or for clients to request once a host exists.
                None => warn!("Config saved with no recognized host; broadcast deferred"),
            }
        }

        if session.is_master_client() {
            self.apply_local(target, roster);
        }
        outbound
    }

    /// Entry point for the game's own stat-recomputation hook.
    ///
    /// Returns `false` when the engine declines (feature fully disabled, or
    /// a load in progress) and the game's native recompute should run
    /// instead. A subordinate with no synchronized data applies nothing but
    /// still claims the recompute, together with any sync requests it needs
    /// to issue.
    pub fn on_stats_recalculated(
        &mut self,
        character: &mut dyn CharacterHandle,
        session: &dyn SessionOracle,
        world_host: Option<&CharacterId>,
    ) -> (bool, Vec<SyncMessage>) {
        if (!self.player_config.enabled() && !self.ai_config.enabled())
            || session.is_gameplay_loading()
        {
            return (false, Vec::new());
        }

        let target = if character.is_ai() {
            ModTarget::Ai
        } else {
            ModTarget::Player
        };
        let mut outbound = Vec::new();

        if !session.is_non_master_client() {
            let config = self.local_config(target).clone();
            self.apply_to_character(character, &config, target);
        } else {
            if !self.tracker.both_initialized() {
                if let Some(host) = world_host {
                    let requests = self.tracker.begin_request(host.clone());
                    if requests.player {
                        outbound.push(SyncMessage::RequestPlayerSync);
                    }
                    if requests.ai {
                        outbound.push(SyncMessage::RequestAiSync);
                    }
                }
            }
            if let Some(config) = self.tracker.config(target).cloned() {
                self.apply_to_character(character, &config, target);
            }
        }
        (true, outbound)
    }

    fn answer_request(
        &mut self,
        target: ModTarget,
        session: &dyn SessionOracle,
        roster: &mut dyn CharacterRoster,
    ) -> Vec<SyncMessage> {
        if !session.is_master_client() {
            return Vec::new();
        }
        let Some(host) = roster.host_character() else {
            warn!("Sync requested but no host entity is present");
            return Vec::new();
        };

        let payload = self.local_config(target).to_payload(host);
        vec![match target {
            ModTarget::Player => SyncMessage::PlayerSync(payload),
            ModTarget::Ai => SyncMessage::AiSync(payload),
        }]
    }

    fn receive_payload(&mut self, payload: SyncPayload, roster: &mut dyn CharacterRoster) {
        let world_host = roster.host_character();
        match self.tracker.receive(&payload, world_host.as_ref()) {
            ReceiveOutcome::Accepted(target) => {
                info!("Received {} configuration from host", payload.config_name);
                self.apply_synced(target, roster);
            }
            ReceiveOutcome::StaleHost { expected, received } => {
                warn!("Discarding sync payload from replaced host {received} (expected {expected})");
            }
        }
    }

    /// Apply the local bundle for a target class to every governed entity.
    pub fn apply_local(&mut self, target: ModTarget, roster: &mut dyn CharacterRoster) {
        let config = self.local_config(target).clone();
        self.apply_to_roster(&config, target, roster);
    }

    /// Apply the synchronized bundle, if one has been received. Absence of
    /// sync data suppresses application entirely (it is not "disabled").
    pub fn apply_synced(&mut self, target: ModTarget, roster: &mut dyn CharacterRoster) {
        if let Some(config) = self.tracker.config(target).cloned() {
            self.apply_to_roster(&config, target, roster);
        }
    }

    fn apply_to_roster(
        &mut self,
        config: &StatsConfig,
        target: ModTarget,
        roster: &mut dyn CharacterRoster,
    ) {
        let enabled = config.enabled();
        let repository = Arc::clone(&self.repository);
        let mut persisted: Vec<(CharacterId, VitalsRatios)> = Vec::new();

        roster.visit_all(&mut |character| {
            if !target.governs(character) {
                return;
            }
            let cached = repository.load(character.id()).ok().flatten();
            let outcome = apply_config(character, config, target, enabled, cached);
            if outcome.persist {
                persisted.push((character.id().clone(), outcome.ratios));
            }
        });

        for (id, ratios) in persisted {
            self.persist_vitals(&id, ratios);
        }
    }

    fn apply_to_character(
        &mut self,
        character: &mut dyn CharacterHandle,
        config: &StatsConfig,
        target: ModTarget,
    ) {
        if !target.governs(character) {
            return;
        }
        let cached = self.repository.load(character.id()).ok().flatten();
        let outcome = apply_config(character, config, target, config.enabled(), cached);
        if outcome.persist {
            let id = character.id().clone();
            self.persist_vitals(&id, outcome.ratios);
        }
    }

    fn persist_vitals(&mut self, id: &CharacterId, ratios: VitalsRatios) {
        if let Err(e) = self.repository.save(id, &ratios) {
            // Persistence failure degrades to a cache miss next load.
            warn!("Failed to persist vitals for {id}: {e}");
        }
        self.last_vitals.insert(id.clone(), ratios);
    }

    /// Did any tracked entity's live health ratio drop below its last
    /// persisted value? Checked at most once per [`VITALS_SAVE_INTERVAL`].
    ///
    /// Only a decreasing health ratio triggers persistence; stamina and
    /// mana changes never do. The asymmetry is inherited behavior.
    fn vitals_dirty(&mut self, now: f32, roster: &mut dyn CharacterRoster) -> bool {
        if now - self.last_vitals_save <= VITALS_SAVE_INTERVAL {
            return false;
        }

        let last_vitals = &self.last_vitals;
        let mut dirty = false;
        roster.visit_all(&mut |character| {
            if dirty {
                return;
            }
            if let Some(prev) = last_vitals.get(character.id()) {
                let max = character.max_pool(VitalPool::Health);
                let ratio = if max > 0.0 {
                    character.current_pool(VitalPool::Health) / max
                } else {
                    0.0
                };
                if ratio < prev.health && ratio <= 1.0 {
                    dirty = true;
                }
            }
        });

        if !dirty {
            // The interval clock only advances when nothing needed saving.
            self.last_vitals_save = now;
        }
        dirty
    }

    /// Persist live ratios for every locally controlled player.
    fn save_local_vitals(&mut self, roster: &mut dyn CharacterRoster) {
        let mut snapshots: Vec<(CharacterId, VitalsRatios)> = Vec::new();
        roster.visit_local_players(&mut |character| {
            snapshots.push((character.id().clone(), capture_ratios(character)));
        });
        for (id, ratios) in snapshots {
            self.persist_vitals(&id, ratios);
        }
    }

    /// Persist local player vitals immediately, regardless of the cadence
    /// clock. Called by the host glue on game save and session teardown;
    /// unlike the tick path, failures propagate.
    pub fn flush_vitals(&mut self, roster: &mut dyn CharacterRoster) -> Result<(), EngineError> {
        let mut snapshots: Vec<(CharacterId, VitalsRatios)> = Vec::new();
        roster.visit_local_players(&mut |character| {
            snapshots.push((character.id().clone(), capture_ratios(character)));
        });
        for (id, ratios) in snapshots {
            self.repository.save(&id, &ratios)?;
            self.last_vitals.insert(id, ratios);
        }
        Ok(())
    }
}
