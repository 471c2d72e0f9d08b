//! Shared in-memory fakes for driver tests: a session oracle, a character
//! roster with a small multiplicative maxima model, and a recording
//! transport.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use runtime::{SessionOracle, SyncMessage, SyncTransport, TransportError};
use stats_core::{AttributeKey, CharacterHandle, CharacterId, CharacterRoster, VitalPool};

/// Session flags, all public so tests can flip them mid-scenario.
#[derive(Clone)]
pub struct TestSession {
    pub participants: usize,
    pub paused: bool,
    pub loading: bool,
    pub offline: bool,
    pub master: bool,
    pub connected: bool,
}

impl TestSession {
    /// A session where we are the master among `participants`.
    pub fn master(participants: usize) -> Self {
        Self {
            participants,
            paused: false,
            loading: false,
            offline: false,
            master: true,
            connected: true,
        }
    }

    /// A session where somebody else is master.
    pub fn subordinate(participants: usize) -> Self {
        Self {
            master: false,
            ..Self::master(participants)
        }
    }
}

impl SessionOracle for TestSession {
    fn participant_count(&self) -> usize {
        self.participants
    }
    fn is_gameplay_paused(&self) -> bool {
        self.paused
    }
    fn is_gameplay_loading(&self) -> bool {
        self.loading
    }
    fn is_offline_mode(&self) -> bool {
        self.offline
    }
    fn is_non_master_client(&self) -> bool {
        !self.master && self.connected && !self.offline
    }
    fn is_master_client(&self) -> bool {
        self.master
    }
    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Entity fake: flat base values, one stack per (attribute, source,
/// variant), and pool maxima of `(base + flat) * (1 + fraction)`.
pub struct TestCharacter {
    id: CharacterId,
    ai: bool,
    local: bool,
    base: BTreeMap<AttributeKey, f32>,
    stacks: BTreeMap<(AttributeKey, String, bool), f32>,
    max: BTreeMap<VitalPool, f32>,
    current: BTreeMap<VitalPool, f32>,
}

impl TestCharacter {
    pub fn player(uid: &str) -> Self {
        Self::new(uid, false, true)
    }

    pub fn remote_player(uid: &str) -> Self {
        Self::new(uid, false, false)
    }

    pub fn ai(uid: &str) -> Self {
        Self::new(uid, true, false)
    }

    fn new(uid: &str, ai: bool, local: bool) -> Self {
        let mut base = BTreeMap::new();
        base.insert(AttributeKey::MaxHealth, 100.0);
        base.insert(AttributeKey::MaxStamina, 100.0);
        base.insert(AttributeKey::MaxMana, 40.0);

        let mut character = Self {
            id: CharacterId::new(uid),
            ai,
            local,
            base,
            stacks: BTreeMap::new(),
            max: BTreeMap::new(),
            current: BTreeMap::new(),
        };
        character.recompute_maxima();
        character.restore_all_resources();
        character
    }

    pub fn stack(&self, key: AttributeKey, source: &str, mult: bool) -> Option<f32> {
        self.stacks.get(&(key, source.to_owned(), mult)).copied()
    }

    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }

    fn pool_attribute(pool: VitalPool) -> AttributeKey {
        match pool.cap() {
            VitalPool::Health => AttributeKey::MaxHealth,
            VitalPool::Stamina => AttributeKey::MaxStamina,
            VitalPool::Mana => AttributeKey::MaxMana,
            _ => unreachable!(),
        }
    }

    fn effective(&self, key: AttributeKey) -> f32 {
        let base = self.base.get(&key).copied().unwrap_or(0.0);
        let flat: f32 = self
            .stacks
            .iter()
            .filter(|((k, _, mult), _)| *k == key && !mult)
            .map(|(_, v)| v)
            .sum();
        let fraction: f32 = self
            .stacks
            .iter()
            .filter(|((k, _, mult), _)| *k == key && *mult)
            .map(|(_, v)| v)
            .sum();
        (base + flat) * (1.0 + fraction)
    }
}

impl CharacterHandle for TestCharacter {
    fn id(&self) -> &CharacterId {
        &self.id
    }
    fn is_ai(&self) -> bool {
        self.ai
    }
    fn is_local_player(&self) -> bool {
        self.local
    }
    fn base_value(&self, key: AttributeKey) -> f32 {
        self.base.get(&key).copied().unwrap_or(0.0)
    }
    fn recompute_maxima(&mut self) {
        for pool in [VitalPool::Health, VitalPool::Stamina, VitalPool::Mana] {
            let max = self.effective(Self::pool_attribute(pool));
            self.max.insert(pool, max);
        }
    }
    fn restore_all_resources(&mut self) {
        for pool in [VitalPool::Health, VitalPool::Stamina, VitalPool::Mana] {
            self.current.insert(pool, self.max[&pool]);
        }
    }
    fn add_stack(&mut self, key: AttributeKey, source: &str, value: f32, mult: bool) {
        self.stacks.insert((key, source.to_owned(), mult), value);
    }
    fn remove_stack(&mut self, key: AttributeKey, source: &str, mult: bool) {
        self.stacks.remove(&(key, source.to_owned(), mult));
    }
    fn max_pool(&self, pool: VitalPool) -> f32 {
        self.max.get(&pool.cap()).copied().unwrap_or(0.0)
    }
    fn current_pool(&self, pool: VitalPool) -> f32 {
        self.current.get(&pool).copied().unwrap_or(0.0)
    }
    fn set_pool(&mut self, pool: VitalPool, value: f32) {
        self.current.insert(pool, value);
    }
}

/// Roster over a vector of fakes plus the recognized world host.
pub struct TestRoster {
    pub characters: Vec<TestCharacter>,
    pub host: Option<CharacterId>,
}

impl TestRoster {
    pub fn new(characters: Vec<TestCharacter>, host: Option<&str>) -> Self {
        Self {
            characters,
            host: host.map(CharacterId::new),
        }
    }

    pub fn character(&self, uid: &str) -> &TestCharacter {
        self.characters
            .iter()
            .find(|c| c.id().as_str() == uid)
            .expect("character in roster")
    }

    pub fn character_mut(&mut self, uid: &str) -> &mut TestCharacter {
        self.characters
            .iter_mut()
            .find(|c| c.id().as_str() == uid)
            .expect("character in roster")
    }
}

impl CharacterRoster for TestRoster {
    fn visit_all(&mut self, f: &mut dyn FnMut(&mut dyn CharacterHandle)) {
        for character in &mut self.characters {
            f(character);
        }
    }

    fn visit_local_players(&mut self, f: &mut dyn FnMut(&mut dyn CharacterHandle)) {
        for character in &mut self.characters {
            if character.is_local_player() {
                f(character);
            }
        }
    }

    fn host_character(&self) -> Option<CharacterId> {
        self.host.clone()
    }
}

/// Transport fake that records every send.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<SyncMessage>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take(&self) -> Vec<SyncMessage> {
        std::mem::take(&mut self.sent.lock().unwrap())
    }
}

#[async_trait::async_trait]
impl SyncTransport for RecordingTransport {
    async fn send(&self, message: SyncMessage) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}
