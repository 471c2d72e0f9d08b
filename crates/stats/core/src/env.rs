//! Capability traits describing the entity framework boundary.
//!
//! The engine owns no attribute storage. Everything it knows about an entity
//! flows through [`CharacterHandle`], a deliberately narrow interface the
//! host game implements: read a base attribute value, push/remove a modifier
//! stack, read/write the six vital pools. [`CharacterRoster`] provides
//! iteration over live entities and the identity of the current session host.

use crate::tags::AttributeKey;

/// Stable identity of one entity across the session and on disk.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterId(String);

impl CharacterId {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six proportional vital pools.
///
/// Burnt pools have no maximum of their own; they are bounded by the base
/// pool they shadow (`cap` maps them back).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VitalPool {
    Health,
    BurntHealth,
    Stamina,
    BurntStamina,
    Mana,
    BurntMana,
}

impl VitalPool {
    pub const ALL: [VitalPool; 6] = [
        VitalPool::Health,
        VitalPool::BurntHealth,
        VitalPool::Stamina,
        VitalPool::BurntStamina,
        VitalPool::Mana,
        VitalPool::BurntMana,
    ];

    /// The pool whose maximum bounds this one.
    pub fn cap(self) -> VitalPool {
        match self {
            VitalPool::Health | VitalPool::BurntHealth => VitalPool::Health,
            VitalPool::Stamina | VitalPool::BurntStamina => VitalPool::Stamina,
            VitalPool::Mana | VitalPool::BurntMana => VitalPool::Mana,
        }
    }
}

/// Absolute vital values as the game's own character save stores them.
///
/// Used by the restore path that bypasses proportional rescaling for local
/// players when native balancing is off.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbsoluteVitals {
    pub health: f32,
    pub burnt_health: f32,
    pub stamina: f32,
    pub burnt_stamina: f32,
    pub mana: f32,
    pub burnt_mana: f32,
}

impl AbsoluteVitals {
    pub fn get(&self, pool: VitalPool) -> f32 {
        match pool {
            VitalPool::Health => self.health,
            VitalPool::BurntHealth => self.burnt_health,
            VitalPool::Stamina => self.stamina,
            VitalPool::BurntStamina => self.burnt_stamina,
            VitalPool::Mana => self.mana,
            VitalPool::BurntMana => self.burnt_mana,
        }
    }
}

/// Narrow capability interface onto one entity's attribute storage.
///
/// Implementations live in the host game (or in test fakes). The engine
/// calls these and nothing else; it never reaches into framework internals.
pub trait CharacterHandle {
    fn id(&self) -> &CharacterId;

    /// Non-player entity?
    fn is_ai(&self) -> bool;

    /// Locally controlled, human player?
    fn is_local_player(&self) -> bool;

    /// Current base value of an attribute axis (before our stacks).
    fn base_value(&self, key: AttributeKey) -> f32;

    /// Recompute attribute maxima from current stacks and equipment.
    fn recompute_maxima(&mut self);

    /// Refill every vital pool to its maximum.
    fn restore_all_resources(&mut self);

    /// Push a modifier stack onto an attribute axis.
    fn add_stack(&mut self, key: AttributeKey, source: &str, value: f32, multiplicative: bool);

    /// Remove the stack a source holds on an attribute axis, if any.
    fn remove_stack(&mut self, key: AttributeKey, source: &str, multiplicative: bool);

    /// Maximum of a vital pool. Burnt pools report their base pool's max.
    fn max_pool(&self, pool: VitalPool) -> f32;

    /// Current absolute value of a vital pool.
    fn current_pool(&self, pool: VitalPool) -> f32;

    /// Overwrite the current absolute value of a vital pool.
    fn set_pool(&mut self, pool: VitalPool, value: f32);

    /// The game's own persisted character save, if one exists.
    fn saved_vitals(&self) -> Option<AbsoluteVitals> {
        None
    }
}

/// Iteration over the live entities of a session.
pub trait CharacterRoster {
    /// Visit every live entity.
    fn visit_all(&mut self, f: &mut dyn FnMut(&mut dyn CharacterHandle));

    /// Visit locally controlled player entities only.
    fn visit_local_players(&mut self, f: &mut dyn FnMut(&mut dyn CharacterHandle));

    /// Identity of the entity currently recognized as world host, if any.
    fn host_character(&self) -> Option<CharacterId>;
}
