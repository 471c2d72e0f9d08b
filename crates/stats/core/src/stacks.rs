//! Idempotent application of a configuration bundle onto one entity.
//!
//! Every float setting becomes at most one stack per (attribute, source,
//! variant) triple. Applying always clears the previous stack from the same
//! source first, for both the additive and the multiplicative variant, so
//! re-applying the same bundle is a no-op beyond recomputation cost.

use crate::config::{StatsConfig, setting};
use crate::env::CharacterHandle;
use crate::resolver::{ResolvePolicy, compute_delta};
use crate::tags::{AttributeKey, StatTag};
use crate::vitals::{VitalsRatios, capture_ratios, restore_ratios};

/// Which entity class a configuration bundle targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModTarget {
    Player,
    Ai,
}

impl ModTarget {
    /// The source name attributed to every stack this target pushes.
    pub fn stack_source(self) -> &'static str {
        match self {
            ModTarget::Player => "player stats",
            ModTarget::Ai => "AI stats",
        }
    }

    /// The bundle name for this target.
    pub fn config_name(self) -> &'static str {
        match self {
            ModTarget::Player => setting::PLAYER_CONFIG,
            ModTarget::Ai => setting::AI_CONFIG,
        }
    }

    /// Route a bundle name to its target class.
    pub fn for_config(name: &str) -> ModTarget {
        if name.contains("Player") {
            ModTarget::Player
        } else {
            ModTarget::Ai
        }
    }

    /// Does this target govern the given entity?
    pub fn governs(self, character: &dyn CharacterHandle) -> bool {
        match self {
            ModTarget::Player => !character.is_ai(),
            ModTarget::Ai => character.is_ai(),
        }
    }
}

/// Result of [`apply_config`]: the entity's post-restore ratios and whether
/// the caller should persist them (local, human-controlled entities only).
#[derive(Clone, Copy, Debug)]
pub struct AppliedVitals {
    pub ratios: VitalsRatios,
    pub persist: bool,
}

fn clear_stack(
    character: &mut dyn CharacterHandle,
    key: AttributeKey,
    source: &str,
    multiplicative: bool,
) {
    character.remove_stack(key, source, !multiplicative);
    character.remove_stack(key, source, multiplicative);
}

/// Apply (or clear, when `enabled` is false) every float setting of `config`
/// onto one entity, preserving its proportional vitals.
///
/// `cached` supplies a previously persisted ratio snapshot; without one the
/// entity's current ratios are used. Unknown setting names resolve to no tag
/// and are skipped, as are player-only tags on AI entities.
pub fn apply_config(
    character: &mut dyn CharacterHandle,
    config: &StatsConfig,
    target: ModTarget,
    enabled: bool,
    cached: Option<VitalsRatios>,
) -> AppliedVitals {
    // Base values depend on current maxima; recompute before touching stacks.
    character.recompute_maxima();
    character.restore_all_resources();

    let ratios = cached.unwrap_or_else(|| capture_ratios(character));

    let policy = ResolvePolicy {
        use_native_balancing: config.uses_native_balancing(),
        strict_minimum: config.get_bool(setting::STRICT_MINIMUM).unwrap_or(false),
    };
    let source = target.stack_source();

    for (name, value, multiplicative) in config.float_settings() {
        let Some(tag) = StatTag::from_name(name) else {
            continue;
        };
        if tag.player_only() && character.is_ai() {
            continue;
        }
        let key = tag.attribute();

        clear_stack(character, key, source, multiplicative);
        if !enabled {
            continue;
        }

        // The cleared stack may have fed the maxima this delta reads from.
        character.recompute_maxima();
        let base = character.base_value(key);
        let configured = if multiplicative { value / 100.0 } else { value };
        let delta = compute_delta(tag, base, configured, multiplicative, policy);
        character.add_stack(key, source, delta, multiplicative);
    }

    character.recompute_maxima();
    restore_ratios(character, &ratios, policy.use_native_balancing);

    AppliedVitals {
        ratios: capture_ratios(character),
        persist: !character.is_ai() && character.is_local_player(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigValue;
    use crate::env::{CharacterId, VitalPool};
    use std::collections::BTreeMap;

    /// In-memory entity with a multiplicative-aware maxima model for the
    /// three resource pools.
    struct StackFake {
        id: CharacterId,
        ai: bool,
        base: BTreeMap<AttributeKey, f32>,
        stacks: BTreeMap<(AttributeKey, String, bool), f32>,
        max: BTreeMap<VitalPool, f32>,
        current: BTreeMap<VitalPool, f32>,
    }

    impl StackFake {
        fn new(ai: bool) -> Self {
            let mut base = BTreeMap::new();
            base.insert(AttributeKey::MaxHealth, 100.0);
            base.insert(AttributeKey::MaxStamina, 100.0);
            base.insert(AttributeKey::MaxMana, 40.0);

            let mut fake = Self {
                id: CharacterId::new(if ai { "bandit-1" } else { "player-1" }),
                ai,
                base,
                stacks: BTreeMap::new(),
                max: BTreeMap::new(),
                current: BTreeMap::new(),
            };
            fake.recompute_maxima();
            for pool in VitalPool::ALL {
                fake.current.insert(pool, 0.0);
            }
            fake
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

        fn stack(&self, key: AttributeKey, source: &str, mult: bool) -> Option<f32> {
            self.stacks.get(&(key, source.to_owned(), mult)).copied()
        }
    }

    impl CharacterHandle for StackFake {
        fn id(&self) -> &CharacterId {
            &self.id
        }
        fn is_ai(&self) -> bool {
            self.ai
        }
        fn is_local_player(&self) -> bool {
            !self.ai
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

    fn player_config(values: &[(&str, f32)]) -> StatsConfig {
        let mut config = StatsConfig::player_default();
        config.set_bool(setting::TOGGLE, true);
        for (name, value) in values {
            config.set_float(name, *value);
        }
        config
    }

    #[test]
    fn additive_stack_lands_on_attribute() {
        let mut fake = StackFake::new(false);
        let config = player_config(&[("MaxHealth", 20.0)]);

        apply_config(&mut fake, &config, ModTarget::Player, true, None);

        assert_eq!(
            fake.stack(AttributeKey::MaxHealth, "player stats", false),
            Some(20.0)
        );
        assert_eq!(fake.max_pool(VitalPool::Health), 120.0);
    }

    #[test]
    fn multiplicative_value_is_a_percentage() {
        let mut fake = StackFake::new(false);
        let mut config = player_config(&[("MaxStamina", 50.0)]);
        config.set_bool("MaxStamina+Mult", true);

        apply_config(&mut fake, &config, ModTarget::Player, true, None);

        assert_eq!(
            fake.stack(AttributeKey::MaxStamina, "player stats", true),
            Some(0.5)
        );
        assert_eq!(fake.max_pool(VitalPool::Stamina), 150.0);
    }

    #[test]
    fn double_apply_is_idempotent() {
        let mut fake = StackFake::new(false);
        let config = player_config(&[("MaxHealth", 20.0), ("FireDamage", 5.0)]);

        apply_config(&mut fake, &config, ModTarget::Player, true, None);
        let first = fake.stacks.clone();
        apply_config(&mut fake, &config, ModTarget::Player, true, None);

        assert_eq!(fake.stacks, first);
        assert_eq!(fake.max_pool(VitalPool::Health), 120.0);
    }

    #[test]
    fn switching_variant_leaves_no_leftover_stack() {
        let mut fake = StackFake::new(false);
        let mut config = player_config(&[("MaxHealth", 20.0)]);
        apply_config(&mut fake, &config, ModTarget::Player, true, None);

        // Flip the same setting to multiplicative; the additive stack from
        // the earlier apply must be gone.
        config.set_bool("MaxHealth+Mult", true);
        apply_config(&mut fake, &config, ModTarget::Player, true, None);

        assert_eq!(fake.stack(AttributeKey::MaxHealth, "player stats", false), None);
        assert_eq!(
            fake.stack(AttributeKey::MaxHealth, "player stats", true),
            Some(0.2)
        );
    }

    #[test]
    fn disabled_apply_clears_everything() {
        let mut fake = StackFake::new(false);
        let config = player_config(&[("MaxHealth", 20.0), ("MovementSpeed", 1.0)]);
        apply_config(&mut fake, &config, ModTarget::Player, true, None);
        assert!(!fake.stacks.is_empty());

        apply_config(&mut fake, &config, ModTarget::Player, false, None);
        assert!(fake.stacks.is_empty());
        assert_eq!(fake.max_pool(VitalPool::Health), 100.0);
    }

    #[test]
    fn vitals_ratio_survives_max_change() {
        let mut fake = StackFake::new(false);
        // Half health before the bundle lands.
        fake.restore_all_resources();
        fake.set_pool(VitalPool::Health, 50.0);
        let cached = capture_ratios(&fake);

        let config = player_config(&[("MaxHealth", 100.0)]);
        apply_config(&mut fake, &config, ModTarget::Player, true, Some(cached));

        assert_eq!(fake.max_pool(VitalPool::Health), 200.0);
        assert_eq!(fake.current_pool(VitalPool::Health), 100.0);
    }

    #[test]
    fn unknown_setting_names_are_skipped() {
        let known = player_config(&[]);
        let mut payload = known.to_payload(CharacterId::new("host"));
        payload
            .values
            .push(("FutureStat".to_owned(), ConfigValue::Float(5.0)));
        let with_unknown = StatsConfig::from_payload(&payload);

        let mut fake_a = StackFake::new(false);
        let mut fake_b = StackFake::new(false);
        apply_config(&mut fake_a, &known, ModTarget::Player, true, None);
        apply_config(&mut fake_b, &with_unknown, ModTarget::Player, true, None);

        // The unrecognized entry resolves to no tag and leaves no trace.
        assert_eq!(fake_a.stacks, fake_b.stacks);
        assert_eq!(fake_b.max_pool(VitalPool::Health), 100.0);
    }

    #[test]
    fn player_only_tags_skip_ai_entities() {
        let mut fake = StackFake::new(true);
        let mut config = StatsConfig::ai_default();
        config.set_bool(setting::TOGGLE, true);
        config.set_float("FoodDepleteRate", 2.0);

        let outcome = apply_config(&mut fake, &config, ModTarget::Ai, true, None);

        assert_eq!(
            fake.stack(AttributeKey::FoodDepletionRate, "AI stats", false),
            None
        );
        assert!(!outcome.persist);
    }

    #[test]
    fn persist_flagged_for_local_players_only() {
        let mut player = StackFake::new(false);
        let config = player_config(&[]);
        let outcome = apply_config(&mut player, &config, ModTarget::Player, true, None);
        assert!(outcome.persist);
    }
}
