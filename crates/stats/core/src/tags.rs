//! Attribute tags and the static dispatch table.
//!
//! Every configurable float setting is addressed by a [`StatTag`]. Each tag
//! resolves to the underlying attribute axis it modifies and to the natural
//! clamp limit the resolver uses. Both mappings are exhaustive `match`es, so
//! adding a tag without a dispatch entry is a compile error rather than a
//! silent no-op.
//!
//! Several tags intentionally alias the same underlying axis (the game
//! exposes two names for one internal stat). The aliasing is part of the
//! contract and must not be "fixed":
//! - `StaminaUse` / `StaminaCostReduction`
//! - `DecayDamage` / `DarkDamage` (damage only; protection and resistance
//!   have distinct Decay and Dark axes)
//! - `ElectricDamage` / `LightDamage` (same caveat)
//! - `AllResistances` / `DamageResistance`

use strum::{EnumIter, EnumString, IntoStaticStr};

/// Sentinel limit for maximum-resource attributes (MaxHealth, MaxStamina).
pub const MAX_RESOURCE_LIMIT: f32 = 50.0;

/// Natural floor for plain attribute axes.
pub const MINIMUM: f32 = 0.0;

/// Natural floor for small rate/multiplier attributes.
pub const MINIMUM_MOD: f32 = 0.01;

/// Elemental axis shared by damage, protection, and resistance tables.
///
/// Indices mirror the game's internal damage-type arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageAxis {
    Physical,
    Ethereal,
    Decay,
    Electric,
    Frost,
    Fire,
    Dark,
    Light,
}

/// Attribute axes the entity framework actually stores.
///
/// This is the vocabulary of the [`crate::env::CharacterHandle`] capability
/// trait: tags dispatch to one of these, and the handle reads/writes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeKey {
    MaxHealth,
    HealthRegen,
    BurntHealthModifier,
    MaxStamina,
    StaminaRegen,
    StaminaUseModifier,
    BurntStaminaModifier,
    MaxMana,
    ManaRegen,
    ManaUseModifier,
    BurntManaModifier,
    ImpactModifier,
    AllDamageModifier,
    Damage(DamageAxis),
    AllDamageProtection,
    Protection(DamageAxis),
    AllResistanceModifier,
    Resistance(DamageAxis),
    ImpactResistance,
    StabilityRegen,
    ColdProtection,
    HeatProtection,
    ColdRegenRate,
    HeatRegenRate,
    Waterproof,
    CorruptionResistance,
    TemperatureModifier,
    MovementSpeed,
    SpeedModifier,
    AttackSpeedModifier,
    DodgeInvulnerabilityModifier,
    Detectability,
    VisualDetectability,
    PouchCapacity,
    FoodEffectEfficiency,
    SkillCooldownModifier,
    BuyModifier,
    SellModifier,
    FoodDepletionRate,
    DrinkDepletionRate,
    SleepDepletionRate,
}

/// Named attribute tags addressable from a configuration bundle.
///
/// Tag names are the setting names as they appear in the config and on the
/// wire; `from_name` parses them and returns `None` for unknown names so
/// unrecognized settings are skipped rather than rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatTag {
    MaxHealth,
    HealthRegen,
    HealthBurn,
    MaxStamina,
    StaminaRegen,
    StaminaUse,
    StaminaCostReduction,
    StaminaBurn,
    MaxMana,
    ManaRegen,
    ManaUse,
    ManaBurn,
    Impact,
    AllDamages,
    PhysicalDamage,
    EtherealDamage,
    DecayDamage,
    DarkDamage,
    ElectricDamage,
    LightDamage,
    FrostDamage,
    FireDamage,
    DamageProtection,
    PhysicalProtection,
    EtherealProtection,
    DecayProtection,
    ElectricProtection,
    FrostProtection,
    FireProtection,
    DarkProtection,
    LightProtection,
    AllResistances,
    DamageResistance,
    PhysicalResistance,
    EtherealResistance,
    DecayResistance,
    ElectricResistance,
    FrostResistance,
    FireResistance,
    DarkResistance,
    LightResistance,
    ImpactResistance,
    StabilityRegen,
    EnvColdProtection,
    EnvHeatProtection,
    ColdRegen,
    HeatRegen,
    Waterproof,
    CorruptionResistance,
    TemperatureModifier,
    MovementSpeed,
    Speed,
    AttackSpeed,
    DodgeInvulnerabilityModifier,
    Detectability,
    VisualDetectability,
    PouchCapacity,
    FoodEffectEfficiency,
    SkillCooldownModifier,
    BuyModifier,
    SellModifier,
    FoodDepleteRate,
    DrinkDepleteRate,
    SleepDepleteRate,
}

impl StatTag {
    /// Parse a setting name into a tag. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// The setting name for this tag.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The attribute axis this tag modifies.
    pub fn attribute(self) -> AttributeKey {
        use AttributeKey as K;
        use DamageAxis as D;

        match self {
            Self::MaxHealth => K::MaxHealth,
            Self::HealthRegen => K::HealthRegen,
            Self::HealthBurn => K::BurntHealthModifier,
            Self::MaxStamina => K::MaxStamina,
            Self::StaminaRegen => K::StaminaRegen,
            Self::StaminaUse | Self::StaminaCostReduction => K::StaminaUseModifier,
            Self::StaminaBurn => K::BurntStaminaModifier,
            Self::MaxMana => K::MaxMana,
            Self::ManaRegen => K::ManaRegen,
            Self::ManaUse => K::ManaUseModifier,
            Self::ManaBurn => K::BurntManaModifier,
            Self::Impact => K::ImpactModifier,
            Self::AllDamages => K::AllDamageModifier,
            Self::PhysicalDamage => K::Damage(D::Physical),
            Self::EtherealDamage => K::Damage(D::Ethereal),
            // Damage has no Dark/Light axes of its own; both names fold onto
            // the Decay/Electric slots (protection and resistance do not).
            Self::DecayDamage | Self::DarkDamage => K::Damage(D::Decay),
            Self::ElectricDamage | Self::LightDamage => K::Damage(D::Electric),
            Self::FrostDamage => K::Damage(D::Frost),
            Self::FireDamage => K::Damage(D::Fire),
            Self::DamageProtection => K::AllDamageProtection,
            Self::PhysicalProtection => K::Protection(D::Physical),
            Self::EtherealProtection => K::Protection(D::Ethereal),
            Self::DecayProtection => K::Protection(D::Decay),
            Self::ElectricProtection => K::Protection(D::Electric),
            Self::FrostProtection => K::Protection(D::Frost),
            Self::FireProtection => K::Protection(D::Fire),
            Self::DarkProtection => K::Protection(D::Dark),
            Self::LightProtection => K::Protection(D::Light),
            Self::AllResistances | Self::DamageResistance => K::AllResistanceModifier,
            Self::PhysicalResistance => K::Resistance(D::Physical),
            Self::EtherealResistance => K::Resistance(D::Ethereal),
            Self::DecayResistance => K::Resistance(D::Decay),
            Self::ElectricResistance => K::Resistance(D::Electric),
            Self::FrostResistance => K::Resistance(D::Frost),
            Self::FireResistance => K::Resistance(D::Fire),
            Self::DarkResistance => K::Resistance(D::Dark),
            Self::LightResistance => K::Resistance(D::Light),
            Self::ImpactResistance => K::ImpactResistance,
            Self::StabilityRegen => K::StabilityRegen,
            Self::EnvColdProtection => K::ColdProtection,
            Self::EnvHeatProtection => K::HeatProtection,
            Self::ColdRegen => K::ColdRegenRate,
            Self::HeatRegen => K::HeatRegenRate,
            Self::Waterproof => K::Waterproof,
            Self::CorruptionResistance => K::CorruptionResistance,
            Self::TemperatureModifier => K::TemperatureModifier,
            Self::MovementSpeed => K::MovementSpeed,
            Self::Speed => K::SpeedModifier,
            Self::AttackSpeed => K::AttackSpeedModifier,
            Self::DodgeInvulnerabilityModifier => K::DodgeInvulnerabilityModifier,
            Self::Detectability => K::Detectability,
            Self::VisualDetectability => K::VisualDetectability,
            Self::PouchCapacity => K::PouchCapacity,
            Self::FoodEffectEfficiency => K::FoodEffectEfficiency,
            Self::SkillCooldownModifier => K::SkillCooldownModifier,
            Self::BuyModifier => K::BuyModifier,
            Self::SellModifier => K::SellModifier,
            Self::FoodDepleteRate => K::FoodDepletionRate,
            Self::DrinkDepleteRate => K::DrinkDepletionRate,
            Self::SleepDepleteRate => K::SleepDepletionRate,
        }
    }

    /// Natural clamp limit for this tag.
    ///
    /// Maximum-resource pools stop at [`MAX_RESOURCE_LIMIT`], small
    /// rate/multiplier attributes at [`MINIMUM_MOD`], everything else at
    /// [`MINIMUM`]. Note that `MaxMana` uses the plain minimum, not the
    /// resource sentinel; that matches the game's own limit table.
    pub fn natural_limit(self) -> f32 {
        match self {
            Self::MaxHealth | Self::MaxStamina => MAX_RESOURCE_LIMIT,

            Self::HealthBurn
            | Self::StaminaRegen
            | Self::StaminaBurn
            | Self::ManaBurn
            | Self::StabilityRegen
            | Self::ColdRegen
            | Self::HeatRegen
            | Self::MovementSpeed
            | Self::Speed
            | Self::AttackSpeed
            | Self::DodgeInvulnerabilityModifier
            | Self::SkillCooldownModifier
            | Self::BuyModifier
            | Self::SellModifier
            | Self::FoodDepleteRate
            | Self::DrinkDepleteRate
            | Self::SleepDepleteRate => MINIMUM_MOD,

            Self::HealthRegen
            | Self::MaxMana
            | Self::ManaRegen
            | Self::StaminaUse
            | Self::StaminaCostReduction
            | Self::ManaUse
            | Self::Impact
            | Self::AllDamages
            | Self::PhysicalDamage
            | Self::EtherealDamage
            | Self::DecayDamage
            | Self::DarkDamage
            | Self::ElectricDamage
            | Self::LightDamage
            | Self::FrostDamage
            | Self::FireDamage
            | Self::DamageProtection
            | Self::PhysicalProtection
            | Self::EtherealProtection
            | Self::DecayProtection
            | Self::ElectricProtection
            | Self::FrostProtection
            | Self::FireProtection
            | Self::DarkProtection
            | Self::LightProtection
            | Self::AllResistances
            | Self::DamageResistance
            | Self::PhysicalResistance
            | Self::EtherealResistance
            | Self::DecayResistance
            | Self::ElectricResistance
            | Self::FrostResistance
            | Self::FireResistance
            | Self::DarkResistance
            | Self::LightResistance
            | Self::ImpactResistance
            | Self::EnvColdProtection
            | Self::EnvHeatProtection
            | Self::Waterproof
            | Self::CorruptionResistance
            | Self::TemperatureModifier
            | Self::Detectability
            | Self::VisualDetectability
            | Self::PouchCapacity
            | Self::FoodEffectEfficiency => MINIMUM,
        }
    }

    /// Tags whose backing attribute exists only on player characters.
    ///
    /// These read from the player-stat extension; AI entities have no such
    /// axis and the stack applier skips them.
    pub fn player_only(self) -> bool {
        matches!(
            self,
            Self::FoodDepleteRate | Self::DrinkDepleteRate | Self::SleepDepleteRate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn name_round_trip() {
        for tag in StatTag::iter() {
            assert_eq!(StatTag::from_name(tag.name()), Some(tag));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(StatTag::from_name("MaxSanity"), None);
        assert_eq!(StatTag::from_name(""), None);
    }

    #[test]
    fn damage_aliasing_preserved() {
        assert_eq!(
            StatTag::DecayDamage.attribute(),
            StatTag::DarkDamage.attribute()
        );
        assert_eq!(
            StatTag::ElectricDamage.attribute(),
            StatTag::LightDamage.attribute()
        );
        assert_eq!(
            StatTag::StaminaUse.attribute(),
            StatTag::StaminaCostReduction.attribute()
        );
        assert_eq!(
            StatTag::AllResistances.attribute(),
            StatTag::DamageResistance.attribute()
        );
    }

    #[test]
    fn protection_and_resistance_keep_distinct_dark_axes() {
        assert_ne!(
            StatTag::DecayProtection.attribute(),
            StatTag::DarkProtection.attribute()
        );
        assert_ne!(
            StatTag::DecayResistance.attribute(),
            StatTag::DarkResistance.attribute()
        );
    }

    #[test]
    fn limit_table() {
        assert_eq!(StatTag::MaxHealth.natural_limit(), MAX_RESOURCE_LIMIT);
        assert_eq!(StatTag::MaxStamina.natural_limit(), MAX_RESOURCE_LIMIT);
        // MaxMana is deliberately not a resource-sentinel tag.
        assert_eq!(StatTag::MaxMana.natural_limit(), MINIMUM);
        assert_eq!(StatTag::MovementSpeed.natural_limit(), MINIMUM_MOD);
        assert_eq!(StatTag::StaminaRegen.natural_limit(), MINIMUM_MOD);
        assert_eq!(StatTag::HealthRegen.natural_limit(), MINIMUM);
        assert_eq!(StatTag::FireDamage.natural_limit(), MINIMUM);
    }

    #[test]
    fn player_only_tags() {
        let player_only: Vec<_> = StatTag::iter().filter(|t| t.player_only()).collect();
        assert_eq!(
            player_only,
            vec![
                StatTag::FoodDepleteRate,
                StatTag::DrinkDepleteRate,
                StatTag::SleepDepleteRate
            ]
        );
    }
}
