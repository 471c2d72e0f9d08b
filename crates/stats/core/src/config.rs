//! Named configuration bundles and their wire shape.
//!
//! A [`StatsConfig`] is an ordered collection of named settings: three policy
//! toggles plus one float (and its `+Mult` boolean companion) per attribute
//! tag. Settings are immutable once defined; only values change. Two
//! participants are considered to hold "the same" configuration when the
//! bundle *names* match, never by comparing references or contents.

use strum::IntoEnumIterator;

use crate::env::CharacterId;
use crate::tags::StatTag;

/// Well-known setting names.
pub mod setting {
    /// Master toggle for the whole bundle.
    pub const TOGGLE: &str = "Toggle";
    /// Use the game's native balancing limits when clamping.
    pub const GAME_BEHAVIOUR: &str = "GameBehaviour";
    /// Substitute stricter per-class floors for the natural limits.
    pub const STRICT_MINIMUM: &str = "StrictMinimum";
    /// Suffix of the implicit boolean companion of every float setting.
    pub const MULT_SUFFIX: &str = "+Mult";

    /// Bundle name of the player-target configuration.
    pub const PLAYER_CONFIG: &str = "PlayerStats";
    /// Bundle name of the AI-target configuration.
    pub const AI_CONFIG: &str = "AIStats";
}

/// A single setting value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigValue {
    Bool(bool),
    Float(f32),
}

/// A named bundle of ordered settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsConfig {
    name: String,
    settings: Vec<(String, ConfigValue)>,
}

impl StatsConfig {
    /// Build an empty bundle with the given identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: Vec::new(),
        }
    }

    /// Default player-target bundle: policy toggles plus a zeroed float and
    /// `+Mult` companion for every known tag, in tag order.
    pub fn player_default() -> Self {
        Self::default_with_name(setting::PLAYER_CONFIG)
    }

    /// Default AI-target bundle.
    pub fn ai_default() -> Self {
        Self::default_with_name(setting::AI_CONFIG)
    }

    fn default_with_name(name: &str) -> Self {
        let mut config = Self::new(name);
        config.define_bool(setting::TOGGLE, false);
        config.define_bool(setting::GAME_BEHAVIOUR, false);
        config.define_bool(setting::STRICT_MINIMUM, false);
        for tag in StatTag::iter() {
            config.define_float(tag.name(), 0.0);
            config.define_bool(&format!("{}{}", tag.name(), setting::MULT_SUFFIX), false);
        }
        config
    }

    /// Bundle identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered view of all settings.
    pub fn settings(&self) -> &[(String, ConfigValue)] {
        &self.settings
    }

    /// Ordered iterator over float settings with their `+Mult` companion.
    pub fn float_settings(&self) -> impl Iterator<Item = (&str, f32, bool)> {
        self.settings.iter().filter_map(|(name, value)| match value {
            ConfigValue::Float(v) => Some((name.as_str(), *v, self.is_multiplicative(name))),
            ConfigValue::Bool(_) => None,
        })
    }

    fn is_multiplicative(&self, name: &str) -> bool {
        let companion = format!("{}{}", name, setting::MULT_SUFFIX);
        self.get_bool(&companion).unwrap_or(false)
    }

    fn define_bool(&mut self, name: &str, value: bool) {
        self.settings
            .push((name.to_owned(), ConfigValue::Bool(value)));
    }

    fn define_float(&mut self, name: &str, value: f32) {
        self.settings
            .push((name.to_owned(), ConfigValue::Float(value)));
    }

    fn find(&self, name: &str) -> Option<&ConfigValue> {
        self.settings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut ConfigValue> {
        self.settings
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Look up a boolean setting.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.find(name) {
            Some(ConfigValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Look up a float setting.
    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.find(name) {
            Some(ConfigValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Update a boolean setting. Unknown or mistyped names are ignored.
    pub fn set_bool(&mut self, name: &str, value: bool) {
        if let Some(ConfigValue::Bool(v)) = self.find_mut(name) {
            *v = value;
        }
    }

    /// Update a float setting. Unknown or mistyped names are ignored.
    pub fn set_float(&mut self, name: &str, value: f32) {
        if let Some(ConfigValue::Float(v)) = self.find_mut(name) {
            *v = value;
        }
    }

    /// True when the bundle's master toggle is on.
    pub fn enabled(&self) -> bool {
        self.get_bool(setting::TOGGLE).unwrap_or(false)
    }

    /// True when the bundle defers to the game's native balancing limits.
    pub fn uses_native_balancing(&self) -> bool {
        self.get_bool(setting::GAME_BEHAVIOUR).unwrap_or(false)
    }

    /// Full named-value dump for a host broadcast.
    pub fn to_payload(&self, host: CharacterId) -> SyncPayload {
        SyncPayload {
            config_name: self.name.clone(),
            host,
            values: self.settings.clone(),
        }
    }

    /// Rebuild a bundle from a received dump.
    pub fn from_payload(payload: &SyncPayload) -> Self {
        Self {
            name: payload.config_name.clone(),
            settings: payload.values.clone(),
        }
    }
}

/// Wire shape of a host configuration broadcast: the bundle identity, the
/// broadcasting host, and every setting by name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncPayload {
    pub config_name: String,
    pub host: CharacterId,
    pub values: Vec<(String, ConfigValue)>,
}
