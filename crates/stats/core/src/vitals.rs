//! Vitals ratio capture and restore.
//!
//! Attribute-maximum recomputation would silently shift an entity's
//! proportional resource levels: a character at 50/100 health whose maximum
//! grows to 120 should sit at 60/120 afterwards, not 50/120. The ratio set
//! captured here is taken before recomputation and multiplied back against
//! the fresh maxima afterwards.

use crate::env::{CharacterHandle, VitalPool};

/// Six current/maximum ratios, keyed on disk by entity identity.
///
/// Serialized field names are the persisted file shape; changing them
/// orphans every existing snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VitalsRatios {
    #[cfg_attr(feature = "serde", serde(rename = "healthRatio"))]
    pub health: f32,
    #[cfg_attr(feature = "serde", serde(rename = "burntHealthRatio"))]
    pub burnt_health: f32,
    #[cfg_attr(feature = "serde", serde(rename = "staminaRatio"))]
    pub stamina: f32,
    #[cfg_attr(feature = "serde", serde(rename = "burntStaminaRatio"))]
    pub burnt_stamina: f32,
    #[cfg_attr(feature = "serde", serde(rename = "manaRatio"))]
    pub mana: f32,
    #[cfg_attr(feature = "serde", serde(rename = "burntManaRatio"))]
    pub burnt_mana: f32,
}

impl VitalsRatios {
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

    fn set(&mut self, pool: VitalPool, ratio: f32) {
        match pool {
            VitalPool::Health => self.health = ratio,
            VitalPool::BurntHealth => self.burnt_health = ratio,
            VitalPool::Stamina => self.stamina = ratio,
            VitalPool::BurntStamina => self.burnt_stamina = ratio,
            VitalPool::Mana => self.mana = ratio,
            VitalPool::BurntMana => self.burnt_mana = ratio,
        }
    }
}

/// Read the six current/maximum ratios off an entity.
///
/// Burnt pools divide by their base pool's maximum. A zero maximum yields a
/// zero ratio; by the time this runs recomputation has already happened, so
/// that only occurs for entities without the pool at all.
pub fn capture_ratios(character: &dyn CharacterHandle) -> VitalsRatios {
    let mut ratios = VitalsRatios::default();
    for pool in VitalPool::ALL {
        let max = character.max_pool(pool.cap());
        let ratio = if max > 0.0 {
            character.current_pool(pool) / max
        } else {
            0.0
        };
        ratios.set(pool, ratio);
    }
    ratios
}

/// Rescale the six absolute values against freshly recomputed maxima.
///
/// For a local player with native balancing off whose game save still
/// exists, the saved *absolute* values win over proportional rescaling; this
/// keeps single-player save continuity free of rounding drift across
/// repeated recomputations.
pub fn restore_ratios(
    character: &mut dyn CharacterHandle,
    ratios: &VitalsRatios,
    use_native_balancing: bool,
) {
    if !use_native_balancing && character.is_local_player() {
        if let Some(saved) = character.saved_vitals() {
            for pool in VitalPool::ALL {
                character.set_pool(pool, saved.get(pool));
            }
            return;
        }
    }

    for pool in VitalPool::ALL {
        let value = character.max_pool(pool.cap()) * ratios.get(pool);
        character.set_pool(pool, value);
    }
}
