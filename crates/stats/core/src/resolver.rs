//! Deterministic mapping from a configured value to a clamped stack delta.
//!
//! The resolver never lets a modifier push an attribute across its limit:
//! an additive delta is floored at `limit - base`, and a negative
//! multiplicative delta (a percentage cut) is floored at the fraction that
//! would land exactly on the limit. Positive multiplicative deltas pass
//! through unclamped.

use crate::tags::{MAX_RESOURCE_LIMIT, MINIMUM_MOD, StatTag};

/// Clamp policy flags taken from the configuration bundle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Clamp against the game's natural per-attribute limits.
    pub use_native_balancing: bool,
    /// Clamp against stricter per-class floors instead.
    pub strict_minimum: bool,
}

/// Clamp a configured delta against a limit.
///
/// - additive: `max(limit - base, configured)`
/// - multiplicative, `configured < 0`: the cut may not undershoot `limit`;
///   the steepest allowed fraction is `(limit - base) / base`
/// - multiplicative, `configured >= 0`: pass through
pub fn clamp_delta(multiplicative: bool, base: f32, configured: f32, limit: f32) -> f32 {
    if multiplicative {
        if configured < 0.0 {
            let floor = (limit - base) / base;
            if floor > configured { floor } else { configured }
        } else {
            configured
        }
    } else {
        (limit - base).max(configured)
    }
}

/// Resolve a configured value into the delta to stack onto `tag`.
///
/// Native balancing clamps against the tag's natural limit. Strict minimum
/// replaces that limit with a tighter floor: maximum-resource tags are
/// bounded to 1, small-modifier tags to 0, everything else to 0. With both
/// policies off the configured value passes through unmodified.
pub fn compute_delta(
    tag: StatTag,
    base: f32,
    configured: f32,
    multiplicative: bool,
    policy: ResolvePolicy,
) -> f32 {
    if policy.use_native_balancing {
        clamp_delta(multiplicative, base, configured, tag.natural_limit())
    } else if policy.strict_minimum {
        let limit = match tag.natural_limit() {
            l if l == MAX_RESOURCE_LIMIT => 1.0,
            l if l == MINIMUM_MOD => 0.0,
            _ => 0.0,
        };
        clamp_delta(multiplicative, base, configured, limit)
    } else {
        configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY_NATIVE: ResolvePolicy = ResolvePolicy {
        use_native_balancing: true,
        strict_minimum: false,
    };
    const POLICY_STRICT: ResolvePolicy = ResolvePolicy {
        use_native_balancing: false,
        strict_minimum: true,
    };
    const POLICY_OPEN: ResolvePolicy = ResolvePolicy {
        use_native_balancing: false,
        strict_minimum: false,
    };

    #[test]
    fn additive_delta_never_undershoots_limit() {
        // base 100, limit 50: a -80 delta would land at 20, clamp to -50.
        assert_eq!(clamp_delta(false, 100.0, -80.0, 50.0), -50.0);
        // A delta that stays above the limit passes through.
        assert_eq!(clamp_delta(false, 100.0, -30.0, 50.0), -30.0);
        assert_eq!(clamp_delta(false, 100.0, 25.0, 50.0), 25.0);
    }

    #[test]
    fn negative_multiplicative_delta_floors_at_limit_fraction() {
        // base 200, limit 50: steepest allowed cut is (50-200)/200 = -0.75.
        assert_eq!(clamp_delta(true, 200.0, -0.9, 50.0), -0.75);
        assert_eq!(clamp_delta(true, 200.0, -0.5, 50.0), -0.5);
    }

    #[test]
    fn positive_multiplicative_delta_passes_through() {
        assert_eq!(clamp_delta(true, 200.0, 3.0, 50.0), 3.0);
        assert_eq!(clamp_delta(true, 200.0, 0.0, 50.0), 0.0);
    }

    #[test]
    fn native_balancing_uses_natural_limit() {
        // MaxHealth natural limit is 50.
        assert_eq!(
            compute_delta(StatTag::MaxHealth, 100.0, -80.0, false, POLICY_NATIVE),
            -50.0
        );
    }

    #[test]
    fn strict_minimum_remaps_resource_limit_to_one() {
        // Natural limit 50 becomes 1 regardless of configured value.
        assert_eq!(
            compute_delta(StatTag::MaxHealth, 100.0, -200.0, false, POLICY_STRICT),
            -99.0
        );
        // Small-modifier limit 0.01 becomes 0.
        assert_eq!(
            compute_delta(StatTag::MovementSpeed, 2.0, -5.0, false, POLICY_STRICT),
            -2.0
        );
        // Plain attributes stay floored at 0.
        assert_eq!(
            compute_delta(StatTag::FireDamage, 10.0, -50.0, false, POLICY_STRICT),
            -10.0
        );
    }

    #[test]
    fn open_policy_passes_through_unclamped() {
        assert_eq!(
            compute_delta(StatTag::MaxHealth, 100.0, -500.0, false, POLICY_OPEN),
            -500.0
        );
        assert_eq!(
            compute_delta(StatTag::MaxHealth, 100.0, -0.99, true, POLICY_OPEN),
            -0.99
        );
    }
}
