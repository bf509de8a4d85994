//! Combat roles and their theme-adjusted engagement envelopes.

use crate::archetype::Theme;
use serde::{Deserialize, Serialize};

/// Combat role of an agent inside a squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatRole {
    /// Front-liner: close range, soaks damage.
    Tank,
    /// Keeps distance and shoots.
    Ranged,
    /// Stays back and supports squadmates.
    Healer,
    /// Fast, very aggressive close-range attacker.
    Ambusher,
    /// Fastest, spots the opponent for the squad.
    Scout,
}

impl CombatRole {
    pub const ALL: [CombatRole; 5] = [
        CombatRole::Tank,
        CombatRole::Ranged,
        CombatRole::Healer,
        CombatRole::Ambusher,
        CombatRole::Scout,
    ];
}

/// Role-derived combat envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub min_range: f32,
    pub max_range: f32,
    pub preferred_range: f32,
    /// 0.0 = passive, 1.0 = reckless.
    pub aggression: f32,
    /// 0.0 = ignores squadmates, 1.0 = always supports first.
    ///
    /// Not read by the combat tree or the squad coordinator: it is published
    /// for the host (for example to pick who heals whom) and is not copied
    /// onto [`Agent`](crate::components::Agent).
    pub support_priority: f32,
    pub speed_multiplier: f32,
    pub retreat_health_fraction: f32,
    pub uses_cover: bool,
    pub raises_squad_alert: bool,
}

fn base_config(role: CombatRole) -> RoleConfig {
    match role {
        CombatRole::Tank => RoleConfig {
            min_range: 0.0,
            max_range: 1.5,
            preferred_range: 1.0,
            aggression: 0.8,
            support_priority: 0.2,
            speed_multiplier: 0.8,
            retreat_health_fraction: 0.1,
            uses_cover: false,
            raises_squad_alert: false,
        },
        CombatRole::Ranged => RoleConfig {
            min_range: 3.0,
            max_range: 8.0,
            preferred_range: 6.0,
            aggression: 0.5,
            support_priority: 0.3,
            speed_multiplier: 1.0,
            retreat_health_fraction: 0.3,
            uses_cover: false,
            raises_squad_alert: false,
        },
        CombatRole::Healer => RoleConfig {
            min_range: 0.0,
            max_range: 2.0,
            preferred_range: 1.5,
            aggression: 0.1,
            support_priority: 0.9,
            speed_multiplier: 1.0,
            retreat_health_fraction: 0.4,
            uses_cover: true,
            raises_squad_alert: false,
        },
        CombatRole::Ambusher => RoleConfig {
            min_range: 0.0,
            max_range: 1.5,
            preferred_range: 1.0,
            aggression: 0.95,
            support_priority: 0.1,
            speed_multiplier: 1.3,
            retreat_health_fraction: 0.2,
            uses_cover: false,
            raises_squad_alert: false,
        },
        CombatRole::Scout => RoleConfig {
            min_range: 2.0,
            max_range: 7.0,
            preferred_range: 5.0,
            aggression: 0.4,
            support_priority: 0.2,
            speed_multiplier: 1.5,
            retreat_health_fraction: 0.35,
            uses_cover: false,
            raises_squad_alert: true,
        },
    }
}

/// Combat envelope for a role under a theme.
///
/// `None` (an unrecognized theme id) yields the role's base values unmodified.
pub fn role_config(role: CombatRole, theme: Option<Theme>) -> RoleConfig {
    let mut config = base_config(role);
    let Some(theme) = theme else {
        return config;
    };

    match (theme, role) {
        (Theme::SciFi, CombatRole::Ranged) => {
            config.max_range *= 1.2;
            config.preferred_range *= 1.2;
            config.uses_cover = true;
        }
        (Theme::SciFi, CombatRole::Scout) => {
            config.max_range *= 1.2;
        }
        (Theme::Fantasy, CombatRole::Healer) => {
            config.support_priority = (config.support_priority + 0.1).min(1.0);
        }
        (Theme::Horror, _) => {
            // Nothing in a horror setting runs away early.
            config.aggression = (config.aggression + 0.1).min(1.0);
            config.retreat_health_fraction *= 0.5;
        }
        (Theme::Cyberpunk, CombatRole::Ambusher) => {
            config.speed_multiplier *= 1.1;
        }
        (Theme::Cyberpunk, CombatRole::Ranged) => {
            config.uses_cover = true;
        }
        (Theme::PostApocalyptic, CombatRole::Tank) => {
            config.max_range += 0.5;
            config.retreat_health_fraction = 0.05;
        }
        _ => {}
    }

    config
}

/// Convenience over [`role_config`] taking a theme id string.
pub fn role_config_for_id(role: CombatRole, theme_id: &str) -> RoleConfig {
    role_config(role, Theme::from_id(theme_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tank_in_unknown_theme_is_base() {
        let config = role_config_for_id(CombatRole::Tank, "vaporwave");
        assert_eq!(config, base_config(CombatRole::Tank));
    }

    #[test]
    fn test_scifi_ranged_gets_range_and_cover() {
        let base = role_config(CombatRole::Ranged, None);
        let scifi = role_config(CombatRole::Ranged, Some(Theme::SciFi));
        assert!((scifi.max_range - base.max_range * 1.2).abs() < 1e-5);
        assert!(scifi.uses_cover);
        assert!(!base.uses_cover);
    }

    #[test]
    fn test_fantasy_healer_support_boost() {
        let base = role_config(CombatRole::Healer, None);
        let fantasy = role_config(CombatRole::Healer, Some(Theme::Fantasy));
        assert!(fantasy.support_priority > base.support_priority);
        assert!(fantasy.support_priority <= 1.0);
    }

    #[test]
    fn test_role_shapes() {
        let tank = role_config(CombatRole::Tank, None);
        let ranged = role_config(CombatRole::Ranged, None);
        let healer = role_config(CombatRole::Healer, None);
        let ambusher = role_config(CombatRole::Ambusher, None);
        let scout = role_config(CombatRole::Scout, None);

        assert!(ranged.preferred_range > tank.preferred_range);
        assert!(tank.retreat_health_fraction < ranged.retreat_health_fraction);
        assert!(healer.support_priority > ambusher.support_priority);
        assert!(ambusher.aggression > tank.aggression);
        for other in [tank, ranged, healer, ambusher] {
            assert!(scout.speed_multiplier > other.speed_multiplier);
            assert!(!other.raises_squad_alert);
        }
        assert!(scout.raises_squad_alert);
    }

    #[test]
    fn test_ranges_are_ordered_for_all_roles_and_themes() {
        for role in CombatRole::ALL {
            for theme in Theme::ALL.iter().copied().map(Some).chain([None]) {
                let c = role_config(role, theme);
                assert!(c.min_range <= c.preferred_range, "{role:?} {theme:?}");
                assert!(c.preferred_range <= c.max_range, "{role:?} {theme:?}");
            }
        }
    }
}
