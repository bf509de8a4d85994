//! Archetypes - immutable stat templates keyed by the active setting/theme.
//!
//! An archetype is selected once when an agent is created. The theme is passed
//! in explicitly (usually from [`crate::config::SimConfig`]); there is no
//! process-wide "current theme".

use serde::{Deserialize, Serialize};

/// Setting/theme identifier. Selects archetype stats and role modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Swords, bows and sorcery.
    #[default]
    Fantasy,
    /// Space marines and energy weapons.
    SciFi,
    /// Slow, tough, frightening things.
    Horror,
    /// Augmented street gangs.
    Cyberpunk,
    /// Raiders in the wasteland.
    PostApocalyptic,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Fantasy,
        Theme::SciFi,
        Theme::Horror,
        Theme::Cyberpunk,
        Theme::PostApocalyptic,
    ];

    /// Parse a theme id. Accepts a few common spellings; `None` when unknown.
    pub fn from_id(id: &str) -> Option<Theme> {
        match id.trim().to_ascii_lowercase().as_str() {
            "fantasy" => Some(Theme::Fantasy),
            "scifi" | "sci_fi" | "sci-fi" => Some(Theme::SciFi),
            "horror" => Some(Theme::Horror),
            "cyberpunk" => Some(Theme::Cyberpunk),
            "postapocalyptic" | "post_apocalyptic" | "post-apocalyptic" => Some(Theme::PostApocalyptic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Fantasy => "fantasy",
            Theme::SciFi => "sci_fi",
            Theme::Horror => "horror",
            Theme::Cyberpunk => "cyberpunk",
            Theme::PostApocalyptic => "post_apocalyptic",
        }
    }
}

/// Immutable stat template used to initialize an agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Archetype {
    pub theme: Theme,
    pub name: &'static str,
    pub max_health: f32,
    /// Grid units per tick.
    pub speed: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub alert_radius: f32,
    pub hearing_radius: f32,
    pub retreat_fraction: f32,
    pub attack_cooldown_ticks: u32,
}

impl Archetype {
    /// Built-in archetype for a theme.
    pub fn for_theme(theme: Theme) -> Archetype {
        match theme {
            Theme::Fantasy => Archetype {
                theme,
                name: "goblin",
                max_health: 30.0,
                speed: 0.12,
                damage: 5.0,
                attack_range: 1.5,
                alert_radius: 8.0,
                hearing_radius: 10.0,
                retreat_fraction: 0.25,
                attack_cooldown_ticks: 30,
            },
            Theme::SciFi => Archetype {
                theme,
                name: "trooper",
                max_health: 50.0,
                speed: 0.10,
                damage: 8.0,
                attack_range: 6.0,
                alert_radius: 12.0,
                hearing_radius: 12.0,
                retreat_fraction: 0.2,
                attack_cooldown_ticks: 20,
            },
            Theme::Horror => Archetype {
                theme,
                name: "ghoul",
                max_health: 80.0,
                speed: 0.07,
                damage: 12.0,
                attack_range: 1.2,
                alert_radius: 6.0,
                hearing_radius: 14.0,
                retreat_fraction: 0.05,
                attack_cooldown_ticks: 45,
            },
            Theme::Cyberpunk => Archetype {
                theme,
                name: "ganger",
                max_health: 40.0,
                speed: 0.14,
                damage: 7.0,
                attack_range: 5.0,
                alert_radius: 10.0,
                hearing_radius: 9.0,
                retreat_fraction: 0.3,
                attack_cooldown_ticks: 15,
            },
            Theme::PostApocalyptic => Archetype {
                theme,
                name: "raider",
                max_health: 45.0,
                speed: 0.11,
                damage: 9.0,
                attack_range: 4.0,
                alert_radius: 9.0,
                hearing_radius: 11.0,
                retreat_fraction: 0.25,
                attack_cooldown_ticks: 25,
            },
        }
    }

    /// Archetype for a theme id; unknown ids fall back to the default theme.
    pub fn for_theme_id(id: &str) -> Archetype {
        match Theme::from_id(id) {
            Some(theme) => Self::for_theme(theme),
            None => {
                tracing::warn!(theme = id, fallback = Theme::default().as_str(), "unknown theme id");
                Self::for_theme(Theme::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_themes_have_sane_archetypes() {
        for theme in Theme::ALL {
            let a = Archetype::for_theme(theme);
            assert_eq!(a.theme, theme);
            assert!(a.max_health > 0.0);
            assert!(a.speed > 0.0);
            assert!((0.0..1.0).contains(&a.retreat_fraction));
        }
    }

    #[test]
    fn test_theme_id_roundtrip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_id(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::from_id("Sci-Fi"), Some(Theme::SciFi));
        assert_eq!(Theme::from_id("vaporwave"), None);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        let a = Archetype::for_theme_id("vaporwave");
        assert_eq!(a, Archetype::for_theme(Theme::Fantasy));
    }
}
