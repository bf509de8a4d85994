//! Simulation configuration.
//!
//! `SimConfig` is inserted as an ECS resource and read by the systems. It can
//! be built in code (`SimConfig::default()` plus field updates) or loaded from
//! JSON with [`SimConfig::from_json`]; missing JSON fields take their defaults.

use crate::archetype::Theme;
use crate::pathfinding::DEFAULT_EXPANSION_BUDGET;
use crate::squad::FormationType;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration for the AI simulation.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (e.g., 1/30 = 0.0333 for 30 Hz).
    pub fixed_timestep: f32,
    /// Base seed; every random draw in the simulation derives from it.
    pub seed: u64,
    /// Active setting/theme id ("fantasy", "sci_fi", ...).
    pub theme: String,
    /// Run the squad coordinator every N ticks.
    pub squad_update_interval: u64,
    /// Max A* node expansions per path query.
    pub path_expansion_budget: usize,
    /// Distance between formation slots, in grid units.
    pub formation_spacing: f32,
    /// Formation given to squads when they are first observed.
    pub default_formation: FormationType,
    /// How long a noise stays worth investigating.
    pub noise_memory_ticks: u64,
    /// Alert gained per coordinator pass while a target is visible.
    pub alert_raise: f32,
    pub alert_decay_per_second: f32,
    /// Distance of flank points from the focus target.
    pub flank_distance: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 30.0, // 30 Hz
            seed: 0x7B6_A1,
            theme: Theme::default().as_str().to_string(),
            squad_update_interval: 10, // 3 Hz at 30 Hz ticks
            path_expansion_budget: DEFAULT_EXPANSION_BUDGET,
            formation_spacing: 2.0,
            default_formation: FormationType::Wedge,
            noise_memory_ticks: 180, // 6 seconds
            alert_raise: 0.3,
            alert_decay_per_second: 0.1,
            flank_distance: 4.0,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid {
                field: "fixed_timestep",
                reason: format!("must be positive, got {}", self.fixed_timestep),
            });
        }
        if self.squad_update_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "squad_update_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.path_expansion_budget == 0 {
            return Err(ConfigError::Invalid {
                field: "path_expansion_budget",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.formation_spacing.is_finite() && self.formation_spacing > 0.0) {
            return Err(ConfigError::Invalid {
                field: "formation_spacing",
                reason: format!("must be positive, got {}", self.formation_spacing),
            });
        }
        Ok(())
    }

    /// Copy with every field `validate` would reject replaced by its default.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            fixed_timestep: if self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0 {
                self.fixed_timestep
            } else {
                defaults.fixed_timestep
            },
            squad_update_interval: if self.squad_update_interval == 0 {
                defaults.squad_update_interval
            } else {
                self.squad_update_interval
            },
            path_expansion_budget: if self.path_expansion_budget == 0 {
                defaults.path_expansion_budget
            } else {
                self.path_expansion_budget
            },
            formation_spacing: if self.formation_spacing.is_finite() && self.formation_spacing > 0.0 {
                self.formation_spacing
            } else {
                defaults.formation_spacing
            },
            ..self
        }
    }

    /// Resolved theme; unknown ids fall back to the default theme.
    pub fn active_theme(&self) -> Theme {
        Theme::from_id(&self.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, fallback = Theme::default().as_str(), "unknown theme id");
            Theme::default()
        })
    }
}
