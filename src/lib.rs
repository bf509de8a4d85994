//! This Bitter Ground - NPC Combat AI Core
//!
//! Deterministic, fixed-timestep combat AI for grid-based levels: a resumable
//! behavior tree per agent, budgeted A* over the tile grid, themed archetypes
//! with combat roles, and a squad coordinator for formations, alert and focus fire.
//! Uses `bevy_ecs` for the entity-component-system architecture.

pub mod ai;
pub mod api;
pub mod archetype;
pub mod behavior;
pub mod components;
pub mod config;
pub mod grid;
pub mod pathfinding;
pub mod rng;
pub mod role;
pub mod squad;
pub mod systems;
pub mod world;

pub use ai::{combat_tree, Brain, OpponentFeed, TickContext};
pub use api::{AgentSpawn, SimWorld};
pub use archetype::{Archetype, Theme};
pub use behavior::{Behavior, Status};
pub use components::*;
pub use config::{ConfigError, SimConfig};
pub use grid::{line_of_sight, GridError, GridPos, Tile, TileGrid};
pub use crate::pathfinding::{find_path, find_path_world, DEFAULT_EXPANSION_BUDGET};
pub use role::{role_config, role_config_for_id, CombatRole, RoleConfig};
pub use squad::{FormationType, Squad, SquadRegistry};
pub use systems::*;
pub use world::Snapshot;
