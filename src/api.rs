//! Public API for the AI simulation.
//!
//! This module provides the main interface for a host game (or any other
//! client) to drive the NPC combat AI.
//!
//! ## Fixed Timestep
//!
//! The simulation uses a fixed timestep internally (default 30 Hz). When `step(dt)` is called,
//! the simulation accumulates time and runs fixed updates as needed. This ensures deterministic
//! behavior regardless of frame rate.
//!
//! ## Host Responsibilities
//!
//! The host feeds the passability grid, opponent positions and noise events,
//! applies the attacks reported in each [`Snapshot`], and reports damage back
//! with [`SimWorld::damage_agent`]. Agents at zero health are despawned after
//! the tick in which they died.

use crate::ai::{Brain, LastNoise, NoiseEvent, OpponentFeed};
use crate::archetype::{Archetype, Theme};
use crate::components::*;
use crate::config::SimConfig;
use crate::grid::{GridResource, TileGrid};
use crate::role::{role_config, CombatRole};
use crate::squad::{FormationType, Squad, SquadRegistry};
use crate::systems::*;
use crate::world::{AttackSnapshot, Snapshot};
use bevy_ecs::prelude::*;
use std::collections::BTreeMap;

/// Everything needed to spawn one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpawn {
    pub id: AgentId,
    pub position: Vec2,
    pub role: Option<CombatRole>,
    pub squad: Option<SquadId>,
    pub patrol: Vec<Vec2>,
    /// Overrides the world's active theme for this agent's archetype.
    pub theme: Option<Theme>,
}

impl AgentSpawn {
    pub fn new(id: u32, position: Vec2) -> Self {
        Self {
            id: AgentId(id),
            position,
            role: None,
            squad: None,
            patrol: Vec::new(),
            theme: None,
        }
    }

    pub fn with_role(mut self, role: CombatRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn in_squad(mut self, squad: u32) -> Self {
        self.squad = Some(SquadId(squad));
        self
    }

    pub fn with_patrol(mut self, waypoints: Vec<Vec2>) -> Self {
        self.patrol = waypoints;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }
}

/// The main simulation world container.
///
/// Holds the ECS world and schedule, providing a clean API for:
/// - Feeding world inputs (grid, opponents, noise)
/// - Spawning and damaging agents
/// - Stepping the simulation forward
/// - Extracting state snapshots
pub struct SimWorld {
    world: World,
    schedule: Schedule,
    tick: u64,
    time: f32,
    /// Accumulated time for fixed timestep.
    time_accumulator: f32,
    /// Theme resolved once from the config.
    theme: Theme,
    /// Live agents by id.
    agents: BTreeMap<AgentId, Entity>,
    /// Attacks fired since the last snapshot.
    pending_attacks: Vec<AttackSnapshot>,
}

impl SimWorld {
    /// Create a new empty simulation world.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create a new simulation world with custom configuration.
    ///
    /// Invalid fields are replaced by their defaults with a warning.
    pub fn with_config(config: SimConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!(%err, "invalid config, using defaults for rejected fields");
                config.sanitized()
            }
        };
        let theme = config.active_theme();
        let mut world = World::new();

        world.insert_resource(DeltaTime(config.fixed_timestep));
        world.insert_resource(SimTick(0));
        world.insert_resource(GridResource::default());
        world.insert_resource(OpponentFeed::default());
        world.insert_resource(LastNoise::default());
        world.insert_resource(SquadRegistry::default());
        world.insert_resource(config);

        // Agents tick first, then the coordinator publishes squad state for the next tick.
        let mut schedule = Schedule::default();
        schedule.add_systems((behavior_tick_system, squad_coordination_system).chain());

        Self {
            world,
            schedule,
            tick: 0,
            time: 0.0,
            time_accumulator: 0.0,
            theme,
            agents: BTreeMap::new(),
            pending_attacks: Vec::new(),
        }
    }

    // ========================================================================
    // WORLD INPUTS
    // ========================================================================

    /// Replace the passability grid.
    pub fn set_grid(&mut self, grid: TileGrid) {
        self.world.insert_resource(GridResource::new(grid));
    }

    /// Add or move an opponent. The first opponent added is the primary one.
    pub fn set_opponent(&mut self, id: u32, position: Vec2) {
        self.world.resource_mut::<OpponentFeed>().set(TargetId(id), position);
    }

    pub fn clear_opponent(&mut self, id: u32) {
        self.world.resource_mut::<OpponentFeed>().remove(TargetId(id));
    }

    /// Record a noise at `position` on the current tick.
    pub fn emit_noise(&mut self, position: Vec2) {
        let tick = self.world.resource::<SimTick>().0;
        self.world.resource_mut::<LastNoise>().0 = Some(NoiseEvent { position, tick });
    }

    pub fn set_squad_formation(&mut self, squad: u32, formation: FormationType) {
        self.world.resource_mut::<SquadRegistry>().set_formation(SquadId(squad), formation);
    }

    // ========================================================================
    // AGENTS
    // ========================================================================

    /// Spawn an agent from its archetype. Re-using a live id replaces that agent.
    pub fn spawn_agent(&mut self, spawn: AgentSpawn) -> Entity {
        if let Some(old) = self.agents.remove(&spawn.id) {
            self.world.despawn(old);
        }

        let theme = spawn.theme.unwrap_or(self.theme);
        let archetype = Archetype::for_theme(theme);
        let role = spawn.role.map(|r| (r, role_config(r, Some(theme))));
        let agent = Agent::from_archetype(&archetype, role, spawn.position).with_patrol(spawn.patrol);

        let mut entity = self.world.spawn((AgentBundle { id: spawn.id, agent }, Brain::combat()));
        if let Some(squad) = spawn.squad {
            entity.insert(SquadMember(squad));
        }
        let entity = entity.id();
        self.agents.insert(spawn.id, entity);

        tracing::info!(
            agent = spawn.id.0,
            archetype = archetype.name,
            role = ?spawn.role,
            squad = ?spawn.squad.map(|s| s.0),
            "agent spawned"
        );
        entity
    }

    /// Apply damage from the host's combat resolution. Returns `false` for unknown ids.
    pub fn damage_agent(&mut self, id: u32, amount: f32) -> bool {
        let Some(&entity) = self.agents.get(&AgentId(id)) else {
            return false;
        };
        match self.world.get_mut::<Agent>(entity) {
            Some(mut agent) => {
                agent.damage(amount);
                true
            }
            None => false,
        }
    }

    pub fn agent(&self, id: u32) -> Option<&Agent> {
        let entity = *self.agents.get(&AgentId(id))?;
        self.world.get::<Agent>(entity)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn squad(&self, id: u32) -> Option<&Squad> {
        self.world.get_resource::<SquadRegistry>()?.get(SquadId(id))
    }

    // ========================================================================
    // STEPPING
    // ========================================================================

    /// Step the simulation forward by `dt` seconds.
    ///
    /// Uses fixed timestep internally - accumulates time and runs fixed updates
    /// as needed. This ensures deterministic behavior regardless of frame rate.
    pub fn step(&mut self, dt: f32) {
        let fixed_dt = self.world.resource::<SimConfig>().fixed_timestep;
        if !(fixed_dt.is_finite() && fixed_dt > 0.0) {
            tracing::warn!(fixed_dt, "non-positive fixed timestep, step skipped");
            return;
        }
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        self.time_accumulator += dt;
        while self.time_accumulator >= fixed_dt {
            self.fixed_update(fixed_dt);
            self.time_accumulator -= fixed_dt;
        }
    }

    /// Run a single fixed timestep update.
    fn fixed_update(&mut self, dt: f32) {
        self.world.resource_mut::<DeltaTime>().0 = dt;
        self.world.resource_mut::<SimTick>().increment();

        self.schedule.run(&mut self.world);

        self.tick += 1;
        self.time += dt;

        self.collect_attacks();
        self.despawn_dead();
    }

    fn collect_attacks(&mut self) {
        let mut query = self.world.query::<(&AgentId, &Agent)>();
        let mut fired: Vec<AttackSnapshot> = query
            .iter(&self.world)
            .filter(|(_, a)| a.attacked_this_tick)
            .filter_map(|(id, a)| {
                a.target.map(|t| AttackSnapshot {
                    tick: self.tick,
                    agent: id.0,
                    target: t.0,
                    damage: a.damage,
                })
            })
            .collect();
        fired.sort_by_key(|a| a.agent);
        self.pending_attacks.extend(fired);
    }

    fn despawn_dead(&mut self) {
        let dead: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|(_, &e)| self.world.get::<Agent>(e).is_some_and(|a| !a.is_alive()))
            .map(|(id, _)| *id)
            .collect();

        for id in dead {
            if let Some(entity) = self.agents.remove(&id) {
                self.world.despawn(entity);
                tracing::info!(agent = id.0, tick = self.tick, "agent despawned");
            }
        }
    }

    // ========================================================================
    // OUTPUT
    // ========================================================================

    /// Get a snapshot of the current simulation state.
    ///
    /// Attacks are reported once: they are drained into the snapshot.
    pub fn snapshot(&mut self) -> Snapshot {
        let mut snapshot = Snapshot::from_world(&mut self.world, self.tick, self.time);
        snapshot.attacks = std::mem::take(&mut self.pending_attacks);
        snapshot
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Get the elapsed simulation time.
    pub fn current_time(&self) -> f32 {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}
