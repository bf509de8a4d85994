//! Snapshot types.
//!
//! The `Snapshot` struct provides a serializable view of agent and squad state
//! that the host reads after each step (weapon firing, audio cues, UI).

use crate::ai::Brain;
use crate::components::*;
use crate::squad::SquadRegistry;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub facing_x: f32,
    pub facing_y: f32,
    pub health: f32,
    pub health_max: f32,
    pub state: String,
    pub archetype: String,
    pub squad: Option<u32>,
    pub target: Option<u32>,
    pub cooldown: u32,
}

/// A formation slot assigned to a follower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub agent: u32,
    pub x: f32,
    pub y: f32,
}

/// Snapshot of a squad's coordinator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadSnapshot {
    pub id: u32,
    pub members: Vec<u32>,
    pub leader: Option<u32>,
    pub formation: String,
    pub alert: f32,
    pub focus: Option<u32>,
    pub flankers: Vec<u32>,
    pub slots: Vec<SlotSnapshot>,
}

/// One discrete attack fired by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackSnapshot {
    pub tick: u64,
    pub agent: u32,
    pub target: u32,
    pub damage: f32,
}

/// Complete AI state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub time: f32,
    /// All live agents, ordered by id.
    pub agents: Vec<AgentSnapshot>,
    /// All known squads, ordered by id.
    pub squads: Vec<SquadSnapshot>,
    /// Attacks fired since the previous snapshot.
    pub attacks: Vec<AttackSnapshot>,
}

impl Snapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &mut World, tick: u64, time: f32) -> Self {
        let mut query = world.query_filtered::<(&AgentId, &Agent, Option<&SquadMember>), With<Brain>>();
        let mut agents: Vec<AgentSnapshot> = query
            .iter(world)
            .map(|(id, agent, member)| AgentSnapshot {
                id: id.0,
                x: agent.position.x,
                y: agent.position.y,
                facing_x: agent.facing.x,
                facing_y: agent.facing.y,
                health: agent.health,
                health_max: agent.max_health,
                state: agent.state.as_str().to_string(),
                archetype: agent.archetype.as_str().to_string(),
                squad: member.map(|m| m.0 .0),
                target: agent.target.map(|t| t.0),
                cooldown: agent.cooldown,
            })
            .collect();
        agents.sort_by_key(|a| a.id);

        let squads = world
            .get_resource::<SquadRegistry>()
            .map(|registry| {
                registry
                    .iter()
                    .map(|squad| SquadSnapshot {
                        id: squad.id.0,
                        members: squad.members.iter().map(|m| m.0).collect(),
                        leader: squad.leader().map(|l| l.0),
                        formation: format!("{:?}", squad.formation),
                        alert: squad.alert,
                        focus: squad.focus.map(|f| f.0),
                        flankers: squad.flanking.iter().map(|f| f.0).collect(),
                        slots: squad
                            .slots
                            .iter()
                            .map(|(agent, pos)| SlotSnapshot { agent: agent.0, x: pos.x, y: pos.y })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            tick,
            time,
            agents,
            squads,
            attacks: Vec::new(),
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
