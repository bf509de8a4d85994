//! ECS Components for the NPC combat AI.
//!
//! Components are pure data containers attached to entities.
//! All decision logic lives in behavior trees and systems that read these components.

use crate::archetype::{Archetype, Theme};
use crate::role::{CombatRole, RoleConfig};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// MATH
// ============================================================================

/// 2D vector in grid units (x = east/west, y = north/south).
///
/// One grid cell spans one unit; the cell containing a point is `floor(x), floor(y)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const X: Vec2 = Vec2 { x: 1.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(&self, other: Vec2) -> f32 {
        (other - *self).length()
    }

    /// Unit vector in the same direction, or zero for a (near) zero vector.
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len < 0.0001 {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    /// Counter-clockwise perpendicular (rotated +90 degrees).
    pub fn perpendicular(&self) -> Self {
        Self::new(-self.y, self.x)
    }

    pub fn scale(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Unique identifier for an AI agent.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Identifier of something agents can target (the player, a hostile NPC, ...).
///
/// Targets are resolved to positions by the host through [`crate::ai::OpponentFeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Identifier for a squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SquadId(pub u32);

/// Squad membership of an agent.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadMember(pub SquadId);

// ============================================================================
// BEHAVIOR STATE
// ============================================================================

/// Discrete behavior label of an agent, written by tree actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Nothing to do.
    #[default]
    Idle,
    /// Walking a patrol route or holding a formation slot.
    Patrol,
    /// Investigating a noise or a squad contact.
    Alert,
    /// Pathing toward the opponent.
    Chase,
    /// Circling the opponent at medium range.
    Strafe,
    /// Moving out of the opponent's line of sight.
    Cover,
    /// Running away at low health.
    Retreat,
    /// Firing at the opponent.
    Attack,
}

impl BehaviorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorState::Idle => "Idle",
            BehaviorState::Patrol => "Patrol",
            BehaviorState::Alert => "Alert",
            BehaviorState::Chase => "Chase",
            BehaviorState::Strafe => "Strafe",
            BehaviorState::Cover => "Cover",
            BehaviorState::Retreat => "Retreat",
            BehaviorState::Attack => "Attack",
        }
    }
}

/// Ordered patrol waypoints with the index of the current one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    pub waypoints: Vec<Vec2>,
    pub index: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self { waypoints, index: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Current waypoint, or `None` when the route is empty or the index is stale.
    pub fn current(&self) -> Option<Vec2> {
        self.waypoints.get(self.index).copied()
    }

    /// Advance to the next waypoint, wrapping around.
    pub fn advance(&mut self) {
        if self.waypoints.is_empty() {
            self.index = 0;
        } else {
            self.index = (self.index + 1) % self.waypoints.len();
        }
    }
}

// ============================================================================
// AGENT
// ============================================================================

/// Preferred range of agents without a combat role, as a fraction of attack range.
const DEFAULT_PREFERRED_RANGE_FRACTION: f32 = 0.8;
/// Engage distance never exceeds this fraction of attack range.
const ENGAGE_RANGE_FRACTION: f32 = 0.9;

/// Mutable per-agent state. Mutated only by that agent's own behavior tree tick.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec2,
    /// Unit vector the agent is looking along.
    pub facing: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Movement per tick, in grid units.
    pub speed: f32,
    pub attack_range: f32,
    /// Never strafe closer than this to the opponent.
    pub min_range: f32,
    /// Distance a strafing agent closes to before it can attack.
    pub preferred_range: f32,
    pub damage: f32,
    pub hearing_radius: f32,
    /// Sight radius for spotting the opponent.
    pub alert_radius: f32,
    /// Retreat once health drops below `max_health * retreat_fraction`.
    pub retreat_fraction: f32,
    pub state: BehaviorState,
    pub patrol: PatrolRoute,
    /// Ticks until the next attack is allowed.
    pub cooldown: u32,
    pub cooldown_ticks: u32,
    /// +1.0 or -1.0; which way the agent circles while strafing.
    pub strafe_sign: f32,
    pub archetype: Theme,
    pub role: Option<CombatRole>,
    pub uses_cover: bool,
    /// Opponent currently engaged, read by the squad coordinator.
    pub target: Option<TargetId>,
    /// Set when an attack fired during the last tick.
    pub attacked_this_tick: bool,
}

impl Agent {
    /// Initialize an agent from an archetype template, optionally biased by a role.
    pub fn from_archetype(archetype: &Archetype, role: Option<(CombatRole, RoleConfig)>, position: Vec2) -> Self {
        let mut agent = Self {
            position,
            facing: Vec2::X,
            health: archetype.max_health,
            max_health: archetype.max_health,
            speed: archetype.speed,
            attack_range: archetype.attack_range,
            min_range: 0.0,
            preferred_range: archetype.attack_range * DEFAULT_PREFERRED_RANGE_FRACTION,
            damage: archetype.damage,
            hearing_radius: archetype.hearing_radius,
            alert_radius: archetype.alert_radius,
            retreat_fraction: archetype.retreat_fraction,
            state: BehaviorState::Idle,
            patrol: PatrolRoute::default(),
            cooldown: 0,
            cooldown_ticks: archetype.attack_cooldown_ticks,
            strafe_sign: 1.0,
            archetype: archetype.theme,
            role: None,
            uses_cover: false,
            target: None,
            attacked_this_tick: false,
        };

        if let Some((role, config)) = role {
            agent.role = Some(role);
            agent.attack_range = config.max_range;
            agent.min_range = config.min_range;
            agent.preferred_range = config.preferred_range;
            agent.speed *= config.speed_multiplier;
            agent.retreat_fraction = config.retreat_health_fraction;
            agent.uses_cover = config.uses_cover;
        }

        agent
    }

    /// Distance strafing closes toward: the preferred range, kept strictly
    /// inside attack range and no closer than `min_range`.
    pub fn engage_distance(&self) -> f32 {
        let ceiling = self.attack_range * ENGAGE_RANGE_FRACTION;
        self.preferred_range.min(ceiling).max(self.min_range.min(ceiling))
    }

    pub fn with_patrol(mut self, waypoints: Vec<Vec2>) -> Self {
        self.patrol = PatrolRoute::new(waypoints);
        self
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    /// Point the agent toward a position; leaves facing unchanged when coincident.
    pub fn face(&mut self, toward: Vec2) {
        let dir = (toward - self.position).normalized();
        if dir != Vec2::ZERO {
            self.facing = dir;
        }
    }

    pub(crate) fn set_state(&mut self, state: BehaviorState) {
        if self.state != state {
            tracing::debug!(
                from = self.state.as_str(),
                to = state.as_str(),
                "agent behavior state changed"
            );
            self.state = state;
        }
    }
}

// ============================================================================
// BUNDLE HELPERS
// ============================================================================

/// Bundle for spawning an agent entity. The tree is added separately as a [`crate::ai::Brain`].
#[derive(Bundle)]
pub struct AgentBundle {
    pub id: AgentId,
    pub agent: Agent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_perpendicular_is_orthogonal() {
        let v = Vec2::new(3.0, 4.0);
        let p = v.perpendicular();
        assert!((v.x * p.x + v.y * p.y).abs() < 1e-6);
        assert!((p.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_zero_stays_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn test_health_is_clamped() {
        let archetype = Archetype::for_theme(Theme::Fantasy);
        let mut agent = Agent::from_archetype(&archetype, None, Vec2::ZERO);
        agent.damage(agent.max_health * 10.0);
        assert_eq!(agent.health, 0.0);
        assert!(!agent.is_alive());
        agent.heal(agent.max_health * 10.0);
        assert_eq!(agent.health, agent.max_health);
    }

    #[test]
    fn test_engage_distance_stays_inside_attack_range() {
        let goblin = Agent::from_archetype(&Archetype::for_theme(Theme::Fantasy), None, Vec2::ZERO);
        assert!((goblin.engage_distance() - 1.2).abs() < 1e-6);

        let ranged = crate::role::role_config(CombatRole::Ranged, None);
        let archer = Agent::from_archetype(&Archetype::for_theme(Theme::Fantasy), Some((CombatRole::Ranged, ranged)), Vec2::ZERO);
        assert_eq!(archer.engage_distance(), ranged.preferred_range);

        let mut odd = goblin.clone();
        odd.preferred_range = 10.0;
        odd.min_range = 5.0;
        assert!(odd.engage_distance() < odd.attack_range);
    }

    #[test]
    fn test_patrol_route_wraps() {
        let mut route = PatrolRoute::new(vec![Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)]);
        route.advance();
        assert_eq!(route.index, 1);
        route.advance();
        assert_eq!(route.index, 0);

        let mut empty = PatrolRoute::default();
        empty.advance();
        assert_eq!(empty.current(), None);
    }

    #[test]
    fn test_role_biases_agent_stats() {
        let archetype = Archetype::for_theme(Theme::Fantasy);
        let config = crate::role::role_config(CombatRole::Scout, Some(Theme::Fantasy));
        let agent = Agent::from_archetype(&archetype, Some((CombatRole::Scout, config)), Vec2::ZERO);
        assert_eq!(agent.attack_range, config.max_range);
        assert!(agent.speed > archetype.speed);
        assert_eq!(agent.retreat_fraction, config.retreat_health_fraction);
    }
}
