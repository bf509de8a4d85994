//! World inputs the AI reads each tick.
//!
//! [`OpponentFeed`] and [`LastNoise`] are ECS resources written by the host.
//! [`TickContext`] is the per-agent bundle handed to a behavior tree tick; it
//! is rebuilt every tick and never retained by the tree.

use crate::components::{TargetId, Vec2};
use crate::grid::TileGrid;
use crate::pathfinding::DEFAULT_EXPANSION_BUDGET;
use crate::rng::SimRng;
use crate::squad::SquadOrders;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

// ============================================================================
// HOST-FED RESOURCES
// ============================================================================

/// A known opponent and where it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    pub id: TargetId,
    pub position: Vec2,
}

/// Opponent positions supplied by the host's entity store.
#[derive(Resource, Debug, Clone, Default)]
pub struct OpponentFeed {
    positions: BTreeMap<TargetId, Vec2>,
    primary: Option<TargetId>,
}

impl OpponentFeed {
    /// Insert or move an opponent. The first one inserted becomes primary.
    pub fn set(&mut self, id: TargetId, position: Vec2) {
        self.positions.insert(id, position);
        if self.primary.is_none() {
            self.primary = Some(id);
        }
    }

    pub fn set_primary(&mut self, id: TargetId) {
        self.primary = Some(id);
    }

    pub fn remove(&mut self, id: TargetId) {
        self.positions.remove(&id);
        if self.primary == Some(id) {
            self.primary = self.positions.keys().next().copied();
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.primary = None;
    }

    pub fn position_of(&self, id: TargetId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    /// The opponent agents engage this tick.
    pub fn primary(&self) -> Option<Opponent> {
        let id = self.primary?;
        self.position_of(id).map(|position| Opponent { id, position })
    }
}

/// A sound agents may investigate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseEvent {
    pub position: Vec2,
    /// Tick the noise was emitted on.
    pub tick: u64,
}

/// Most recent noise, if any.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct LastNoise(pub Option<NoiseEvent>);

// ============================================================================
// TICK CONTEXT
// ============================================================================

/// Everything a tree tick may read, plus the agent's own RNG stream.
#[derive(Debug, Clone)]
pub struct TickContext {
    pub grid: Option<Arc<TileGrid>>,
    pub opponent: Option<Opponent>,
    pub noise: Option<NoiseEvent>,
    pub tick: u64,
    pub dt: f32,
    pub rng: SimRng,
    /// This agent's squad orders, when it belongs to a coordinated squad.
    pub squad: Option<SquadOrders>,
    pub path_budget: usize,
    pub noise_memory_ticks: u64,
}

impl TickContext {
    /// Context with no grid, opponent, noise or squad.
    pub fn new(tick: u64, rng: SimRng) -> Self {
        Self {
            grid: None,
            opponent: None,
            noise: None,
            tick,
            dt: 1.0 / 30.0,
            rng,
            squad: None,
            path_budget: DEFAULT_EXPANSION_BUDGET,
            noise_memory_ticks: 180,
        }
    }

    pub fn grid(&self) -> Option<&TileGrid> {
        self.grid.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_opponent_becomes_primary() {
        let mut feed = OpponentFeed::default();
        assert!(feed.primary().is_none());
        feed.set(TargetId(4), Vec2::new(1.0, 1.0));
        feed.set(TargetId(2), Vec2::new(2.0, 2.0));
        assert_eq!(feed.primary().map(|o| o.id), Some(TargetId(4)));

        feed.remove(TargetId(4));
        assert_eq!(feed.primary().map(|o| o.id), Some(TargetId(2)));
        feed.clear();
        assert!(feed.primary().is_none());
    }
}
