//! The canonical combat tree and the `Brain` component that owns it.
//!
//! Priority order, first match wins, re-checked every tick:
//!
//! 1. low health → Retreat
//! 2. cover-using role, hurt, opponent visible → TakeCover
//! 3. opponent visible and in attack range → Attack
//! 4. opponent visible within the strafe band → Strafe
//! 5. opponent visible → Chase (or head for the squad flank point)
//! 6. recent noise within hearing radius → Investigate
//! 7. squad alerted with a known focus → converge on it
//! 8. otherwise → Patrol / hold formation slot / Idle

use super::actions::{attack, chase, investigate_noise, patrol, respond_to_squad_alert, retreat, strafe, take_cover};
use super::conditions::{
    can_see_opponent, heard_noise, in_attack_range, is_low_health, should_take_cover, squad_alerted,
    within_strafe_band,
};
use super::context::TickContext;
use crate::behavior::{action, condition, reactive_selector, reactive_sequence, Behavior, Status};
use crate::components::Agent;
use bevy_ecs::prelude::*;

pub type AiNode = Box<dyn Behavior<Agent, TickContext>>;

pub fn combat_tree() -> AiNode {
    reactive_selector(vec![
        reactive_sequence(vec![condition(is_low_health), action(retreat)]),
        reactive_sequence(vec![condition(should_take_cover), action(take_cover)]),
        reactive_sequence(vec![condition(can_see_opponent), condition(in_attack_range), action(attack)]),
        reactive_sequence(vec![condition(can_see_opponent), condition(within_strafe_band), action(strafe)]),
        reactive_sequence(vec![condition(can_see_opponent), action(chase)]),
        reactive_sequence(vec![condition(heard_noise), action(investigate_noise)]),
        reactive_sequence(vec![condition(squad_alerted), action(respond_to_squad_alert)]),
        action(patrol),
    ])
}

/// Owns one agent's behavior tree, including all of its resume state.
#[derive(Component)]
pub struct Brain {
    tree: AiNode,
    pub last_status: Option<Status>,
}

impl Brain {
    pub fn new(tree: AiNode) -> Self {
        Self { tree, last_status: None }
    }

    /// Brain running [`combat_tree`].
    pub fn combat() -> Self {
        Self::new(combat_tree())
    }

    /// Refresh perception, then tick the tree once.
    pub fn tick(&mut self, agent: &mut Agent, ctx: &mut TickContext) -> Status {
        agent.attacked_this_tick = false;
        agent.target = match ctx.opponent {
            Some(o) if can_see_opponent(agent, ctx) => Some(o.id),
            _ => None,
        };

        let status = self.tree.tick(agent, ctx);
        self.last_status = Some(status);
        status
    }

    pub fn reset(&mut self) {
        self.tree.reset();
        self.last_status = None;
    }
}

impl Default for Brain {
    fn default() -> Self {
        Self::combat()
    }
}
