//! Pure predicates the combat tree branches on.

use super::context::TickContext;
use crate::components::Agent;
use crate::grid::line_of_sight;

/// Strafe when the opponent is within this multiple of attack range.
pub const STRAFE_BAND: f32 = 1.5;
/// Cover-using roles look for cover below this health fraction.
pub const COVER_HEALTH_FRACTION: f32 = 0.6;
/// Squad alert level at which members move to the squad's focus.
pub const SQUAD_ALERT_RESPONSE: f32 = 0.5;

fn opponent_distance(agent: &Agent, ctx: &TickContext) -> Option<f32> {
    ctx.opponent.map(|o| agent.position.distance_to(o.position))
}

pub fn is_low_health(agent: &Agent, _ctx: &TickContext) -> bool {
    agent.health < agent.max_health * agent.retreat_fraction
}

/// Opponent within sight radius with a clear line of sight.
///
/// Sight needs a grid: with no grid, or an empty one, agents never see the
/// opponent, even when standing on the same point. Hosts running without a
/// level should still set an open [`TileGrid`](crate::grid::TileGrid).
pub fn can_see_opponent(agent: &Agent, ctx: &TickContext) -> bool {
    match ctx.opponent {
        Some(o) => {
            agent.position.distance_to(o.position) <= agent.alert_radius
                && line_of_sight(ctx.grid(), agent.position, o.position)
        }
        None => false,
    }
}

pub fn in_attack_range(agent: &Agent, ctx: &TickContext) -> bool {
    opponent_distance(agent, ctx).is_some_and(|d| d <= agent.attack_range)
}

pub fn within_strafe_band(agent: &Agent, ctx: &TickContext) -> bool {
    opponent_distance(agent, ctx).is_some_and(|d| d <= agent.attack_range * STRAFE_BAND)
}

pub fn should_take_cover(agent: &Agent, ctx: &TickContext) -> bool {
    agent.uses_cover && agent.health_fraction() < COVER_HEALTH_FRACTION && can_see_opponent(agent, ctx)
}

/// A noise recent enough and close enough to hear.
pub fn heard_noise(agent: &Agent, ctx: &TickContext) -> bool {
    match ctx.noise {
        Some(noise) => {
            ctx.tick.saturating_sub(noise.tick) <= ctx.noise_memory_ticks
                && agent.position.distance_to(noise.position) <= agent.hearing_radius
        }
        None => false,
    }
}

pub fn squad_alerted(_agent: &Agent, ctx: &TickContext) -> bool {
    ctx.squad
        .is_some_and(|s| s.alert >= SQUAD_ALERT_RESPONSE && s.focus_position.is_some())
}
