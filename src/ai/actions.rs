//! Actions - the only nodes that mutate an agent.
//!
//! Movement never enters an unwalkable cell: a step whose destination is
//! blocked is skipped for that tick. Without a grid the world is open.

use super::context::TickContext;
use crate::behavior::Status;
use crate::components::{Agent, BehaviorState, Vec2};
use crate::grid::{line_of_sight, GridPos, TileGrid};
use crate::pathfinding::find_path_world;

/// Distance at which a movement goal counts as reached.
pub const ARRIVAL_RADIUS: f32 = 0.5;
/// Per-tick probability that a strafing agent reverses direction.
pub const STRAFE_FLIP_CHANCE: f32 = 1.0 / 120.0;
pub const RETREAT_SPEED_MULTIPLIER: f32 = 1.5;
pub const PATROL_SPEED_MULTIPLIER: f32 = 0.5;
/// Cells searched around the agent when looking for cover.
pub const COVER_SEARCH_RADIUS: i32 = 5;

// ============================================================================
// MOVEMENT HELPERS
// ============================================================================

/// Move by `delta` unless the destination cell is blocked.
fn try_step(agent: &mut Agent, ctx: &TickContext, delta: Vec2) -> bool {
    let dest = agent.position + delta;
    if !dest.is_finite() {
        return false;
    }
    if let Some(grid) = ctx.grid().filter(|g| !g.is_empty()) {
        if !grid.is_walkable_at(dest) {
            return false;
        }
    }
    agent.position = dest;
    true
}

/// Straight step toward `goal`, never overshooting it.
fn step_toward(agent: &mut Agent, ctx: &TickContext, goal: Vec2, speed: f32) -> bool {
    let delta = goal - agent.position;
    let dist = delta.length();
    if dist < 0.0001 {
        return false;
    }
    agent.face(goal);
    try_step(agent, ctx, delta.normalized().scale(speed.min(dist)))
}

/// Step along a path toward `goal`. The first waypoint is the agent's own cell,
/// so the agent heads for the second one.
fn path_step(agent: &mut Agent, ctx: &TickContext, goal: Vec2, speed: f32) -> bool {
    let path = find_path_world(agent.position, goal, ctx.grid(), ctx.path_budget);
    let waypoint = path.get(1).copied().unwrap_or(goal);
    step_toward(agent, ctx, waypoint, speed)
}

/// Walk to `point`; `Success` once within [`ARRIVAL_RADIUS`].
fn investigate(agent: &mut Agent, ctx: &TickContext, point: Vec2) -> Status {
    agent.set_state(BehaviorState::Alert);
    if agent.position.distance_to(point) > ARRIVAL_RADIUS {
        path_step(agent, ctx, point, agent.speed);
    }
    if agent.position.distance_to(point) <= ARRIVAL_RADIUS {
        Status::Success
    } else {
        Status::Running
    }
}

/// Nearest walkable cell centre within [`COVER_SEARCH_RADIUS`] of `from` that
/// has no line of sight to `threat`. Ties resolve to the first cell scanned.
pub fn find_cover(grid: &TileGrid, from: Vec2, threat: Vec2) -> Option<Vec2> {
    let origin = GridPos::from_world(from);
    let radius = COVER_SEARCH_RADIUS as f32;
    let mut best: Option<(f32, Vec2)> = None;

    for dy in -COVER_SEARCH_RADIUS..=COVER_SEARCH_RADIUS {
        for dx in -COVER_SEARCH_RADIUS..=COVER_SEARCH_RADIUS {
            let cell = GridPos::new(origin.x + dx, origin.y + dy);
            if !grid.is_walkable(cell) {
                continue;
            }
            let center = cell.center();
            let dist = from.distance_to(center);
            if dist > radius || line_of_sight(Some(grid), center, threat) {
                continue;
            }
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, center));
            }
        }
    }

    best.map(|(_, center)| center)
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Run directly away from the opponent at boosted speed. Never resolves.
pub fn retreat(agent: &mut Agent, ctx: &mut TickContext) -> Status {
    agent.set_state(BehaviorState::Retreat);
    if let Some(o) = ctx.opponent {
        let mut away = (agent.position - o.position).normalized();
        if away == Vec2::ZERO {
            away = agent.facing.scale(-1.0).normalized();
        }
        try_step(agent, ctx, away.scale(agent.speed * RETREAT_SPEED_MULTIPLIER));
        agent.facing = away;
    }
    Status::Running
}

/// Break line of sight with the opponent.
pub fn take_cover(agent: &mut Agent, ctx: &mut TickContext) -> Status {
    let (Some(o), Some(grid)) = (ctx.opponent, ctx.grid().filter(|g| !g.is_empty())) else {
        return Status::Failure;
    };
    let Some(spot) = find_cover(grid, agent.position, o.position) else {
        return Status::Failure;
    };

    agent.set_state(BehaviorState::Cover);
    if agent.position.distance_to(spot) <= ARRIVAL_RADIUS {
        return Status::Success;
    }
    path_step(agent, ctx, spot, agent.speed);
    Status::Running
}

/// One discrete attack per cooldown expiry.
pub fn attack(agent: &mut Agent, ctx: &mut TickContext) -> Status {
    let Some(o) = ctx.opponent else {
        return Status::Failure;
    };
    agent.set_state(BehaviorState::Attack);
    agent.target = Some(o.id);
    agent.face(o.position);

    if agent.cooldown > 0 {
        agent.cooldown -= 1;
        return Status::Running;
    }
    agent.cooldown = agent.cooldown_ticks;
    agent.attacked_this_tick = true;
    Status::Success
}

/// Circle the opponent while closing to [`Agent::engage_distance`]. A holding
/// behavior: always `Running`. Attack takes over once the agent is in range.
pub fn strafe(agent: &mut Agent, ctx: &mut TickContext) -> Status {
    let Some(o) = ctx.opponent else {
        return Status::Failure;
    };
    agent.set_state(BehaviorState::Strafe);
    if ctx.rng.chance(STRAFE_FLIP_CHANCE) {
        agent.strafe_sign = -agent.strafe_sign;
    }

    let mut radial = (agent.position - o.position).normalized();
    if radial == Vec2::ZERO {
        radial = Vec2::X;
    }
    let speed = agent.speed;
    let closing = (agent.position.distance_to(o.position) - agent.engage_distance()).clamp(-speed, speed);
    let mut step = radial.perpendicular().scale(agent.strafe_sign * speed) - radial.scale(closing);
    if step.length() > speed {
        step = step.normalized().scale(speed);
    }
    try_step(agent, ctx, step);
    agent.face(o.position);
    Status::Running
}

/// Path toward the opponent. A flanker first heads for its flank point, then
/// commits to the opponent once it is no farther out than that point.
pub fn chase(agent: &mut Agent, ctx: &mut TickContext) -> Status {
    let Some(o) = ctx.opponent else {
        return Status::Failure;
    };
    agent.set_state(BehaviorState::Chase);
    let to_opponent = agent.position.distance_to(o.position);
    let goal = match ctx.squad.and_then(|s| s.flank_point) {
        Some(flank) if to_opponent > flank.distance_to(o.position) + ARRIVAL_RADIUS => flank,
        _ => o.position,
    };
    path_step(agent, ctx, goal, agent.speed);
    agent.face(o.position);
    Status::Running
}

pub fn investigate_noise(agent: &mut Agent, ctx: &mut TickContext) -> Status {
    match ctx.noise {
        Some(noise) => investigate(agent, ctx, noise.position),
        None => Status::Failure,
    }
}

/// Converge on the squad's focus position.
pub fn respond_to_squad_alert(agent: &mut Agent, ctx: &mut TickContext) -> Status {
    match ctx.squad.and_then(|s| s.focus_position) {
        Some(point) => investigate(agent, ctx, point),
        None => Status::Failure,
    }
}

/// Walk the patrol route at half speed, hold a formation slot, or idle.
pub fn patrol(agent: &mut Agent, ctx: &mut TickContext) -> Status {
    if let Some(waypoint) = agent.patrol.current() {
        agent.set_state(BehaviorState::Patrol);
        path_step(agent, ctx, waypoint, agent.speed * PATROL_SPEED_MULTIPLIER);
        if agent.position.distance_to(waypoint) <= ARRIVAL_RADIUS {
            agent.patrol.advance();
        }
        return Status::Running;
    }

    if let Some(slot) = ctx.squad.and_then(|s| s.formation_slot) {
        agent.set_state(BehaviorState::Patrol);
        if agent.position.distance_to(slot) > ARRIVAL_RADIUS {
            path_step(agent, ctx, slot, agent.speed);
        }
        return Status::Running;
    }

    agent.set_state(BehaviorState::Idle);
    Status::Running
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::context::{NoiseEvent, Opponent};
    use crate::archetype::{Archetype, Theme};
    use crate::components::TargetId;
    use crate::grid::Tile;
    use crate::rng::SimRng;
    use std::sync::Arc;

    fn goblin_at(x: f32, y: f32) -> Agent {
        Agent::from_archetype(&Archetype::for_theme(Theme::Fantasy), None, Vec2::new(x, y))
    }

    fn open_ctx(w: usize, h: usize) -> TickContext {
        let mut ctx = TickContext::new(1, SimRng::new(5));
        ctx.grid = Some(Arc::new(TileGrid::new(w, h)));
        ctx
    }

    #[test]
    fn test_attack_respects_cooldown() {
        let mut agent = goblin_at(1.5, 1.5);
        let mut ctx = open_ctx(5, 5);
        ctx.opponent = Some(Opponent { id: TargetId(1), position: Vec2::new(2.5, 1.5) });

        assert_eq!(attack(&mut agent, &mut ctx), Status::Success);
        assert!(agent.attacked_this_tick);
        assert_eq!(agent.cooldown, agent.cooldown_ticks);
        assert_eq!(agent.facing, Vec2::X);

        agent.attacked_this_tick = false;
        assert_eq!(attack(&mut agent, &mut ctx), Status::Running);
        assert!(!agent.attacked_this_tick);
        assert_eq!(agent.cooldown, agent.cooldown_ticks - 1);
    }

    #[test]
    fn test_movement_never_enters_walls() {
        let mut grid = TileGrid::new(5, 5);
        grid.set(GridPos::new(2, 2), Tile::Wall);
        let mut ctx = TickContext::new(1, SimRng::new(5));
        ctx.grid = Some(Arc::new(grid));

        let mut agent = goblin_at(1.9, 2.5);
        assert!(!try_step(&mut agent, &ctx, Vec2::new(0.2, 0.0)));
        assert_eq!(agent.position, Vec2::new(1.9, 2.5));
        assert!(try_step(&mut agent, &ctx, Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_strafe_closes_to_engage_distance_and_faces_opponent() {
        let mut agent = goblin_at(2.5, 5.5);
        let mut ctx = open_ctx(10, 10);
        let opp = Vec2::new(4.5, 5.5);
        ctx.opponent = Some(Opponent { id: TargetId(1), position: opp });

        let mut previous = agent.position.distance_to(opp);
        for _ in 0..5 {
            assert_eq!(strafe(&mut agent, &mut ctx), Status::Running);
            let dist = agent.position.distance_to(opp);
            assert!(dist < previous, "strafe drifted outward to {dist}");
            previous = dist;
        }
        for _ in 0..60 {
            strafe(&mut agent, &mut ctx);
        }
        assert_eq!(agent.state, BehaviorState::Strafe);
        let dist = agent.position.distance_to(opp);
        assert!((dist - agent.engage_distance()).abs() < 0.1, "settled at {dist}");
        assert!(dist < agent.attack_range);
        let to_opp = (opp - agent.position).normalized();
        assert!((agent.facing - to_opp).length() < 1e-4);
    }

    #[test]
    fn test_chase_closes_distance_around_walls() {
        let mut grid = TileGrid::new(9, 5);
        for y in 0..4 {
            grid.set(GridPos::new(4, y), Tile::Wall);
        }
        let mut ctx = TickContext::new(1, SimRng::new(5));
        ctx.grid = Some(Arc::new(grid));
        let goal = Vec2::new(7.5, 0.5);
        ctx.opponent = Some(Opponent { id: TargetId(1), position: goal });

        let mut agent = goblin_at(1.5, 0.5);
        for _ in 0..400 {
            chase(&mut agent, &mut ctx);
        }
        assert_eq!(agent.state, BehaviorState::Chase);
        assert!(agent.position.distance_to(goal) < 1.0, "stuck at {:?}", agent.position);
    }

    #[test]
    fn test_chase_heads_for_flank_point() {
        use crate::components::SquadId;
        use crate::squad::SquadOrders;

        let mut agent = goblin_at(5.5, 5.5);
        let mut ctx = open_ctx(12, 12);
        ctx.opponent = Some(Opponent { id: TargetId(1), position: Vec2::new(10.5, 5.5) });
        let flank = Vec2::new(5.5, 10.5);
        ctx.squad = Some(SquadOrders {
            squad: SquadId(1),
            alert: 1.0,
            focus: Some(TargetId(1)),
            focus_position: Some(Vec2::new(10.5, 5.5)),
            is_leader: false,
            formation_slot: None,
            flank_point: Some(flank),
        });

        let before = agent.position.distance_to(flank);
        chase(&mut agent, &mut ctx);
        assert!(agent.position.distance_to(flank) < before);

        // At the flank point the agent commits to the opponent.
        agent.position = flank;
        let before = agent.position.distance_to(Vec2::new(10.5, 5.5));
        chase(&mut agent, &mut ctx);
        assert!(agent.position.distance_to(Vec2::new(10.5, 5.5)) < before);
    }

    #[test]
    fn test_investigate_noise_arrives() {
        let mut agent = goblin_at(1.5, 1.5);
        let mut ctx = open_ctx(6, 6);
        ctx.noise = Some(NoiseEvent { position: Vec2::new(3.5, 1.5), tick: 1 });

        let mut status = Status::Running;
        for _ in 0..100 {
            status = investigate_noise(&mut agent, &mut ctx);
            if status.is_done() {
                break;
            }
        }
        assert_eq!(status, Status::Success);
        assert_eq!(agent.state, BehaviorState::Alert);
    }

    #[test]
    fn test_patrol_wraps_and_idles_without_route() {
        let mut agent = goblin_at(0.5, 0.5).with_patrol(vec![Vec2::new(0.5, 0.5), Vec2::new(1.5, 0.5)]);
        let mut ctx = open_ctx(3, 1);
        assert_eq!(patrol(&mut agent, &mut ctx), Status::Running);
        assert_eq!(agent.state, BehaviorState::Patrol);
        assert_eq!(agent.patrol.index, 1);

        let mut idle = goblin_at(0.5, 0.5);
        assert_eq!(patrol(&mut idle, &mut ctx), Status::Running);
        assert_eq!(idle.state, BehaviorState::Idle);
        assert_eq!(idle.position, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_find_cover_breaks_line_of_sight() {
        let mut grid = TileGrid::new(15, 15);
        for y in 3..=7 {
            grid.set(GridPos::new(5, y), Tile::Wall);
        }
        let threat = Vec2::new(10.5, 5.5);
        let spot = find_cover(&grid, Vec2::new(3.5, 1.5), threat).unwrap();
        assert!(grid.is_walkable_at(spot));
        assert!(!line_of_sight(Some(&grid), spot, threat));
        assert!(Vec2::new(3.5, 1.5).distance_to(spot) <= COVER_SEARCH_RADIUS as f32);

        // Nothing to hide behind on an open grid.
        assert_eq!(find_cover(&TileGrid::new(15, 15), Vec2::new(3.5, 1.5), threat), None);
    }
}
