//! Behavior phase - ticks every agent's tree once.
//!
//! ## Data Access
//! - Reads: SimConfig, SimTick, DeltaTime, GridResource, OpponentFeed, LastNoise, SquadRegistry
//! - Writes: Agent, Brain
//!
//! Each agent only mutates its own `Agent` and `Brain`; squad state is read
//! through an immutable [`SquadOrders`](crate::squad::SquadOrders) copy. Every
//! agent draws from its own RNG stream forked from `(seed, tick, agent id)`,
//! so the outcome does not depend on iteration order.
//!
//! ## Parallel Feature
//!
//! When compiled with `--features parallel`, agents are ticked across threads
//! with rayon.

use crate::ai::{Brain, LastNoise, OpponentFeed, TickContext};
use crate::components::{Agent, AgentId, SquadMember};
use crate::config::SimConfig;
use crate::grid::GridResource;
use crate::rng::SimRng;
use crate::squad::SquadRegistry;
use crate::systems::time::{DeltaTime, SimTick};
use bevy_ecs::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Tick-wide inputs shared by every agent's context.
struct SharedInputs<'a> {
    base: TickContext,
    seed: u64,
    squads: &'a SquadRegistry,
}

impl SharedInputs<'_> {
    fn context_for(&self, id: AgentId, member: Option<&SquadMember>) -> TickContext {
        let mut ctx = self.base.clone();
        ctx.rng = SimRng::fork(self.seed, ctx.tick, id.0 as u64);
        ctx.squad = member.and_then(|m| self.squads.orders_for(m.0, id));
        ctx
    }
}

pub fn behavior_tick_system(
    config: Res<SimConfig>,
    tick: Res<SimTick>,
    dt: Res<DeltaTime>,
    grid: Res<GridResource>,
    feed: Res<OpponentFeed>,
    noise: Res<LastNoise>,
    squads: Res<SquadRegistry>,
    mut query: Query<(&AgentId, &mut Agent, &mut Brain, Option<&SquadMember>)>,
) {
    let mut base = TickContext::new(tick.0, SimRng::new(config.seed));
    base.grid = grid.0.clone();
    base.opponent = feed.primary();
    base.noise = noise.0;
    base.dt = dt.0;
    base.path_budget = config.path_expansion_budget;
    base.noise_memory_ticks = config.noise_memory_ticks;

    let shared = SharedInputs {
        base,
        seed: config.seed,
        squads: &*squads,
    };

    #[cfg(feature = "parallel")]
    {
        let mut agents: Vec<_> = query.iter_mut().collect();
        agents.par_iter_mut().for_each(|(id, agent, brain, member)| {
            let mut ctx = shared.context_for(**id, *member);
            brain.tick(agent, &mut ctx);
        });
    }

    #[cfg(not(feature = "parallel"))]
    for (id, mut agent, mut brain, member) in query.iter_mut() {
        let mut ctx = shared.context_for(*id, member);
        brain.tick(&mut agent, &mut ctx);
    }
}
