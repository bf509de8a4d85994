//! Squad phase - the coordinator pass.
//!
//! ## Data Access
//! - Reads: SimConfig, SimTick, DeltaTime, OpponentFeed, AgentId, Agent, SquadMember
//! - Writes: SquadRegistry
//!
//! Runs after the behavior phase, every `squad_update_interval` ticks. This is
//! the only system that writes squad state.

use crate::ai::OpponentFeed;
use crate::components::{Agent, AgentId, SquadId, SquadMember};
use crate::config::SimConfig;
use crate::rng::SimRng;
use crate::role::role_config;
use crate::squad::{MemberView, SquadRegistry};
use crate::systems::time::{DeltaTime, SimTick};
use bevy_ecs::prelude::*;
use std::collections::BTreeMap;

/// Aggression assumed for members without a combat role.
const DEFAULT_AGGRESSION: f32 = 0.5;
/// Keeps squad RNG streams apart from per-agent streams (agent ids are u32).
const SQUAD_RNG_SALT: u64 = 1 << 32;

pub fn squad_coordination_system(
    config: Res<SimConfig>,
    tick: Res<SimTick>,
    dt: Res<DeltaTime>,
    feed: Res<OpponentFeed>,
    mut registry: ResMut<SquadRegistry>,
    query: Query<(&AgentId, &Agent, &SquadMember)>,
) {
    let interval = config.squad_update_interval.max(1);
    let elapsed_ticks = match registry.last_update {
        Some(last) if tick.0.saturating_sub(last) < interval => return,
        Some(last) => tick.0 - last,
        None => 1,
    };
    registry.last_update = Some(tick.0);
    let elapsed = elapsed_ticks as f32 * dt.0;

    let mut observed: BTreeMap<SquadId, Vec<MemberView>> = BTreeMap::new();
    for (id, agent, member) in query.iter() {
        if !agent.is_alive() {
            continue;
        }
        let role = agent.role.map(|r| role_config(r, Some(agent.archetype)));
        observed.entry(member.0).or_default().push(MemberView {
            id: *id,
            position: agent.position,
            facing: agent.facing,
            target: agent.target,
            aggression: role.map_or(DEFAULT_AGGRESSION, |r| r.aggression),
            raises_alert: role.is_some_and(|r| r.raises_squad_alert),
        });
    }

    // Known squads with nobody left still get a pass so their membership empties.
    for id in registry.ids() {
        observed.entry(id).or_default();
    }

    for (squad_id, members) in observed {
        let mut rng = SimRng::fork(config.seed, tick.0, SQUAD_RNG_SALT | squad_id.0 as u64);
        let squad = registry.get_or_create(squad_id, config.default_formation);
        squad.update(&members, |t| feed.position_of(t), &config, elapsed, &mut rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{Archetype, Theme};
    use crate::components::{AgentBundle, TargetId, Vec2};
    use crate::role::CombatRole;

    fn setup(interval: u64) -> (World, Schedule) {
        let mut world = World::new();
        world.insert_resource(SimConfig {
            squad_update_interval: interval,
            ..Default::default()
        });
        world.insert_resource(SimTick(1));
        world.insert_resource(DeltaTime(0.1));
        world.insert_resource(OpponentFeed::default());
        world.insert_resource(SquadRegistry::default());

        let mut schedule = Schedule::default();
        schedule.add_systems(squad_coordination_system);
        (world, schedule)
    }

    fn spawn(world: &mut World, id: u32, squad: u32, at: Vec2, role: Option<CombatRole>) -> Entity {
        let archetype = Archetype::for_theme(Theme::Fantasy);
        let role = role.map(|r| (r, role_config(r, Some(Theme::Fantasy))));
        let agent = Agent::from_archetype(&archetype, role, at);
        world.spawn((AgentBundle { id: AgentId(id), agent }, SquadMember(SquadId(squad)))).id()
    }

    #[test]
    fn test_squads_created_lazily_per_id() {
        let (mut world, mut schedule) = setup(1);
        spawn(&mut world, 1, 10, Vec2::new(0.0, 0.0), None);
        spawn(&mut world, 2, 10, Vec2::new(2.0, 0.0), None);
        spawn(&mut world, 3, 20, Vec2::new(5.0, 5.0), None);

        schedule.run(&mut world);

        let registry = world.resource::<SquadRegistry>();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(SquadId(10)).unwrap().members, vec![AgentId(1), AgentId(2)]);
        assert_eq!(registry.get(SquadId(20)).unwrap().leader(), Some(AgentId(3)));
        assert_eq!(registry.last_update, Some(1));
    }

    #[test]
    fn test_runs_at_configured_cadence() {
        let (mut world, mut schedule) = setup(5);
        spawn(&mut world, 1, 1, Vec2::ZERO, None);
        schedule.run(&mut world);
        assert_eq!(world.resource::<SquadRegistry>().last_update, Some(1));

        for t in 2..=5 {
            world.resource_mut::<SimTick>().0 = t;
            schedule.run(&mut world);
            assert_eq!(world.resource::<SquadRegistry>().last_update, Some(1));
        }
        world.resource_mut::<SimTick>().0 = 6;
        schedule.run(&mut world);
        assert_eq!(world.resource::<SquadRegistry>().last_update, Some(6));
    }

    #[test]
    fn test_targets_drive_focus_and_alert() {
        let (mut world, mut schedule) = setup(1);
        world.resource_mut::<OpponentFeed>().set(TargetId(7), Vec2::new(9.0, 0.0));
        let scout = spawn(&mut world, 1, 1, Vec2::ZERO, Some(CombatRole::Scout));
        spawn(&mut world, 2, 1, Vec2::new(-2.0, 0.0), Some(CombatRole::Tank));
        world.get_mut::<Agent>(scout).unwrap().target = Some(TargetId(7));

        schedule.run(&mut world);

        let config = SimConfig::default();
        let squad = world.resource::<SquadRegistry>().get(SquadId(1)).unwrap().clone();
        assert_eq!(squad.focus, Some(TargetId(7)));
        assert_eq!(squad.focus_position, Some(Vec2::new(9.0, 0.0)));
        // Scout spotted the target: doubled raise.
        assert!((squad.alert - 2.0 * config.alert_raise).abs() < 1e-6);
        // Tank is the more aggressive member and flanks.
        assert!(squad.is_flanking(AgentId(2)));
    }

    #[test]
    fn test_dead_members_leave_the_squad() {
        let (mut world, mut schedule) = setup(1);
        spawn(&mut world, 1, 1, Vec2::ZERO, None);
        let doomed = spawn(&mut world, 2, 1, Vec2::new(1.0, 0.0), None);
        schedule.run(&mut world);
        assert_eq!(world.resource::<SquadRegistry>().get(SquadId(1)).unwrap().members.len(), 2);

        world.get_mut::<Agent>(doomed).unwrap().health = 0.0;
        world.resource_mut::<SimTick>().0 = 2;
        schedule.run(&mut world);
        assert_eq!(world.resource::<SquadRegistry>().get(SquadId(1)).unwrap().members, vec![AgentId(1)]);
    }
}
