//! Basic demonstration of the This Bitter Ground combat AI.
//!
//! Run with: RUST_LOG=tbg_ai=debug cargo run --example basic_demo

use tbg_ai::{AgentSpawn, CombatRole, FormationType, SimWorld, TileGrid, Vec2};

const LEVEL: &str = "\
##########################
#........................#
#........................#
#....####.......####.....#
#....#..............#....#
#....#......+.......#....#
#....####.......####.....#
#........................#
#........................#
##########################";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== This Bitter Ground - Combat AI Demo ===\n");

    let mut sim = SimWorld::new();
    match TileGrid::parse(LEVEL) {
        Ok(grid) => sim.set_grid(grid),
        Err(err) => {
            eprintln!("bad level: {err}");
            return;
        }
    }

    // One squad of three on the left, a lone patroller on the right
    sim.set_squad_formation(1, FormationType::Wedge);
    sim.spawn_agent(AgentSpawn::new(1, Vec2::new(2.5, 4.5)).in_squad(1).with_role(CombatRole::Tank));
    sim.spawn_agent(AgentSpawn::new(2, Vec2::new(2.5, 2.5)).in_squad(1).with_role(CombatRole::Ranged));
    sim.spawn_agent(AgentSpawn::new(3, Vec2::new(2.5, 7.5)).in_squad(1).with_role(CombatRole::Scout));
    sim.spawn_agent(
        AgentSpawn::new(4, Vec2::new(22.5, 2.5)).with_patrol(vec![Vec2::new(22.5, 7.5), Vec2::new(22.5, 2.5)]),
    );

    // The player enters at the centre of the room
    sim.set_opponent(1, Vec2::new(12.5, 5.5));

    println!("Running 300 ticks (10 seconds at 30 ticks/sec)...\n");
    for tick in 0..300 {
        sim.step(1.0 / 30.0);

        if tick == 120 {
            println!("--- Noise at (20.5, 8.5) ---\n");
            sim.emit_noise(Vec2::new(20.5, 8.5));
        }

        if (tick + 1) % 60 == 0 {
            println!("--- Tick {} (t={:.1}s) ---", sim.current_tick(), sim.current_time());
            print_snapshot(&mut sim);
        }
    }

    println!("\n=== Final State (JSON) ===\n");
    match sim.snapshot().to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("snapshot failed: {err}"),
    }
}

fn print_snapshot(sim: &mut SimWorld) {
    let snapshot = sim.snapshot();

    for agent in &snapshot.agents {
        println!(
            "  Agent {}: pos=({:.1}, {:.1}) hp={:.0}/{:.0} [{}] squad={:?} target={:?}",
            agent.id, agent.x, agent.y, agent.health, agent.health_max, agent.state, agent.squad, agent.target
        );
    }
    for squad in &snapshot.squads {
        println!(
            "  Squad {}: leader={:?} alert={:.2} focus={:?} flankers={:?} [{}]",
            squad.id, squad.leader, squad.alert, squad.focus, squad.flankers, squad.formation
        );
    }
    println!("  Attacks since last report: {}\n", snapshot.attacks.len());
}
