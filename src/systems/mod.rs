//! ECS systems for the combat AI.
//!
//! Each fixed tick runs two serialized phases:
//!
//! 1. `behavior_tick_system` - ticks every agent's behavior tree (reads squad state)
//! 2. `squad_coordination_system` - rebuilds squads, focus, alert and formation
//!    slots at the configured cadence (the only writer of squad state)

pub mod behavior;
pub mod squad;
pub mod time;

pub use behavior::behavior_tick_system;
pub use squad::squad_coordination_system;
pub use time::{DeltaTime, SimTick};
