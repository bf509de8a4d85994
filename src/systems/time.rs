//! Simulation clock resources.

use bevy_ecs::prelude::*;

/// Resource containing the delta time for the current tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime(pub f32);

/// Global simulation tick counter. Increments each fixed update.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}
