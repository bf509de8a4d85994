//! Core behavior trait.

use super::Status;

/// A behavior tree node ticked against one agent and the shared tick context.
///
/// The agent type `A` is the record the tree drives; `C` is the per-tick
/// context (grid, opponent, noise, RNG, ...). Nodes may keep their own resume
/// state, hence `&mut self`.
pub trait Behavior<A, C>: Send + Sync {
    /// Evaluate this node once.
    fn tick(&mut self, agent: &mut A, ctx: &mut C) -> Status;

    /// Return this node and its descendants to their initial state.
    ///
    /// Called when a running node is preempted by a higher-priority branch.
    fn reset(&mut self) {}
}

/// Blanket implementation for boxed behaviors, so heterogeneous children can
/// be stored as `Vec<Box<dyn Behavior<A, C>>>`.
impl<A, C> Behavior<A, C> for Box<dyn Behavior<A, C>> {
    #[inline]
    fn tick(&mut self, agent: &mut A, ctx: &mut C) -> Status {
        (**self).tick(agent, ctx)
    }

    #[inline]
    fn reset(&mut self) {
        (**self).reset()
    }
}
