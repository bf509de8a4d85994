//! Leaf nodes: conditions and actions.

use super::{Behavior, Status};

/// Wraps a pure predicate over `(agent, context)`.
///
/// Never mutates anything and never returns `Running`.
pub struct Condition<F> {
    predicate: F,
}

impl<F> Condition<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<A, C, F> Behavior<A, C> for Condition<F>
where
    F: Fn(&A, &C) -> bool + Send + Sync,
{
    #[inline]
    fn tick(&mut self, agent: &mut A, ctx: &mut C) -> Status {
        Status::from_bool((self.predicate)(agent, ctx))
    }
}

/// Wraps an operation that may mutate the agent and consume context state
/// (RNG draws, path queries). May return any status.
pub struct Action<F> {
    run: F,
}

impl<F> Action<F> {
    pub fn new(run: F) -> Self {
        Self { run }
    }
}

impl<A, C, F> Behavior<A, C> for Action<F>
where
    F: FnMut(&mut A, &mut C) -> Status + Send + Sync,
{
    #[inline]
    fn tick(&mut self, agent: &mut A, ctx: &mut C) -> Status {
        (self.run)(agent, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_reflects_predicate() {
        let mut positive = Condition::new(|a: &i32, _: &()| *a > 0);
        assert_eq!(positive.tick(&mut 3, &mut ()), Status::Success);
        assert_eq!(positive.tick(&mut -3, &mut ()), Status::Failure);
    }

    #[test]
    fn action_mutates_agent() {
        let mut bump = Action::new(|a: &mut i32, ctx: &mut i32| {
            *a += *ctx;
            Status::Running
        });
        let mut agent = 1;
        assert_eq!(bump.tick(&mut agent, &mut 4), Status::Running);
        assert_eq!(agent, 5);
    }
}
