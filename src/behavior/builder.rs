//! Builder utilities for ergonomic behavior tree construction.
//!
//! Instead of writing `Box::new(Sequence::new(vec![...]))`, write
//! `sequence(vec![...])`.

use super::{Action, Behavior, Condition, ReactiveSelector, ReactiveSequence, Selector, Sequence, Status};

pub type BoxedBehavior<A, C> = Box<dyn Behavior<A, C>>;

#[inline]
pub fn sequence<A: 'static, C: 'static>(children: Vec<BoxedBehavior<A, C>>) -> BoxedBehavior<A, C> {
    Box::new(Sequence::new(children))
}

#[inline]
pub fn selector<A: 'static, C: 'static>(children: Vec<BoxedBehavior<A, C>>) -> BoxedBehavior<A, C> {
    Box::new(Selector::new(children))
}

#[inline]
pub fn reactive_sequence<A: 'static, C: 'static>(children: Vec<BoxedBehavior<A, C>>) -> BoxedBehavior<A, C> {
    Box::new(ReactiveSequence::new(children))
}

#[inline]
pub fn reactive_selector<A: 'static, C: 'static>(children: Vec<BoxedBehavior<A, C>>) -> BoxedBehavior<A, C> {
    Box::new(ReactiveSelector::new(children))
}

#[inline]
pub fn condition<A: 'static, C: 'static, F>(predicate: F) -> BoxedBehavior<A, C>
where
    F: Fn(&A, &C) -> bool + Send + Sync + 'static,
{
    Box::new(Condition::new(predicate))
}

#[inline]
pub fn action<A: 'static, C: 'static, F>(run: F) -> BoxedBehavior<A, C>
where
    F: FnMut(&mut A, &mut C) -> Status + Send + Sync + 'static,
{
    Box::new(Action::new(run))
}
