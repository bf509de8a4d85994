//! Composite behavior nodes.
//!
//! Two families:
//!
//! - **Memory** composites ([`Sequence`], [`Selector`]) keep a cursor at the
//!   child that last returned `Running` and resume there next tick without
//!   re-evaluating earlier siblings. The cursor returns to 0 whenever the
//!   composite itself finishes with `Success` or `Failure`.
//! - **Reactive** composites ([`ReactiveSequence`], [`ReactiveSelector`])
//!   start from the first child every tick. A running child that is preempted
//!   by an earlier sibling is reset.

use super::{Behavior, Status};

type Children<A, C> = Vec<Box<dyn Behavior<A, C>>>;

fn reset_all<A, C>(children: &mut Children<A, C>) {
    for child in children.iter_mut() {
        child.reset();
    }
}

// ============================================================================
// MEMORY COMPOSITES
// ============================================================================

/// AND node with resume cursor.
///
/// - `Running` child: store its index, return `Running`
/// - `Failure` child: reset cursor, return `Failure`
/// - all children `Success`: reset cursor, return `Success`
///
/// An empty sequence succeeds.
pub struct Sequence<A, C> {
    children: Children<A, C>,
    cursor: usize,
}

impl<A, C> Sequence<A, C> {
    pub fn new(children: Children<A, C>) -> Self {
        Self { children, cursor: 0 }
    }

    /// Index of the child the next tick starts at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<A, C> Behavior<A, C> for Sequence<A, C> {
    fn tick(&mut self, agent: &mut A, ctx: &mut C) -> Status {
        let start = self.cursor.min(self.children.len());
        for (i, child) in self.children.iter_mut().enumerate().skip(start) {
            match child.tick(agent, ctx) {
                Status::Success => continue,
                Status::Running => {
                    self.cursor = i;
                    return Status::Running;
                }
                Status::Failure => {
                    self.cursor = 0;
                    return Status::Failure;
                }
            }
        }
        self.cursor = 0;
        Status::Success
    }

    fn reset(&mut self) {
        self.cursor = 0;
        reset_all(&mut self.children);
    }
}

/// OR node with resume cursor.
///
/// - `Running` child: store its index, return `Running`
/// - `Success` child: reset cursor, return `Success`
/// - all remaining children `Failure`: reset cursor, return `Failure`
///
/// An empty selector fails.
pub struct Selector<A, C> {
    children: Children<A, C>,
    cursor: usize,
}

impl<A, C> Selector<A, C> {
    pub fn new(children: Children<A, C>) -> Self {
        Self { children, cursor: 0 }
    }

    /// Index of the child the next tick starts at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<A, C> Behavior<A, C> for Selector<A, C> {
    fn tick(&mut self, agent: &mut A, ctx: &mut C) -> Status {
        let start = self.cursor.min(self.children.len());
        for (i, child) in self.children.iter_mut().enumerate().skip(start) {
            match child.tick(agent, ctx) {
                Status::Failure => continue,
                Status::Running => {
                    self.cursor = i;
                    return Status::Running;
                }
                Status::Success => {
                    self.cursor = 0;
                    return Status::Success;
                }
            }
        }
        self.cursor = 0;
        Status::Failure
    }

    fn reset(&mut self) {
        self.cursor = 0;
        reset_all(&mut self.children);
    }
}

// ============================================================================
// REACTIVE COMPOSITES
// ============================================================================

/// AND node that re-checks every child from the start each tick.
pub struct ReactiveSequence<A, C> {
    children: Children<A, C>,
    running: Option<usize>,
}

impl<A, C> ReactiveSequence<A, C> {
    pub fn new(children: Children<A, C>) -> Self {
        Self { children, running: None }
    }
}

impl<A, C> Behavior<A, C> for ReactiveSequence<A, C> {
    fn tick(&mut self, agent: &mut A, ctx: &mut C) -> Status {
        for i in 0..self.children.len() {
            let status = self.children[i].tick(agent, ctx);
            if status.is_success() {
                continue;
            }
            preempt(&mut self.children, &mut self.running, i, status);
            return status;
        }
        self.running = None;
        Status::Success
    }

    fn reset(&mut self) {
        self.running = None;
        reset_all(&mut self.children);
    }
}

/// OR node that re-checks every child from the start each tick.
///
/// A lower-priority branch left `Running` last tick is reset as soon as a
/// higher-priority branch takes over.
pub struct ReactiveSelector<A, C> {
    children: Children<A, C>,
    running: Option<usize>,
}

impl<A, C> ReactiveSelector<A, C> {
    pub fn new(children: Children<A, C>) -> Self {
        Self { children, running: None }
    }

    /// Index of the child that returned `Running` on the last tick, if any.
    pub fn running_child(&self) -> Option<usize> {
        self.running
    }
}

impl<A, C> Behavior<A, C> for ReactiveSelector<A, C> {
    fn tick(&mut self, agent: &mut A, ctx: &mut C) -> Status {
        for i in 0..self.children.len() {
            let status = self.children[i].tick(agent, ctx);
            if status.is_failure() {
                continue;
            }
            preempt(&mut self.children, &mut self.running, i, status);
            return status;
        }
        self.running = None;
        Status::Failure
    }

    fn reset(&mut self) {
        self.running = None;
        reset_all(&mut self.children);
    }
}

/// Child `winner` decided the tick; reset whichever other child was running.
fn preempt<A, C>(children: &mut Children<A, C>, running: &mut Option<usize>, winner: usize, status: Status) {
    if let Some(prev) = *running {
        if prev != winner {
            if let Some(child) = children.get_mut(prev) {
                child.reset();
            }
        }
    }
    *running = status.is_running().then_some(winner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{action, condition};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counter {
        ticks: Vec<&'static str>,
    }

    type Node = Box<dyn Behavior<Counter, ()>>;

    fn leaf(name: &'static str, status: Status) -> Node {
        action(move |a: &mut Counter, _: &mut ()| {
            a.ticks.push(name);
            status
        })
    }

    /// Returns `Running` `n` times, then `Success`; counts resets.
    struct RunFor {
        n: usize,
        left: usize,
        resets: Arc<AtomicUsize>,
    }

    impl RunFor {
        fn boxed(n: usize, resets: Arc<AtomicUsize>) -> Node {
            Box::new(RunFor { n, left: n, resets })
        }
    }

    impl Behavior<Counter, ()> for RunFor {
        fn tick(&mut self, a: &mut Counter, _: &mut ()) -> Status {
            a.ticks.push("run");
            if self.left == 0 {
                self.left = self.n;
                Status::Success
            } else {
                self.left -= 1;
                Status::Running
            }
        }

        fn reset(&mut self) {
            self.left = self.n;
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn sequence_resumes_at_running_child() {
        let resets = Arc::new(AtomicUsize::new(0));
        let mut seq = Sequence::new(vec![leaf("a", Status::Success), RunFor::boxed(2, resets), leaf("b", Status::Success)]);
        let mut agent = Counter::default();

        assert_eq!(seq.tick(&mut agent, &mut ()), Status::Running);
        assert_eq!(seq.cursor(), 1);
        assert_eq!(seq.tick(&mut agent, &mut ()), Status::Running);
        assert_eq!(seq.cursor(), 1);
        assert_eq!(seq.tick(&mut agent, &mut ()), Status::Success);
        assert_eq!(seq.cursor(), 0);

        // "a" ran once: the resumed ticks skipped it.
        assert_eq!(agent.ticks, vec!["a", "run", "run", "run", "b"]);
    }

    #[test]
    fn sequence_failure_resets_cursor() {
        let resets = Arc::new(AtomicUsize::new(0));
        let mut seq = Sequence::new(vec![RunFor::boxed(1, resets), leaf("fail", Status::Failure)]);
        let mut agent = Counter::default();

        assert_eq!(seq.tick(&mut agent, &mut ()), Status::Running);
        assert_eq!(seq.cursor(), 0);
        assert_eq!(seq.tick(&mut agent, &mut ()), Status::Failure);
        assert_eq!(seq.cursor(), 0);
    }

    #[test]
    fn selector_resumes_without_rechecking_earlier_children() {
        let resets = Arc::new(AtomicUsize::new(0));
        let mut sel = Selector::new(vec![leaf("guard", Status::Failure), RunFor::boxed(1, resets)]);
        let mut agent = Counter::default();

        assert_eq!(sel.tick(&mut agent, &mut ()), Status::Running);
        assert_eq!(sel.cursor(), 1);
        assert_eq!(sel.tick(&mut agent, &mut ()), Status::Success);
        assert_eq!(sel.cursor(), 0);
        assert_eq!(agent.ticks, vec!["guard", "run", "run"]);
    }

    #[test]
    fn selector_all_fail_resets_cursor() {
        let mut sel: Selector<Counter, ()> = Selector::new(vec![leaf("a", Status::Failure), leaf("b", Status::Failure)]);
        let mut agent = Counter::default();
        assert_eq!(sel.tick(&mut agent, &mut ()), Status::Failure);
        assert_eq!(sel.cursor(), 0);
    }

    #[test]
    fn empty_composites() {
        let mut agent = Counter::default();
        assert_eq!(Sequence::<Counter, ()>::new(vec![]).tick(&mut agent, &mut ()), Status::Success);
        assert_eq!(Selector::<Counter, ()>::new(vec![]).tick(&mut agent, &mut ()), Status::Failure);
        assert_eq!(ReactiveSelector::<Counter, ()>::new(vec![]).tick(&mut agent, &mut ()), Status::Failure);
    }

    #[test]
    fn reactive_selector_preempts_running_child() {
        let resets = Arc::new(AtomicUsize::new(0));
        let mut sel = ReactiveSelector::new(vec![
            condition(|a: &Counter, _: &()| a.ticks.len() > 3),
            RunFor::boxed(10, resets.clone()),
        ]);
        let mut agent = Counter::default();

        assert_eq!(sel.tick(&mut agent, &mut ()), Status::Running);
        assert_eq!(sel.running_child(), Some(1));
        assert_eq!(resets.load(Ordering::SeqCst), 0);

        // Guard now holds: the running child is reset.
        agent.ticks.extend(["x", "y", "z"]);
        assert_eq!(sel.tick(&mut agent, &mut ()), Status::Success);
        assert_eq!(sel.running_child(), None);
        assert_eq!(resets.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reactive_sequence_rechecks_guard() {
        let resets = Arc::new(AtomicUsize::new(0));
        let mut seq = ReactiveSequence::new(vec![
            condition(|a: &Counter, _: &()| a.ticks.len() < 2),
            RunFor::boxed(10, resets.clone()),
        ]);
        let mut agent = Counter::default();

        assert_eq!(seq.tick(&mut agent, &mut ()), Status::Running);
        assert_eq!(seq.tick(&mut agent, &mut ()), Status::Running);
        assert_eq!(seq.tick(&mut agent, &mut ()), Status::Failure);
        assert_eq!(resets.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reset_clears_cursor() {
        let resets = Arc::new(AtomicUsize::new(0));
        let mut seq = Sequence::new(vec![RunFor::boxed(3, resets.clone())]);
        let mut agent = Counter::default();
        seq.tick(&mut agent, &mut ());
        seq.reset();
        assert_eq!(seq.cursor(), 0);
        assert_eq!(resets.load(Ordering::SeqCst), 1);
    }
}
