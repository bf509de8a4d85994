//! Behavior tree engine.
//!
//! A small, resumable behavior tree evaluated once per tick per agent.
//!
//! - [`Behavior`]: the single `tick(agent, ctx)` entry point every node implements
//! - [`Status`]: `Running`, `Success` or `Failure`
//! - Memory composites: [`Selector`], [`Sequence`] (resume at the running child)
//! - Reactive composites: [`ReactiveSelector`], [`ReactiveSequence`] (re-check from the first child)
//! - Leaves: [`Condition`] (pure predicate), [`Action`] (mutates the agent)
//!
//! Nodes own their children and any resume state, so a tree is one owned value
//! per agent and never shared between agents.

pub mod builder;
pub mod composite;
pub mod leaf;
pub mod node;
pub mod status;

pub use builder::{action, condition, reactive_selector, reactive_sequence, selector, sequence};
pub use composite::{ReactiveSelector, ReactiveSequence, Selector, Sequence};
pub use leaf::{Action, Condition};
pub use node::Behavior;
pub use status::Status;
