//! NPC combat AI: tick context, predicates, actions and the canonical tree.

pub mod actions;
pub mod conditions;
pub mod context;
pub mod tree;

pub use context::{LastNoise, NoiseEvent, Opponent, OpponentFeed, TickContext};
pub use tree::{combat_tree, AiNode, Brain};
