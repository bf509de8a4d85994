//! Squad tactics coordinator.
//!
//! Formation geometry, alert propagation and focus-target arbitration for
//! groups of agents sharing a [`crate::components::SquadId`].

pub mod formation;
pub mod registry;
pub mod tactics;

pub use formation::{flank_vector, formation_offset, FormationType};
pub use registry::SquadRegistry;
pub use tactics::{FocusChange, MemberView, Squad, SquadOrders, FLANK_FRACTION};
