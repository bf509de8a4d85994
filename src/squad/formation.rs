//! Formation geometry and flanking.
//!
//! Offsets are computed in the leader's local frame (lateral to the left of
//! `facing`, forward along `facing`) and rotated into world space. Followers
//! are indexed from 0; the leader itself sits at the origin.

use crate::components::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Positions per ring in a circle formation.
const CIRCLE_RING_SIZE: usize = 8;
/// Ring radius step as a multiple of spacing.
const CIRCLE_RING_SCALE: f32 = 1.5;

/// Shape a squad holds around its leader.
///
/// Deserializing an unrecognized id yields [`FormationType::Column`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum FormationType {
    /// Side by side, one spacing behind the leader.
    Line,
    /// Rows of two fanning out behind the leader.
    Wedge,
    /// Single file.
    #[default]
    Column,
    /// Concentric rings of up to eight.
    Circle,
    /// Loose rows of two.
    Staggered,
}

impl FormationType {
    /// Parse a formation id; unknown ids fall back to `Column`.
    pub fn from_id(id: &str) -> FormationType {
        match id.trim().to_ascii_lowercase().as_str() {
            "line" => FormationType::Line,
            "wedge" => FormationType::Wedge,
            "column" => FormationType::Column,
            "circle" => FormationType::Circle,
            "staggered" => FormationType::Staggered,
            _ => FormationType::Column,
        }
    }
}

impl From<String> for FormationType {
    fn from(id: String) -> Self {
        FormationType::from_id(&id)
    }
}

/// Offset of follower `index` from the formation origin, in world space.
///
/// A zero `facing` is treated as facing +X.
pub fn formation_offset(index: usize, formation: FormationType, facing: Vec2, spacing: f32) -> Vec2 {
    let mut forward = facing.normalized();
    if forward == Vec2::ZERO {
        forward = Vec2::X;
    }
    let left = forward.perpendicular();

    let side = if index % 2 == 0 { 1.0 } else { -1.0 };
    let row = (index / 2 + 1) as f32;

    let (lateral, ahead) = match formation {
        FormationType::Line => (side * row * spacing, -spacing),
        FormationType::Wedge => (side * row * spacing, -row * spacing),
        FormationType::Column => (0.0, -((index + 1) as f32) * spacing),
        FormationType::Circle => {
            let ring = index / CIRCLE_RING_SIZE;
            let slot = index % CIRCLE_RING_SIZE;
            let radius = CIRCLE_RING_SCALE * spacing * (ring + 1) as f32;
            let angle = slot as f32 / CIRCLE_RING_SIZE as f32 * TAU;
            (radius * angle.sin(), radius * angle.cos())
        }
        FormationType::Staggered => {
            let shift = if (index / 2) % 2 == 1 { 0.25 * spacing } else { 0.0 };
            (side * 0.5 * spacing + shift, -row * spacing)
        }
    };

    left.scale(lateral) + forward.scale(ahead)
}

/// Vector perpendicular to the centroid->target axis, `distance` long.
///
/// When the centroid sits on the target, returns `(distance, 0)`.
pub fn flank_vector(target: Vec2, centroid: Vec2, distance: f32) -> Vec2 {
    let axis = (target - centroid).normalized();
    if axis == Vec2::ZERO {
        return Vec2::new(distance, 0.0);
    }
    axis.perpendicular().scale(distance)
}
