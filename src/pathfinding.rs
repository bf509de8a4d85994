//! Grid pathfinder - bounded 4-directional A*.
//!
//! A single generic search ([`search`]) is parameterized by the cell type and a
//! passability predicate. Two thin front-ends apply the two fallback policies:
//!
//! | Front-end            | Coordinates | Missing/empty grid | No path / budget spent  |
//! |----------------------|-------------|--------------------|-------------------------|
//! | [`find_path`]        | `GridPos`   | empty result       | empty result            |
//! | [`find_path_world`]  | `Vec2`      | fully open         | direct `[start, goal]`  |
//!
//! Step cost is uniform (1 per cell) and the heuristic is Manhattan distance,
//! so any returned path is shortest among 4-connected paths. Among equal-cost
//! alternatives the returned one is unspecified.

use crate::components::Vec2;
use crate::grid::{GridPos, TileGrid};
use ::pathfinding::prelude::astar;
use std::cell::Cell;
use std::hash::Hash;

/// Default cap on node expansions per search.
pub const DEFAULT_EXPANSION_BUDGET: usize = 800;

// ============================================================================
// GENERIC SEARCH
// ============================================================================

/// A cell coordinate that can be searched on a 4-connected grid.
pub trait GridCell: Copy + Eq + Hash {
    /// Orthogonal neighbours (no diagonals).
    fn neighbors4(&self) -> [Self; 4];
    /// Manhattan distance, used as the admissible heuristic.
    fn manhattan(&self, other: &Self) -> u32;
}

impl GridCell for GridPos {
    fn neighbors4(&self) -> [Self; 4] {
        [
            GridPos::new(self.x + 1, self.y),
            GridPos::new(self.x - 1, self.y),
            GridPos::new(self.x, self.y + 1),
            GridPos::new(self.x, self.y - 1),
        ]
    }

    fn manhattan(&self, other: &Self) -> u32 {
        GridPos::manhattan(self, *other)
    }
}

/// A* from `start` to `goal` over cells accepted by `passable`.
///
/// Returns the full path including both endpoints, `Some(vec![start])` when
/// they coincide, and `None` when either endpoint is impassable, the goal is
/// unreachable, or more than `max_expansions` nodes were expanded.
pub fn search<N, F>(start: N, goal: N, mut passable: F, max_expansions: usize) -> Option<Vec<N>>
where
    N: GridCell,
    F: FnMut(N) -> bool,
{
    if !passable(start) || !passable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let expanded = Cell::new(0usize);
    let exhausted = Cell::new(false);

    let result = astar(
        &start,
        |node| {
            let n = expanded.get() + 1;
            expanded.set(n);
            if n > max_expansions {
                exhausted.set(true);
                return Vec::new();
            }
            node.neighbors4()
                .into_iter()
                .filter(|next| passable(*next))
                .map(|next| (next, 1u32))
                .collect::<Vec<_>>()
        },
        |node| node.manhattan(&goal),
        |node| !exhausted.get() && *node == goal,
    );

    if exhausted.get() {
        tracing::debug!(budget = max_expansions, "path search exhausted its expansion budget");
        return None;
    }
    result.map(|(path, _cost)| path)
}

// ============================================================================
// INTEGER FRONT-END
// ============================================================================

/// Bounds and walkability queries the integer front-end needs from a grid.
pub trait Passability {
    fn in_bounds(&self, pos: GridPos) -> bool;
    fn is_walkable(&self, pos: GridPos) -> bool;
}

impl Passability for TileGrid {
    fn in_bounds(&self, pos: GridPos) -> bool {
        TileGrid::in_bounds(self, pos)
    }

    fn is_walkable(&self, pos: GridPos) -> bool {
        TileGrid::is_walkable(self, pos)
    }
}

/// Path between two cells; empty means "no path".
///
/// Out-of-bounds or unwalkable endpoints, an empty grid, an unreachable goal
/// and an exhausted budget all yield an empty vector.
pub fn find_path<G: Passability + ?Sized>(start: GridPos, goal: GridPos, grid: &G, max_expansions: usize) -> Vec<GridPos> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return Vec::new();
    }
    search(start, goal, |p| grid.in_bounds(p) && grid.is_walkable(p), max_expansions).unwrap_or_default()
}

// ============================================================================
// WORLD-SPACE FRONT-END
// ============================================================================

/// Waypoints from `start` to `goal` in world space.
///
/// Interior waypoints are cell centres; the first is the centre of the start
/// cell. With no grid, an empty grid, or when the search fails, the result is
/// the direct line `[start, goal]`.
pub fn find_path_world(start: Vec2, goal: Vec2, grid: Option<&TileGrid>, max_expansions: usize) -> Vec<Vec2> {
    let direct = vec![start, goal];
    let Some(grid) = grid.filter(|g| !g.is_empty()) else {
        return direct;
    };

    let cells = find_path(GridPos::from_world(start), GridPos::from_world(goal), grid, max_expansions);
    if cells.is_empty() {
        return direct;
    }
    cells.iter().map(GridPos::center).collect()
}
