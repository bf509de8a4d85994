//! Tile grid - passability map the AI moves across.
//!
//! The grid is a row-major array of [`Tile`]s. One cell spans one world unit:
//! the point `(x, y)` lies in cell `(floor(x), floor(y))`. The grid is shared
//! read-only between agents through [`GridResource`].

use crate::components::Vec2;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Resource wrapper for the tile grid, shared read-only by every agent tick.
#[derive(Resource, Clone, Default)]
pub struct GridResource(pub Option<Arc<TileGrid>>);

impl GridResource {
    pub fn new(grid: TileGrid) -> Self {
        Self(Some(Arc::new(grid)))
    }

    pub fn grid(&self) -> Option<&TileGrid> {
        self.0.as_deref()
    }
}

/// Errors produced while building a grid from host data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("unknown tile glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}

// ============================================================================
// TILES
// ============================================================================

/// Contents of a single grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Open floor.
    #[default]
    Floor,
    /// Solid wall.
    Wall,
    /// Door - walkable, does not block sight while walkable.
    Door,
    /// Hidden door - walkable like a door.
    SecretDoor,
    /// Outside the map proper; never walkable.
    Void,
}

impl Tile {
    pub fn is_walkable(&self) -> bool {
        matches!(self, Tile::Floor | Tile::Door | Tile::SecretDoor)
    }

    /// Whether this tile stops a line-of-sight ray.
    pub fn blocks_sight(&self) -> bool {
        matches!(self, Tile::Wall | Tile::Void)
    }

    pub fn from_glyph(glyph: char) -> Option<Tile> {
        match glyph {
            '.' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            '+' => Some(Tile::Door),
            's' => Some(Tile::SecretDoor),
            ' ' => Some(Tile::Void),
            _ => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Door => '+',
            Tile::SecretDoor => 's',
            Tile::Void => ' ',
        }
    }
}

/// Integer cell coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a world-space point.
    pub fn from_world(p: Vec2) -> Self {
        Self::new(p.x.floor() as i32, p.y.floor() as i32)
    }

    /// World-space centre of this cell.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    pub fn manhattan(&self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

// ============================================================================
// GRID
// ============================================================================

/// Row-major passability grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Tile>,
}

impl TileGrid {
    /// A fully open grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Floor; width * height],
        }
    }

    /// Parse an ASCII map, one row per line (`.` floor, `#` wall, `+` door,
    /// `s` secret door, space void).
    pub fn parse(map: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = map.lines().filter(|l| !l.is_empty()).collect();
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut tiles = Vec::with_capacity(width * height);

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridError::RaggedRow { row: y, expected: width, found });
            }
            for (x, glyph) in row.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(GridError::UnknownGlyph { glyph, x, y })?;
                tiles.push(tile);
            }
        }

        Ok(Self { width, height, tiles })
    }

    /// Build from a host-supplied walkability matrix (`true` = walkable).
    pub fn from_walkable_rows(rows: &[Vec<bool>]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::RaggedRow { row: y, expected: width, found: row.len() });
            }
            tiles.extend(row.iter().map(|&open| if open { Tile::Floor } else { Tile::Wall }));
        }
        Ok(Self { width, height, tiles })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    fn cell_index(&self, pos: GridPos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, pos: GridPos) -> Option<Tile> {
        self.cell_index(pos).and_then(|i| self.tiles.get(i).copied())
    }

    pub fn set(&mut self, pos: GridPos, tile: Tile) {
        if let Some(i) = self.cell_index(pos) {
            self.tiles[i] = tile;
        }
    }

    /// Out-of-bounds cells are never walkable.
    pub fn is_walkable(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|t| t.is_walkable())
    }

    /// Whether the cell under a world-space point is walkable.
    pub fn is_walkable_at(&self, p: Vec2) -> bool {
        self.is_walkable(GridPos::from_world(p))
    }

    /// Render back to the ASCII form accepted by [`TileGrid::parse`].
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.tiles.chunks(self.width.max(1)) {
            out.extend(row.iter().map(Tile::glyph));
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// LINE OF SIGHT
// ============================================================================

/// Ray-march from `from` to `to`, sampling twice per grid unit.
///
/// A missing or empty grid never grants sight, and this is checked first, so
/// coincident points are visible only when a grid is present. Any sampled cell that is out of bounds or blocks sight blocks the ray.
pub fn line_of_sight(grid: Option<&TileGrid>, from: Vec2, to: Vec2) -> bool {
    let Some(grid) = grid.filter(|g| !g.is_empty()) else {
        return false;
    };

    let delta = to - from;
    let dist = delta.length();
    if dist < 0.0001 {
        return true;
    }

    let steps = (dist * 2.0).ceil() as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let sample = from + delta.scale(t);
        match grid.get(GridPos::from_world(sample)) {
            Some(tile) if !tile.blocks_sight() => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "\
#####
#...#
#.#.#
#...#
#####";

    #[test]
    fn test_parse_room() {
        let grid = TileGrid::parse(ROOM).unwrap();
        assert_eq!(grid.width, 5);
        assert_eq!(grid.height, 5);
        assert!(grid.is_walkable(GridPos::new(1, 1)));
        assert!(!grid.is_walkable(GridPos::new(2, 2)));
        assert!(!grid.is_walkable(GridPos::new(-1, 0)));
        assert_eq!(grid.to_ascii().trim_end(), ROOM);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            TileGrid::parse("...\n..\n"),
            Err(GridError::RaggedRow { row: 1, expected: 3, found: 2 })
        );
        assert_eq!(
            TileGrid::parse("..x\n"),
            Err(GridError::UnknownGlyph { glyph: 'x', x: 2, y: 0 })
        );
    }

    #[test]
    fn test_doors_are_walkable() {
        let grid = TileGrid::parse("+s. #").unwrap();
        assert!(grid.is_walkable(GridPos::new(0, 0)));
        assert!(grid.is_walkable(GridPos::new(1, 0)));
        assert!(grid.is_walkable(GridPos::new(2, 0)));
        assert!(!grid.is_walkable(GridPos::new(3, 0)));
        assert!(!grid.is_walkable(GridPos::new(4, 0)));
    }

    #[test]
    fn test_line_of_sight() {
        let grid = TileGrid::parse(ROOM).unwrap();
        // Pillar at (2,2) blocks the middle row.
        assert!(!line_of_sight(Some(&grid), Vec2::new(1.5, 2.5), Vec2::new(3.5, 2.5)));
        assert!(line_of_sight(Some(&grid), Vec2::new(1.5, 1.5), Vec2::new(3.5, 1.5)));
        assert!(line_of_sight(Some(&grid), Vec2::new(1.5, 1.5), Vec2::new(1.5, 1.5)));
    }

    #[test]
    fn test_line_of_sight_without_grid() {
        let p = Vec2::new(1.0, 1.0);
        assert!(!line_of_sight(None, p, Vec2::new(2.0, 2.0)));
        assert!(!line_of_sight(Some(&TileGrid::default()), p, p));
    }

    #[test]
    fn test_from_walkable_rows() {
        let grid = TileGrid::from_walkable_rows(&[vec![true, false], vec![true, true]]).unwrap();
        assert!(!grid.is_walkable(GridPos::new(1, 0)));
        assert!(grid.is_walkable(GridPos::new(1, 1)));
    }
}
