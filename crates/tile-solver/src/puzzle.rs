//! Tile catalog types and the JSON catalog format.
//!
//! A catalog is the fixed, ordered set of tiles the solver arranges. Tiles are
//! described by their four edge markings as manufactured (top, right, bottom,
//! left); rotation is applied at lookup time through [`Orientation`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};

/// Motif printed on one tile edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeMarking {
    GirlTop,
    GirlBottom,
    LadyTop,
    LadyBottom,
    WateringCanLeft,
    WateringCanRight,
    CakeLeft,
    CakeRight,
    /// Mirrored watering can; no tile carries its counterpart
    WateringCanReversed,
    /// Plain edge
    #[serde(rename = "none")]
    Blank,
}

impl EdgeMarking {
    pub const ALL: [EdgeMarking; 10] = [
        EdgeMarking::GirlTop,
        EdgeMarking::GirlBottom,
        EdgeMarking::LadyTop,
        EdgeMarking::LadyBottom,
        EdgeMarking::WateringCanLeft,
        EdgeMarking::WateringCanRight,
        EdgeMarking::CakeLeft,
        EdgeMarking::CakeRight,
        EdgeMarking::WateringCanReversed,
        EdgeMarking::Blank,
    ];

    /// The marking that completes this one, if any
    pub fn complement(self) -> Option<EdgeMarking> {
        match self {
            EdgeMarking::GirlTop => Some(EdgeMarking::GirlBottom),
            EdgeMarking::GirlBottom => Some(EdgeMarking::GirlTop),
            EdgeMarking::LadyTop => Some(EdgeMarking::LadyBottom),
            EdgeMarking::LadyBottom => Some(EdgeMarking::LadyTop),
            EdgeMarking::WateringCanLeft => Some(EdgeMarking::WateringCanRight),
            EdgeMarking::WateringCanRight => Some(EdgeMarking::WateringCanLeft),
            EdgeMarking::CakeLeft => Some(EdgeMarking::CakeRight),
            EdgeMarking::CakeRight => Some(EdgeMarking::CakeLeft),
            EdgeMarking::WateringCanReversed | EdgeMarking::Blank => None,
        }
    }
}

/// Compass side of a grid cell, or canonical side of an unrotated tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Clockwise order, matching the order of [`Tile::edges`]
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Left => 3,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

/// One of the four quarter-turn states of a tile.
///
/// Orientation `k` (offset 0..=3) puts canonical edge `(side + k) mod 4` on
/// compass side `side`. `A` is the tile as manufactured and each later state
/// is one more quarter turn counter-clockwise: `B` brings the canonical right
/// edge to the top, `C` is a half turn, and `D` brings the canonical left
/// edge to the top (a quarter turn clockwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    A,
    B,
    C,
    D,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [Orientation::A, Orientation::B, Orientation::C, Orientation::D];

    pub fn offset(self) -> usize {
        self as usize
    }

    pub fn from_offset(offset: usize) -> Option<Orientation> {
        Self::ALL.get(offset).copied()
    }

    /// The next quarter turn; `D` wraps back to `A`
    pub fn next(self) -> Orientation {
        Self::ALL[(self.offset() + 1) % 4]
    }

    pub fn label(self) -> char {
        match self {
            Orientation::A => 'A',
            Orientation::B => 'B',
            Orientation::C => 'C',
            Orientation::D => 'D',
        }
    }
}

/// A square tile with its edge markings in canonical order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    /// Top, right, bottom, left as manufactured
    pub edges: [EdgeMarking; 4],
}

impl Tile {
    pub fn new(id: u32, edges: [EdgeMarking; 4]) -> Self {
        Self { id, edges }
    }

    /// Marking facing `side` when the tile is turned to `orientation`
    pub fn marking(&self, orientation: Orientation, side: Side) -> EdgeMarking {
        self.edges[(side.index() + orientation.offset()) % 4]
    }
}

/// The ordered set of tiles to arrange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCatalog {
    /// Expected side length; inferred from the tile count when absent
    #[serde(rename = "gridSize", default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<usize>,
    pub tiles: Vec<Tile>,
}

impl TileCatalog {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self {
            grid_size: None,
            tiles,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| SolverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, index: usize) -> &Tile {
        &self.tiles[index]
    }

    /// Validate the catalog and return the side length of its square grid.
    ///
    /// `requested` overrides the catalog's own `gridSize` when given; either
    /// must agree with the square root of the tile count.
    pub fn grid_side(&self, requested: Option<usize>) -> Result<usize> {
        let tiles = self.tiles.len();
        if tiles == 0 {
            return Err(SolverError::EmptyCatalog);
        }

        let side = tiles.isqrt();
        if side * side != tiles {
            return Err(SolverError::NotPerfectSquare { tiles });
        }

        if let Some(grid_size) = requested.or(self.grid_size) {
            if grid_size != side {
                return Err(SolverError::GridSizeMismatch {
                    grid_size,
                    expected: grid_size.saturating_mul(grid_size),
                    tiles,
                });
            }
        }

        for (i, tile) in self.tiles.iter().enumerate() {
            if self.tiles[..i].iter().any(|t| t.id == tile.id) {
                return Err(SolverError::DuplicateTileId { id: tile.id });
            }
        }

        Ok(side)
    }

    /// The nine-tile 3x3 puzzle shipped with the solver
    pub fn builtin() -> Self {
        use EdgeMarking::*;

        let tiles = vec![
            Tile::new(1, [CakeLeft, CakeRight, LadyBottom, LadyTop]),
            Tile::new(2, [GirlTop, CakeLeft, WateringCanRight, WateringCanReversed]),
            Tile::new(3, [LadyBottom, WateringCanRight, CakeRight, GirlTop]),
            Tile::new(4, [LadyTop, Blank, CakeLeft, WateringCanLeft]),
            Tile::new(5, [WateringCanLeft, CakeLeft, WateringCanRight, GirlBottom]),
            Tile::new(6, [WateringCanRight, GirlBottom, LadyBottom, GirlTop]),
            Tile::new(7, [WateringCanReversed, CakeRight, LadyTop, WateringCanLeft]),
            Tile::new(8, [LadyBottom, CakeRight, GirlBottom, WateringCanLeft]),
            Tile::new(9, [LadyTop, GirlTop, GirlBottom, Blank]),
        ];

        Self {
            grid_size: Some(3),
            tiles,
        }
    }
}
