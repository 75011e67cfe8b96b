//! Grid topology and the mutable board the search fills.
//!
//! Positions are 1-indexed and row-major: on a grid of side `n`, position 1
//! is the top-left cell and position `n * n` the bottom-right one.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::puzzle::{Orientation, Side, TileCatalog};

/// Neighbor list of a single cell
pub type Neighbors = SmallVec<[(Side, usize); 4]>;

/// Square grid of a fixed side length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Number of cells, which is also the last position
    pub fn cells(&self) -> usize {
        self.size * self.size
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= 1 && position <= self.cells()
    }

    /// Position across `side` of `position`, if it lies inside the grid
    pub fn neighbor(&self, position: usize, side: Side) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let n = self.size;
        match side {
            Side::Top if position > n => Some(position - n),
            Side::Right if position % n != 0 => Some(position + 1),
            Side::Bottom if position <= n * (n - 1) => Some(position + n),
            Side::Left if (position - 1) % n != 0 => Some(position - 1),
            _ => None,
        }
    }

    /// All geometric neighbors, tagged with the side of `position` they touch
    pub fn neighbors(&self, position: usize) -> Neighbors {
        Side::ALL
            .iter()
            .filter_map(|&side| self.neighbor(position, side).map(|q| (side, q)))
            .collect()
    }

    /// Neighbors that come before `position` in fill order (top and left)
    pub fn preceding_neighbors(&self, position: usize) -> Neighbors {
        self.neighbors(position)
            .into_iter()
            .filter(|&(_, q)| q < position)
            .collect()
    }
}

/// A catalog tile bound to an orientation on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index into the catalog's tile list
    pub tile: usize,
    pub orientation: Orientation,
}

/// Board state owned by a running search.
///
/// Keeps the tile-to-position map injective: a tile sits on at most one cell
/// and a cell holds at most one tile. Breaking that is a logic error and
/// panics.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    slots: Vec<Option<Placement>>,
    /// Position of each catalog tile, `None` while it is available
    tile_positions: Vec<Option<usize>>,
    placed: usize,
}

impl Board {
    pub fn new(grid: Grid, tile_count: usize) -> Self {
        Self {
            grid,
            slots: vec![None; grid.cells()],
            tile_positions: vec![None; tile_count],
            placed: 0,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn get(&self, position: usize) -> Option<Placement> {
        self.slots.get(position.wrapping_sub(1)).copied().flatten()
    }

    pub fn is_available(&self, tile: usize) -> bool {
        self.tile_positions[tile].is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.placed == 0
    }

    pub fn is_full(&self) -> bool {
        self.placed == self.slots.len()
    }

    pub fn place(&mut self, position: usize, tile: usize, orientation: Orientation) {
        assert!(
            self.grid.contains(position),
            "position {position} is outside the {0}x{0} grid",
            self.grid.size
        );
        let slot = &mut self.slots[position - 1];
        assert!(slot.is_none(), "position {position} is already occupied");
        assert!(
            self.tile_positions[tile].is_none(),
            "tile index {tile} is already placed at position {:?}",
            self.tile_positions[tile]
        );

        *slot = Some(Placement { tile, orientation });
        self.tile_positions[tile] = Some(position);
        self.placed += 1;
    }

    pub fn remove(&mut self, position: usize) -> Placement {
        let placement = match self.slots.get_mut(position.wrapping_sub(1)).and_then(Option::take) {
            Some(placement) => placement,
            None => panic!("no tile to remove at position {position}"),
        };
        self.tile_positions[placement.tile] = None;
        self.placed -= 1;
        placement
    }

    /// Copy the current (full) assignment out of the board
    pub fn snapshot(&self, catalog: &TileCatalog) -> Solution {
        let placements = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                Some(p) => PlacedTile {
                    position: i + 1,
                    tile_id: catalog.tile(p.tile).id,
                    orientation: p.orientation,
                },
                None => panic!("snapshot of a partial board: position {} is empty", i + 1),
            })
            .collect();

        Solution {
            grid_size: self.grid.size,
            placements,
        }
    }
}

/// One cell of a finished arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedTile {
    pub position: usize,
    pub tile_id: u32,
    pub orientation: Orientation,
}

/// A complete arrangement, ordered by position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub grid_size: usize,
    pub placements: Vec<PlacedTile>,
}

impl Solution {
    pub fn at(&self, position: usize) -> Option<&PlacedTile> {
        self.placements.get(position.wrapping_sub(1))
    }

    /// `(tile id, orientation label)` pairs in position order
    pub fn cells(&self) -> Vec<(u32, char)> {
        self.placements
            .iter()
            .map(|p| (p.tile_id, p.orientation.label()))
            .collect()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .placements
            .iter()
            .map(|p| p.tile_id.to_string().len())
            .max()
            .unwrap_or(1);

        for row in self.placements.chunks(self.grid_size.max(1)) {
            let cells: Vec<String> = row
                .iter()
                .map(|p| format!("{:>width$}{}", p.tile_id, p.orientation.label()))
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{EdgeMarking, Tile};

    fn blank_catalog(count: u32) -> TileCatalog {
        TileCatalog::new(
            (1..=count)
                .map(|id| Tile::new(id, [EdgeMarking::Blank; 4]))
                .collect(),
        )
    }

    #[test]
    fn test_neighbors_3x3() {
        let grid = Grid::new(3);

        let corner: Vec<_> = grid.neighbors(1).into_iter().collect();
        assert_eq!(corner, vec![(Side::Right, 2), (Side::Bottom, 4)]);

        let center: Vec<_> = grid.neighbors(5).into_iter().collect();
        assert_eq!(
            center,
            vec![
                (Side::Top, 2),
                (Side::Right, 6),
                (Side::Bottom, 8),
                (Side::Left, 4)
            ]
        );

        let edge: Vec<_> = grid.neighbors(6).into_iter().collect();
        assert_eq!(edge, vec![(Side::Top, 3), (Side::Bottom, 9), (Side::Left, 5)]);

        assert!(grid.neighbors(0).is_empty());
        assert!(grid.neighbors(10).is_empty());
    }

    #[test]
    fn test_preceding_neighbors() {
        let grid = Grid::new(3);
        assert!(grid.preceding_neighbors(1).is_empty());
        assert_eq!(grid.preceding_neighbors(3).to_vec(), vec![(Side::Left, 2)]);
        assert_eq!(grid.preceding_neighbors(4).to_vec(), vec![(Side::Top, 1)]);
        assert_eq!(
            grid.preceding_neighbors(9).to_vec(),
            vec![(Side::Top, 6), (Side::Left, 8)]
        );
    }

    #[test]
    fn test_neighbor_symmetry() {
        for size in 1..=5 {
            let grid = Grid::new(size);
            for p in 1..=grid.cells() {
                for (side, q) in grid.neighbors(p) {
                    assert_eq!(grid.neighbor(q, side.opposite()), Some(p));
                    assert!(grid.neighbors(q).iter().any(|&(_, r)| r == p));
                }
            }
        }
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let grid = Grid::new(1);
        assert!(grid.neighbors(1).is_empty());
    }

    #[test]
    fn test_place_and_remove() {
        let mut board = Board::new(Grid::new(2), 4);
        assert!(board.is_empty());

        board.place(1, 2, Orientation::C);
        assert!(!board.is_available(2));
        assert_eq!(
            board.get(1),
            Some(Placement {
                tile: 2,
                orientation: Orientation::C
            })
        );

        let removed = board.remove(1);
        assert_eq!(removed.tile, 2);
        assert!(board.is_available(2));
        assert!(board.is_empty());
        assert_eq!(board.get(1), None);
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_double_assignment_panics() {
        let mut board = Board::new(Grid::new(2), 4);
        board.place(1, 0, Orientation::A);
        board.place(1, 1, Orientation::A);
    }

    #[test]
    #[should_panic(expected = "already placed")]
    fn test_tile_reuse_panics() {
        let mut board = Board::new(Grid::new(2), 4);
        board.place(1, 0, Orientation::A);
        board.place(2, 0, Orientation::B);
    }

    #[test]
    #[should_panic(expected = "no tile to remove")]
    fn test_remove_empty_panics() {
        let mut board = Board::new(Grid::new(2), 4);
        board.remove(3);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let catalog = blank_catalog(4);
        let mut board = Board::new(Grid::new(2), 4);
        for (i, position) in [3, 1, 4, 2].into_iter().enumerate() {
            board.place(position, i, Orientation::ALL[i]);
        }
        assert!(board.is_full());

        let solution = board.snapshot(&catalog);
        for position in 1..=4 {
            board.remove(position);
        }

        assert_eq!(solution.cells(), vec![(2, 'B'), (4, 'D'), (1, 'A'), (3, 'C')]);
        assert_eq!(solution.at(3).unwrap().tile_id, 1);
        assert_eq!(solution.to_string(), "2B 4D\n1A 3C\n");
    }
}
