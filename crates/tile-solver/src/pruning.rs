//! Edge compatibility rules used to prune the search.
//!
//! A candidate placement is rejected as soon as one already-placed neighbor
//! disagrees with it, so no branch ever descends past an incompatible edge.

use crate::board::{Board, Grid, Solution};
use crate::puzzle::{EdgeMarking, Orientation, TileCatalog};

/// Whether two touching edges may sit next to each other.
///
/// Symmetric: only the designated complementary pairs match, and
/// [`EdgeMarking::Blank`] / [`EdgeMarking::WateringCanReversed`] match
/// nothing.
pub fn compatible(a: EdgeMarking, b: EdgeMarking) -> bool {
    a.complement() == Some(b)
}

/// Check a candidate against every neighbor filled before `position`
pub fn fits_preceding_neighbors(
    board: &Board,
    catalog: &TileCatalog,
    position: usize,
    tile: usize,
    orientation: Orientation,
) -> bool {
    let candidate = catalog.tile(tile);

    board
        .grid()
        .preceding_neighbors(position)
        .into_iter()
        .all(|(side, neighbor_position)| {
            let neighbor = match board.get(neighbor_position) {
                Some(placement) => placement,
                None => panic!(
                    "position {neighbor_position} should be filled before position {position}"
                ),
            };
            let facing = catalog
                .tile(neighbor.tile)
                .marking(neighbor.orientation, side.opposite());
            compatible(candidate.marking(orientation, side), facing)
        })
}

/// Check that a solution is a complete, consistent arrangement of `catalog`
pub fn verify_solution(catalog: &TileCatalog, solution: &Solution) -> bool {
    if catalog.is_empty()
        || solution.grid_size.checked_mul(solution.grid_size) != Some(catalog.len())
        || solution.placements.len() != catalog.len()
    {
        return false;
    }
    let grid = Grid::new(solution.grid_size);

    let mut used = vec![false; catalog.len()];
    let mut tiles = Vec::with_capacity(solution.placements.len());

    for (i, placed) in solution.placements.iter().enumerate() {
        if placed.position != i + 1 {
            return false;
        }
        let index = match catalog.tiles.iter().position(|t| t.id == placed.tile_id) {
            Some(index) => index,
            None => return false,
        };
        if used[index] {
            return false;
        }
        used[index] = true;
        tiles.push((catalog.tile(index), placed.orientation));
    }

    for position in 1..=grid.cells() {
        let (tile, orientation) = tiles[position - 1];
        for (side, neighbor_position) in grid.neighbors(position) {
            let (neighbor, neighbor_orientation) = tiles[neighbor_position - 1];
            if !compatible(
                tile.marking(orientation, side),
                neighbor.marking(neighbor_orientation, side.opposite()),
            ) {
                return false;
            }
        }
    }

    true
}
