//! Solver for edge-matching square tile puzzles.
//!
//! Each tile edge carries a marking, and two tiles may touch only where their
//! edges form a complementary pair. The solver places every catalog tile on
//! an N x N grid, in any of four orientations, and enumerates every valid
//! arrangement by depth-first backtracking.

pub mod analysis;
pub mod board;
pub mod error;
pub mod logging;
pub mod pruning;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use analysis::{pair_report, PairReport};
pub use board::{Board, Grid, PlacedTile, Solution};
pub use error::{Result, SolverError};
pub use pruning::{compatible, verify_solution};
pub use puzzle::{EdgeMarking, Orientation, Side, Tile, TileCatalog};
pub use solver::{
    find_all, find_first, run, SearchReport, SearchStats, SolutionEmitter, Solutions,
    SolverConfig, SolverResult, StopReason,
};
