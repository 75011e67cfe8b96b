//! Error types for catalog loading and solver configuration.
//!
//! Every variant is raised before the search starts. A search that finds no
//! arrangement is not an error, and broken board invariants panic instead of
//! surfacing here.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("tile catalog is empty")]
    EmptyCatalog,

    #[error("tile catalog holds {tiles} tiles, which is not a perfect square")]
    NotPerfectSquare { tiles: usize },

    #[error("grid size {grid_size} needs {expected} tiles but the catalog holds {tiles}")]
    GridSizeMismatch {
        grid_size: usize,
        expected: usize,
        tiles: usize,
    },

    #[error("tile id {id} appears more than once in the catalog")]
    DuplicateTileId { id: u32 },

    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SolverError {
    /// Whether the error comes from a bad catalog/grid combination rather than from reading input
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SolverError::EmptyCatalog
                | SolverError::NotPerfectSquare { .. }
                | SolverError::GridSizeMismatch { .. }
                | SolverError::DuplicateTileId { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
