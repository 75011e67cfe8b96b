//! Backtracking search over tile placements.
//!
//! Positions are filled in increasing order. At each position every available
//! tile is tried in every orientation, in catalog order, and a candidate is
//! kept only if it matches all neighbors filled before it. The search runs on
//! an explicit frame stack so [`Solutions`] can hand out arrangements lazily,
//! one `next()` at a time.
//!
//! Symmetric arrangements are not collapsed: a board and its rotations are
//! reported as distinct solutions.

use std::fmt;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Serialize;

use crate::board::{Board, Grid, Solution};
use crate::error::Result;
use crate::pruning::fits_preceding_neighbors;
use crate::puzzle::{Orientation, TileCatalog};

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Wall-clock bound on the search
    pub timeout: Option<Duration>,
    /// Stop after this many solutions
    pub max_solutions: Option<usize>,
    /// Expected grid side; must match the catalog when set
    pub grid_size: Option<usize>,
}

/// Why a search stopped producing solutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every branch was explored
    Exhausted,
    /// `max_solutions` was reached
    SolutionLimit,
    Timeout,
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::Exhausted => "search exhausted",
            StopReason::SolutionLimit => "solution limit reached",
            StopReason::Timeout => "timed out",
            StopReason::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Counters collected while searching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Positions entered, the first one included
    pub nodes: usize,
    /// `(available tile, orientation)` pairs checked against neighbors
    pub candidates_tested: usize,
    /// Candidates rejected by a neighbor check
    pub candidates_pruned: usize,
    pub solutions_found: usize,
}

/// Summary of a finished search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub stop_reason: StopReason,
    pub stats: SearchStats,
    pub time_elapsed_ms: u64,
}

impl SearchReport {
    pub fn search_exhausted(&self) -> bool {
        self.stop_reason == StopReason::Exhausted
    }
}

/// Result of collecting every solution
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub solutions: Vec<Solution>,
    pub report: SearchReport,
}

/// Receives each solution as soon as it is found.
///
/// Returning `Break` cancels the search that is feeding the emitter.
pub trait SolutionEmitter {
    fn emit(&mut self, solution: &Solution) -> ControlFlow<()>;
}

impl<F: FnMut(&Solution)> SolutionEmitter for F {
    fn emit(&mut self, solution: &Solution) -> ControlFlow<()> {
        self(solution);
        ControlFlow::Continue(())
    }
}

/// One position on the search stack
#[derive(Debug, Clone, Copy)]
struct SearchFrame {
    position: usize,
    /// Next candidate to try, encoded as `tile * 4 + orientation offset`
    next_candidate: usize,
    /// Whether this frame's current candidate sits on the board
    placed: bool,
}

impl SearchFrame {
    fn new(position: usize) -> Self {
        Self {
            position,
            next_candidate: 0,
            placed: false,
        }
    }
}

/// Lazy depth-first enumeration of solutions.
///
/// Owns the board it fills. Whenever the iterator stops, for any reason,
/// the board has been unwound back to empty.
pub struct Solutions<'a> {
    catalog: &'a TileCatalog,
    board: Board,
    frames: Vec<SearchFrame>,
    stats: SearchStats,
    max_solutions: Option<usize>,
    started: Instant,
    deadline: Option<Instant>,
    cancel: Option<Box<dyn Fn() -> bool + 'a>>,
    stop_reason: Option<StopReason>,
}

impl<'a> Solutions<'a> {
    /// Validate `catalog` against `config` and prepare a search.
    ///
    /// Fails with a configuration error before any tile is placed.
    pub fn new(catalog: &'a TileCatalog, config: &SolverConfig) -> Result<Self> {
        let side = catalog.grid_side(config.grid_size)?;
        let grid = Grid::new(side);
        let started = Instant::now();

        debug!(
            "searching {} tiles on a {side}x{side} grid (limit {:?}, timeout {:?})",
            catalog.len(),
            config.max_solutions,
            config.timeout
        );

        let mut search = Self {
            catalog,
            board: Board::new(grid, catalog.len()),
            frames: vec![SearchFrame::new(1)],
            stats: SearchStats {
                nodes: 1,
                ..SearchStats::default()
            },
            max_solutions: config.max_solutions,
            started,
            deadline: config.timeout.map(|t| started + t),
            cancel: None,
            stop_reason: None,
        };

        if config.max_solutions == Some(0) {
            search.unwind(StopReason::SolutionLimit);
        }

        Ok(search)
    }

    /// Install an external cancellation check, polled once per position entered
    pub fn with_cancel(mut self, cancel: impl Fn() -> bool + 'a) -> Self {
        self.cancel = Some(Box::new(cancel));
        self
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// `None` while the search can still produce solutions
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Summary of a stopped search; `None` while it can still produce solutions
    pub fn report(&self) -> Option<SearchReport> {
        self.stop_reason.map(|reason| self.summary(reason))
    }

    /// Cancel the search if it is still running and summarize it
    pub fn finish(mut self) -> SearchReport {
        self.cancel();
        let reason = self.stop_reason.unwrap_or(StopReason::Cancelled);
        self.summary(reason)
    }

    fn summary(&self, stop_reason: StopReason) -> SearchReport {
        SearchReport {
            stop_reason,
            stats: self.stats,
            time_elapsed_ms: self.started.elapsed().as_millis() as u64,
        }
    }

    /// Stop the search now, clearing every placement it made
    pub fn cancel(&mut self) {
        if self.stop_reason.is_none() {
            self.unwind(StopReason::Cancelled);
        }
    }

    fn interruption(&self) -> Option<StopReason> {
        if self.deadline.is_some_and(|deadline| Instant::now() > deadline) {
            return Some(StopReason::Timeout);
        }
        if self.cancel.as_ref().is_some_and(|cancel| cancel()) {
            return Some(StopReason::Cancelled);
        }
        None
    }

    /// Pop every frame, removing its tile from the board, and record why
    fn unwind(&mut self, reason: StopReason) {
        while let Some(frame) = self.frames.pop() {
            if frame.placed {
                self.board.remove(frame.position);
            }
        }
        assert!(self.board.is_empty(), "board not empty after unwinding");

        self.stop_reason = Some(reason);
        let stats = &self.stats;
        match reason {
            StopReason::Timeout | StopReason::Cancelled => warn!(
                "search stopped early ({reason}): {} solutions, {} nodes",
                stats.solutions_found, stats.nodes
            ),
            StopReason::Exhausted | StopReason::SolutionLimit => info!(
                "search finished ({reason}): {} solutions, {} nodes, {} candidates tested",
                stats.solutions_found, stats.nodes, stats.candidates_tested
            ),
        }
    }

    /// First candidate at or after `from` that is available and fits the board
    fn next_fit(&mut self, position: usize, from: usize) -> Option<(usize, usize, Orientation)> {
        let end = self.catalog.len() * 4;
        for candidate in from..end {
            let tile = candidate / 4;
            if !self.board.is_available(tile) {
                continue;
            }
            let orientation = Orientation::ALL[candidate % 4];

            self.stats.candidates_tested += 1;
            if fits_preceding_neighbors(&self.board, self.catalog, position, tile, orientation) {
                return Some((candidate, tile, orientation));
            }
            self.stats.candidates_pruned += 1;
        }
        None
    }
}

impl Iterator for Solutions<'_> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        if self.stop_reason.is_some() {
            return None;
        }
        if let Some(reason) = self.interruption() {
            self.unwind(reason);
            return None;
        }

        let last = self.board.grid().cells();

        loop {
            let Some(&frame) = self.frames.last() else {
                self.unwind(StopReason::Exhausted);
                return None;
            };

            // Take back whatever this position held before trying the next candidate
            if frame.placed {
                self.board.remove(frame.position);
            }

            let Some((candidate, tile, orientation)) =
                self.next_fit(frame.position, frame.next_candidate)
            else {
                self.frames.pop();
                continue;
            };

            self.board.place(frame.position, tile, orientation);
            if let Some(top) = self.frames.last_mut() {
                top.next_candidate = candidate + 1;
                top.placed = true;
            }

            if frame.position == last {
                self.stats.solutions_found += 1;
                let solution = self.board.snapshot(self.catalog);
                debug!(
                    "solution #{} after {} nodes",
                    self.stats.solutions_found, self.stats.nodes
                );

                if self
                    .max_solutions
                    .is_some_and(|max| self.stats.solutions_found >= max)
                {
                    self.unwind(StopReason::SolutionLimit);
                }
                return Some(solution);
            }

            if let Some(reason) = self.interruption() {
                self.unwind(reason);
                return None;
            }

            self.frames.push(SearchFrame::new(frame.position + 1));
            self.stats.nodes += 1;
        }
    }
}

/// Collect every solution allowed by `config`
pub fn find_all(catalog: &TileCatalog, config: &SolverConfig) -> Result<SolverResult> {
    let mut search = Solutions::new(catalog, config)?;
    let solutions: Vec<Solution> = search.by_ref().collect();

    Ok(SolverResult {
        solutions,
        report: search.finish(),
    })
}

/// Return the first solution in enumeration order, if any
pub fn find_first(catalog: &TileCatalog, config: &SolverConfig) -> Result<Option<Solution>> {
    let config = SolverConfig {
        max_solutions: Some(1),
        ..config.clone()
    };
    let mut search = Solutions::new(catalog, &config)?;
    Ok(search.next())
}

/// Stream every solution to `emitter` as it is found
pub fn run(
    catalog: &TileCatalog,
    config: &SolverConfig,
    emitter: &mut dyn SolutionEmitter,
) -> Result<SearchReport> {
    let mut search = Solutions::new(catalog, config)?;
    while let Some(solution) = search.next() {
        if emitter.emit(&solution).is_break() {
            search.cancel();
        }
    }
    Ok(search.finish())
}
