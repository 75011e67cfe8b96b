//! CLI entry point for the tile solver.
//!
//! Usage:
//!   tile-solver solve [catalog.json] [options]
//!   tile-solver pairs [catalog.json]
//!   tile-solver catalog
//!
//! Options for `solve`:
//!   --first                 Stop at the first solution
//!   --max-solutions <n>     Stop after n solutions
//!   --timeout <seconds>     Maximum search time
//!   --grid-size <n>         Expected grid side, checked against the catalog
//!   --format <text|json>    Output format (default: text)
//!
//! Without a catalog file the built-in nine-tile puzzle is used.

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use log::warn;
use serde::Serialize;

use tile_solver::logging::init_logger;
use tile_solver::{
    find_all, pair_report, run, SearchReport, Solution, SolutionEmitter, SolverConfig,
    SolverError, StopReason, TileCatalog,
};

#[derive(Parser)]
#[command(name = "tile-solver")]
#[command(about = "Backtracking solver for edge-matching square tile puzzles")]
#[command(version)]
struct Cli {
    /// Log search progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate arrangements of a tile catalog
    Solve {
        /// Path to a catalog JSON file (built-in puzzle when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Stop at the first solution
        #[arg(long, conflicts_with = "max_solutions")]
        first: bool,

        /// Stop after this many solutions
        #[arg(long)]
        max_solutions: Option<usize>,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Expected grid side length
        #[arg(long)]
        grid_size: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Report which tile edges can ever touch
    Pairs {
        /// Path to a catalog JSON file (built-in puzzle when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Print the built-in catalog as JSON
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON document for `solve --format json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solutions: Vec<Solution>,
    stop_reason: StopReason,
    search_exhausted: bool,
    solutions_found: usize,
    nodes: usize,
    candidates_tested: usize,
    candidates_pruned: usize,
    time_elapsed_ms: u64,
}

impl SolveOutput {
    fn new(solutions: Vec<Solution>, report: &SearchReport) -> Self {
        Self {
            solutions,
            stop_reason: report.stop_reason,
            search_exhausted: report.search_exhausted(),
            solutions_found: report.stats.solutions_found,
            nodes: report.stats.nodes,
            candidates_tested: report.stats.candidates_tested,
            candidates_pruned: report.stats.candidates_pruned,
            time_elapsed_ms: report.time_elapsed_ms,
        }
    }
}

/// Prints each solution as a grid as soon as it is found.
///
/// The first write failure is kept and stops the search.
struct TextEmitter<W: Write> {
    out: W,
    count: usize,
    error: Option<io::Error>,
}

impl<W: Write> TextEmitter<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            count: 0,
            error: None,
        }
    }
}

impl<W: Write> SolutionEmitter for TextEmitter<W> {
    fn emit(&mut self, solution: &Solution) -> ControlFlow<()> {
        self.count += 1;
        match writeln!(self.out, "Solution {}:\n{}", self.count, solution) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                self.error = Some(e);
                ControlFlow::Break(())
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match execute(cli.command) {
        Ok(code) => code,
        Err(e) if e.is_configuration() => {
            eprintln!("Invalid catalog: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn load_catalog(file: Option<PathBuf>) -> Result<TileCatalog, SolverError> {
    match file {
        Some(path) => TileCatalog::load(&path),
        None => Ok(TileCatalog::builtin()),
    }
}

fn execute(command: Commands) -> Result<ExitCode, SolverError> {
    match command {
        Commands::Solve {
            file,
            first,
            max_solutions,
            timeout,
            grid_size,
            format,
        } => {
            let catalog = load_catalog(file)?;
            let config = SolverConfig {
                timeout: timeout.map(Duration::from_secs),
                max_solutions: if first { Some(1) } else { max_solutions },
                grid_size,
            };

            let report = match format {
                OutputFormat::Text => {
                    let mut emitter = TextEmitter::new(io::stdout().lock());
                    let report = run(&catalog, &config, &mut emitter)?;
                    if let Some(e) = emitter.error.take() {
                        warn!("stopped after {} solution(s): {e}", emitter.count);
                        return Ok(ExitCode::FAILURE);
                    }
                    drop(emitter);
                    println!(
                        "{} solution(s), {} ({} nodes, {} ms)",
                        report.stats.solutions_found,
                        report.stop_reason,
                        report.stats.nodes,
                        report.time_elapsed_ms
                    );
                    report
                }
                OutputFormat::Json => {
                    let result = find_all(&catalog, &config)?;
                    let output = SolveOutput::new(result.solutions, &result.report);
                    println!("{}", serde_json::to_string_pretty(&output)?);
                    result.report
                }
            };

            if report.stats.solutions_found > 0 {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }

        Commands::Pairs { file } => {
            let catalog = load_catalog(file)?;
            catalog.grid_side(None)?;
            let report = pair_report(&catalog);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Catalog => {
            println!("{}", serde_json::to_string_pretty(&TileCatalog::builtin())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer that accepts a fixed number of writes, then reports a closed pipe
    struct ClosingWriter {
        writes_left: usize,
    }

    impl Write for ClosingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.writes_left == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.writes_left -= 1;
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_text_emitter_writes_grids() {
        let mut emitter = TextEmitter::new(Vec::new());
        let catalog = TileCatalog::builtin();

        let report = run(&catalog, &SolverConfig::default(), &mut emitter).unwrap();
        assert_eq!(report.stop_reason, StopReason::Exhausted);
        assert!(emitter.error.is_none());

        let text = String::from_utf8(emitter.out).unwrap();
        assert!(text.starts_with("Solution 1:\n4C 2D 6C\n8A 1B 7D\n9B 3A 5B\n"));
        assert!(text.contains("Solution 4:"));
    }

    #[test]
    fn test_text_emitter_stops_search_on_write_error() {
        let mut emitter = TextEmitter::new(ClosingWriter { writes_left: 0 });
        let catalog = TileCatalog::builtin();

        let report = run(&catalog, &SolverConfig::default(), &mut emitter).unwrap();
        assert_eq!(report.stop_reason, StopReason::Cancelled);
        assert_eq!(report.stats.solutions_found, 1);
        assert_eq!(emitter.count, 1);
        assert_eq!(
            emitter.error.map(|e| e.kind()),
            Some(io::ErrorKind::BrokenPipe)
        );
    }
}
