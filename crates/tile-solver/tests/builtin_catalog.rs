//! End-to-end searches over the built-in nine-tile puzzle.

use std::collections::HashSet;

use tile_solver::{
    find_all, find_first, pair_report, verify_solution, Grid, Orientation, SearchStats, Side,
    Solutions, SolverConfig, StopReason, TileCatalog,
};

#[test]
fn finds_the_four_board_rotations() {
    let catalog = TileCatalog::builtin();
    let result = find_all(&catalog, &SolverConfig::default()).unwrap();

    let found: Vec<_> = result.solutions.iter().map(|s| s.cells()).collect();
    assert_eq!(
        found,
        vec![
            vec![(4, 'C'), (2, 'D'), (6, 'C'), (8, 'A'), (1, 'B'), (7, 'D'), (9, 'B'), (3, 'A'), (5, 'B')],
            vec![(5, 'D'), (3, 'C'), (9, 'D'), (7, 'B'), (1, 'D'), (8, 'C'), (6, 'A'), (2, 'B'), (4, 'A')],
            vec![(6, 'D'), (7, 'A'), (5, 'C'), (2, 'A'), (1, 'C'), (3, 'B'), (4, 'D'), (8, 'B'), (9, 'C')],
            vec![(9, 'A'), (8, 'D'), (4, 'B'), (3, 'D'), (1, 'A'), (2, 'C'), (5, 'A'), (7, 'C'), (6, 'B')],
        ]
    );
    assert_eq!(result.report.stop_reason, StopReason::Exhausted);
    assert_eq!(
        result.report.stats,
        SearchStats {
            nodes: 1618,
            candidates_tested: 33452,
            candidates_pruned: 31831,
            solutions_found: 4,
        }
    );
}

#[test]
fn every_solution_is_a_valid_arrangement() {
    let catalog = TileCatalog::builtin();
    let grid = Grid::new(3);

    for solution in Solutions::new(&catalog, &SolverConfig::default()).unwrap() {
        assert!(verify_solution(&catalog, &solution));

        let positions: Vec<_> = solution.placements.iter().map(|p| p.position).collect();
        assert_eq!(positions, (1..=9).collect::<Vec<_>>());

        let ids: HashSet<_> = solution.placements.iter().map(|p| p.tile_id).collect();
        assert_eq!(ids.len(), 9);

        // Right and bottom neighbors cover every adjacent pair exactly once
        for placed in &solution.placements {
            let tile = catalog.tiles.iter().find(|t| t.id == placed.tile_id).unwrap();
            for side in [Side::Right, Side::Bottom] {
                if let Some(q) = grid.neighbor(placed.position, side) {
                    let other = solution.at(q).unwrap();
                    let other_tile = catalog.tiles.iter().find(|t| t.id == other.tile_id).unwrap();
                    assert!(tile_solver::compatible(
                        tile.marking(placed.orientation, side),
                        other_tile.marking(other.orientation, side.opposite()),
                    ));
                }
            }
        }
    }
}

#[test]
fn center_tile_is_fixed_and_turns_once_per_solution() {
    let catalog = TileCatalog::builtin();
    let result = find_all(&catalog, &SolverConfig::default()).unwrap();

    let centers: Vec<_> = result.solutions.iter().map(|s| *s.at(5).unwrap()).collect();
    assert!(centers.iter().all(|c| c.tile_id == 1));

    let turns: HashSet<Orientation> = centers.iter().map(|c| c.orientation).collect();
    assert_eq!(turns.len(), 4);
}

#[test]
fn first_solution_matches_enumeration_order() {
    let catalog = TileCatalog::builtin();
    let first = find_first(&catalog, &SolverConfig::default()).unwrap().unwrap();
    let all = find_all(&catalog, &SolverConfig::default()).unwrap();
    assert_eq!(first, all.solutions[0]);
}

#[test]
fn catalog_survives_json_round_trip() {
    let catalog = TileCatalog::builtin();
    let json = serde_json::to_string_pretty(&catalog).unwrap();
    assert!(json.contains("\"gridSize\": 3"));
    assert!(json.contains("watering-can-reversed"));

    let reloaded = TileCatalog::from_json_str(&json).unwrap();
    assert_eq!(reloaded, catalog);

    let result = find_all(&reloaded, &SolverConfig::default()).unwrap();
    assert_eq!(result.solutions.len(), 4);
}

#[test]
fn solution_serializes_in_position_order() {
    let catalog = TileCatalog::builtin();
    let first = find_first(&catalog, &SolverConfig::default()).unwrap().unwrap();

    let value = serde_json::to_value(&first).unwrap();
    assert_eq!(value["gridSize"], 3);
    assert_eq!(value["placements"][0]["position"], 1);
    assert_eq!(value["placements"][0]["tileId"], 4);
    assert_eq!(value["placements"][0]["orientation"], "C");
}

#[test]
fn pair_report_totals() {
    let report = pair_report(&TileCatalog::builtin());
    let totals: Vec<_> = report.tiles.iter().map(|t| t.total).collect();

    assert_eq!(report.pairs_examined, 72);
    assert_eq!(totals, vec![12, 12, 16, 12, 14, 14, 12, 16, 10]);
}

#[test]
fn solution_renders_as_grid() {
    let catalog = TileCatalog::builtin();
    let first = find_first(&catalog, &SolverConfig::default()).unwrap().unwrap();
    assert_eq!(first.to_string(), "4C 2D 6C\n8A 1B 7D\n9B 3A 5B\n");
}
