//! Game of Life rules implementation

use super::Grid;
use rayon::prelude::*;

/// Neighbor counts that bring a dead cell to life
pub const BIRTH: &[u8] = &[3];

/// Neighbor counts that keep a live cell alive
pub const SURVIVAL: &[u8] = &[2, 3];

/// Largest possible count, with every Moore neighbor alive
pub const MAX_NEIGHBORS: u8 = 8;

/// Game of Life rules engine
pub struct GameOfLifeRules;

impl GameOfLifeRules {
    /// Apply Game of Life rules to evolve the grid one generation forward
    ///
    /// Every cell reads its neighbor count from `current`, which is never
    /// modified, so rows are computed in parallel.
    pub fn evolve(current: &Grid) -> Grid {
        let cols = current.cols();
        let next_cells: Vec<u8> = (0..current.rows())
            .into_par_iter()
            .flat_map_iter(|row| {
                (0..cols).map(move |col| {
                    Self::next_state(current.get(row, col), current.count_neighbors(row, col))
                })
            })
            .collect();

        current.successor(next_cells)
    }

    /// Single-threaded evolution from a precomputed neighbor snapshot
    pub fn evolve_sequential(current: &Grid) -> Grid {
        let counts = current.neighbor_counts();
        let next_cells: Vec<u8> = current
            .cells()
            .iter()
            .zip(counts.as_slice())
            .map(|(&cell, &neighbors)| Self::next_state(cell, neighbors))
            .collect();

        current.successor(next_cells)
    }

    /// Evolve the grid for multiple generations
    pub fn evolve_generations(mut grid: Grid, generations: usize) -> Grid {
        for _ in 0..generations {
            grid = Self::evolve(&grid);
        }
        grid
    }

    /// Check if a cell should be alive in the next generation given its current state and neighbor count
    pub fn should_be_alive(current_state: u8, neighbor_count: u8) -> bool {
        debug_assert!(Self::is_valid_neighbor_count(neighbor_count));
        let table = if current_state == 1 { SURVIVAL } else { BIRTH };
        table.contains(&neighbor_count)
    }

    /// Next cell value (0 or 1) for a cell value and its neighbor count
    #[inline]
    pub fn next_state(current_state: u8, neighbor_count: u8) -> u8 {
        u8::from(Self::should_be_alive(current_state, neighbor_count))
    }

    /// Check whether `successor` is exactly one generation after `predecessor`
    pub fn is_successor(predecessor: &Grid, successor: &Grid) -> bool {
        predecessor.rows() == successor.rows()
            && predecessor.cols() == successor.cols()
            && Self::evolve(predecessor).cells() == successor.cells()
    }

    /// Check if a neighbor count is valid (0-8)
    pub fn is_valid_neighbor_count(count: u8) -> bool {
        count <= MAX_NEIGHBORS
    }
}

/// Compute the next generation of `current`
pub fn transition(current: &Grid) -> Grid {
    GameOfLifeRules::evolve(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundaryCondition;
    use crate::game_of_life::PatternLibrary;
    use proptest::prelude::*;

    fn grid(rows: Vec<Vec<u8>>) -> Grid {
        Grid::from_rows(rows, BoundaryCondition::Wrap).unwrap()
    }

    #[test]
    fn test_still_life_block() {
        let grid = grid(vec![
            vec![0, 0, 0, 0],
            vec![0, 1, 1, 0],
            vec![0, 1, 1, 0],
            vec![0, 0, 0, 0],
        ]);
        let evolved = transition(&grid);

        assert_eq!(evolved, grid);
    }

    #[test]
    fn test_oscillator_blinker() {
        let horizontal = Grid::from_rows(
            vec![
                vec![0, 0, 0],
                vec![1, 1, 1],
                vec![0, 0, 0],
            ],
            BoundaryCondition::Dead,
        )
        .unwrap();
        let evolved = GameOfLifeRules::evolve(&horizontal);

        let vertical = Grid::from_rows(
            vec![
                vec![0, 1, 0],
                vec![0, 1, 0],
                vec![0, 1, 0],
            ],
            BoundaryCondition::Dead,
        )
        .unwrap();

        assert_eq!(evolved, vertical);
        assert_eq!(GameOfLifeRules::evolve(&evolved), horizontal);
    }

    #[test]
    fn test_toad_has_period_two() {
        let library = PatternLibrary::standard();
        let toad = library.get("toad").unwrap();
        let start = Grid::with_pattern(10, 10, toad, (3, 3), BoundaryCondition::Wrap).unwrap();

        let once = transition(&start);
        assert_ne!(once, start);
        assert_eq!(transition(&once), start);
    }

    #[test]
    fn test_glider_moves_diagonally() {
        let library = PatternLibrary::standard();
        let glider = library.get("glider").unwrap();
        let start = Grid::with_pattern(12, 12, glider, (4, 4), BoundaryCondition::Wrap).unwrap();

        let after_four = GameOfLifeRules::evolve_generations(start.clone(), 4);
        assert_eq!(after_four, start.shifted(1, 1));

        for generations in 1..4 {
            let partial = GameOfLifeRules::evolve_generations(start.clone(), generations);
            assert_ne!(partial, start.shifted(1, 1));
        }
    }

    #[test]
    fn test_degenerate_strip() {
        // A dead cell in a 1x3 strip sees the live cell three times
        let strip = grid(vec![vec![1, 0, 0]]);
        let next = transition(&strip);
        assert_eq!(next.to_rows(), vec![vec![1, 1, 1]]);
        assert!(transition(&next).is_empty());

        let single = grid(vec![vec![1]]);
        assert!(transition(&single).is_empty());
    }

    #[test]
    fn test_wrap_versus_dead_edges() {
        // A vertical blinker on the left edge reaches across to the right edge only when wrapping
        let rows = vec![
            vec![0, 0, 0, 0, 0],
            vec![1, 0, 0, 0, 0],
            vec![1, 0, 0, 0, 0],
            vec![1, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
        ];
        let wrapped = transition(&Grid::from_rows(rows.clone(), BoundaryCondition::Wrap).unwrap());
        let bounded = transition(&Grid::from_rows(rows, BoundaryCondition::Dead).unwrap());

        assert_eq!(wrapped.living_cells(), vec![(2, 0), (2, 1), (2, 4)]);
        assert_eq!(bounded.living_cells(), vec![(2, 0), (2, 1)]);
    }

    #[test]
    fn test_empty_grid_stays_empty() {
        let empty = Grid::new(7, 9, BoundaryCondition::Wrap).unwrap();
        let evolved = GameOfLifeRules::evolve_generations(empty.clone(), 25);
        assert_eq!(evolved, empty);
    }

    #[test]
    fn test_rule_logic() {
        assert!(GameOfLifeRules::should_be_alive(1, 2));
        assert!(GameOfLifeRules::should_be_alive(1, 3));
        assert!(GameOfLifeRules::should_be_alive(0, 3));
        assert!(!GameOfLifeRules::should_be_alive(1, 1));
        assert!(!GameOfLifeRules::should_be_alive(1, 4));
        assert!(!GameOfLifeRules::should_be_alive(0, 2));
        assert!(!GameOfLifeRules::should_be_alive(0, 8));
        assert_eq!(GameOfLifeRules::next_state(0, 3), 1);
        assert_eq!(GameOfLifeRules::next_state(1, 0), 0);

        // Every count outside the tables is death, or staying dead
        for count in 0..=MAX_NEIGHBORS {
            assert_eq!(GameOfLifeRules::should_be_alive(0, count), BIRTH.contains(&count));
            assert_eq!(GameOfLifeRules::should_be_alive(1, count), SURVIVAL.contains(&count));
        }
    }

    #[test]
    fn test_is_successor() {
        let predecessor = grid(vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 0, 0, 0],
        ]);
        let next = transition(&predecessor);

        assert!(GameOfLifeRules::is_successor(&predecessor, &next));
        assert!(!GameOfLifeRules::is_successor(&predecessor, &predecessor));
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1usize..12, 1usize..12, any::<bool>()).prop_flat_map(|(rows, cols, wrap)| {
            let boundary = if wrap { BoundaryCondition::Wrap } else { BoundaryCondition::Dead };
            prop::collection::vec(0u8..=1, rows * cols).prop_map(move |cells| {
                Grid::from_cells(rows, cols, cells, boundary).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_output_is_binary_and_same_shape(grid in arb_grid()) {
            let next = transition(&grid);
            prop_assert_eq!(next.rows(), grid.rows());
            prop_assert_eq!(next.cols(), grid.cols());
            prop_assert_eq!(next.boundary_condition(), grid.boundary_condition());
            prop_assert!(next.cells().iter().all(|&v| v <= 1));
        }

        #[test]
        fn prop_neighbor_counts_in_range(grid in arb_grid()) {
            let counts = grid.neighbor_counts();
            prop_assert!(counts.as_slice().iter().all(|&c| GameOfLifeRules::is_valid_neighbor_count(c)));
        }

        #[test]
        fn prop_deterministic_and_parallel_matches_sequential(grid in arb_grid()) {
            let first = transition(&grid);
            let second = transition(&grid.clone());
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, &GameOfLifeRules::evolve_sequential(&grid));
        }
    }
}
