//! Simulation driver: owns the current generation and advances it on a budget

use super::Recording;
use crate::config::{GridConfig, InitialState, Settings};
use crate::game_of_life::{transition, Grid, GridResult, PatternLibrary};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use tracing::{debug, info};

/// Build the first generation described by the grid and initial-state settings
///
/// Pattern placement is checked here, before any step runs.
pub fn build_initial_grid(
    grid: &GridConfig,
    initial: &InitialState,
    library: &PatternLibrary,
) -> GridResult<Grid> {
    match initial {
        InitialState::Empty => Grid::new(grid.rows, grid.cols, grid.boundary_condition),
        InitialState::Random { probability, seed } => {
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(*seed),
                None => ChaCha8Rng::from_entropy(),
            };
            Grid::random(grid.rows, grid.cols, *probability, grid.boundary_condition, &mut rng)
        }
        InitialState::Pattern { name, offset } => {
            let pattern = library.require(name)?;
            Grid::with_pattern(
                grid.rows,
                grid.cols,
                pattern,
                (offset.row, offset.col),
                grid.boundary_condition,
            )
        }
    }
}

/// Advances a grid one generation at a time until its iteration budget runs out
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
    generation: usize,
    iterations: usize,
}

impl Simulation {
    /// Create a simulation that will run `iterations` generations from `initial`
    pub fn new(initial: Grid, iterations: usize) -> Self {
        Self {
            grid: initial,
            generation: 0,
            iterations,
        }
    }

    /// Create a simulation from settings, seeding the grid from the library
    pub fn from_settings(settings: &Settings, library: &PatternLibrary) -> GridResult<Self> {
        let initial = build_initial_grid(&settings.grid, &settings.initial, library)?;
        Ok(Self::new(initial, settings.simulation.iterations))
    }

    /// The current generation's grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of transitions applied so far
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn remaining(&self) -> usize {
        self.iterations - self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.generation >= self.iterations
    }

    /// Apply one transition, or return `None` once the budget is spent
    pub fn step(&mut self) -> Option<&Grid> {
        if self.is_finished() {
            return None;
        }

        self.grid = transition(&self.grid);
        self.generation += 1;
        debug!(
            generation = self.generation,
            living = self.grid.living_count(),
            "advanced generation"
        );
        Some(&self.grid)
    }

    /// Run the remaining budget, handing every new generation to `observer`
    pub fn run<F>(&mut self, mut observer: F) -> &Grid
    where
        F: FnMut(usize, &Grid),
    {
        info!(
            rows = self.grid.rows(),
            cols = self.grid.cols(),
            iterations = self.remaining(),
            "starting simulation"
        );
        let start = Instant::now();

        while self.step().is_some() {
            observer(self.generation, &self.grid);
        }

        info!(
            generation = self.generation,
            living = self.grid.living_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "simulation finished"
        );
        &self.grid
    }

    /// Run the remaining budget and keep every generation, the current one first
    pub fn record(mut self) -> Recording {
        let start = Instant::now();
        let mut generations = Vec::with_capacity(self.remaining() + 1);
        generations.push(self.grid.clone());

        self.run(|_, grid| generations.push(grid.clone()));

        Recording::new(generations, start.elapsed())
    }
}

impl Iterator for Simulation {
    type Item = Grid;

    fn next(&mut self) -> Option<Grid> {
        self.step().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for Simulation {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryCondition, PatternOffset};
    use crate::game_of_life::GridError;

    fn grid_config(rows: usize, cols: usize) -> GridConfig {
        GridConfig { rows, cols, boundary_condition: BoundaryCondition::Wrap }
    }

    #[test]
    fn test_step_respects_budget() {
        let library = PatternLibrary::standard();
        let toad = library.get("toad").unwrap();
        let start = Grid::with_pattern(8, 8, toad, (2, 1), BoundaryCondition::Wrap).unwrap();

        let mut simulation = Simulation::new(start.clone(), 2);
        assert_eq!(simulation.remaining(), 2);
        assert!(simulation.step().is_some());
        assert!(simulation.step().is_some());
        assert!(simulation.step().is_none());
        assert!(simulation.is_finished());
        assert_eq!(simulation.generation(), 2);
        assert_eq!(simulation.grid(), &start);
    }

    #[test]
    fn test_run_feeds_each_output_forward() {
        let library = PatternLibrary::standard();
        let glider = library.get("glider").unwrap();
        let start = Grid::with_pattern(10, 10, glider, (1, 1), BoundaryCondition::Wrap).unwrap();

        let mut seen = Vec::new();
        let mut simulation = Simulation::new(start.clone(), 8);
        let last = simulation.run(|generation, grid| seen.push((generation, grid.clone()))).clone();

        assert_eq!(seen.len(), 8);
        assert_eq!(seen.iter().map(|(g, _)| *g).collect::<Vec<_>>(), (1..=8).collect::<Vec<_>>());
        assert_eq!(seen[0].1, transition(&start));
        for pair in seen.windows(2) {
            assert_eq!(pair[1].1, transition(&pair[0].1));
        }
        assert_eq!(last, start.shifted(2, 2));
    }

    #[test]
    fn test_iterator_yields_budgeted_generations() {
        let empty = Grid::new(4, 4, BoundaryCondition::Wrap).unwrap();
        let simulation = Simulation::new(empty.clone(), 5);
        assert_eq!(simulation.len(), 5);

        let generations: Vec<Grid> = simulation.collect();
        assert_eq!(generations.len(), 5);
        assert!(generations.iter().all(|g| *g == empty));
    }

    #[test]
    fn test_record_includes_initial_state() {
        let empty = Grid::new(3, 3, BoundaryCondition::Wrap).unwrap();
        let recording = Simulation::new(empty.clone(), 3).record();
        assert_eq!(recording.generations.len(), 4);
        assert_eq!(recording.initial(), &empty);
    }

    #[test]
    fn test_build_initial_grid_modes() {
        let library = PatternLibrary::standard();

        let empty = build_initial_grid(&grid_config(5, 6), &InitialState::Empty, &library).unwrap();
        assert!(empty.is_empty());
        assert_eq!((empty.rows(), empty.cols()), (5, 6));

        let random = InitialState::Random { probability: 0.5, seed: Some(7) };
        let a = build_initial_grid(&grid_config(20, 20), &random, &library).unwrap();
        let b = build_initial_grid(&grid_config(20, 20), &random, &library).unwrap();
        assert_eq!(a, b);

        let gun = InitialState::Pattern {
            name: "glider_gun".to_string(),
            offset: PatternOffset { row: 50, col: 10 },
        };
        let seeded = build_initial_grid(&grid_config(128, 128), &gun, &library).unwrap();
        assert_eq!(seeded.living_count(), 43);
        assert!(seeded.is_alive(51, 36));
    }

    #[test]
    fn test_placement_errors_surface_before_running() {
        let library = PatternLibrary::standard();

        let too_far = InitialState::Pattern {
            name: "glider_gun".to_string(),
            offset: PatternOffset { row: 0, col: 100 },
        };
        let err = build_initial_grid(&grid_config(128, 128), &too_far, &library).unwrap_err();
        assert!(matches!(err, GridError::PatternOutOfBounds { .. }));

        let unknown = InitialState::Pattern {
            name: "pulsar".to_string(),
            offset: PatternOffset::default(),
        };
        let err = build_initial_grid(&grid_config(16, 16), &unknown, &library).unwrap_err();
        assert_eq!(err, GridError::UnknownPattern("pulsar".to_string()));
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.grid = grid_config(12, 12);
        settings.initial = InitialState::Pattern {
            name: "beacon".to_string(),
            offset: PatternOffset { row: 4, col: 4 },
        };
        settings.simulation.iterations = 6;

        let simulation = Simulation::from_settings(&settings, &PatternLibrary::standard()).unwrap();
        assert_eq!(simulation.iterations(), 6);
        assert_eq!(simulation.grid().living_count(), 8);
    }
}
