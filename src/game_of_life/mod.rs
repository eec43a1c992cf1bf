//! Game of Life core functionality

pub mod error;
pub mod grid;
pub mod rules;
pub mod patterns;
pub mod io;

pub use error::{GridError, GridResult};
pub use grid::{Grid, NeighborCounts};
pub use rules::{GameOfLifeRules, transition};
pub use patterns::{PatternLibrary, SeedPattern};
pub use io::{load_grid_from_file, save_grid_to_file, load_pattern_library, write_pattern_files};
