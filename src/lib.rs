//! Conway's Game of Life Simulator
//!
//! This library evolves a toroidal grid of live and dead cells generation by
//! generation, seeds it from a library of named patterns or a random fill, and
//! records runs for playback and verification.

pub mod config;
pub mod game_of_life;
pub mod simulation;
pub mod utils;

pub use config::Settings;
pub use game_of_life::{transition, Grid, PatternLibrary};
pub use simulation::{Recording, Simulation};

use anyhow::{Context, Result};

/// Main entry point: build the configured simulation and record the whole run
pub fn run_simulation(settings: &Settings) -> Result<Recording> {
    settings.validate()?;

    let library = game_of_life::load_pattern_library(settings.patterns.directory.as_ref())?;
    let simulation = Simulation::from_settings(settings, &library)
        .context("Failed to build initial grid")?;

    Ok(simulation.record().with_frame_rate(settings.output.frames_per_second))
}
