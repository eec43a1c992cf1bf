//! Configuration management for the Game of Life simulator

pub mod settings;

pub use settings::{
    Settings, GridConfig, InitialState, PatternOffset, PatternConfig, SimulationConfig,
    OutputConfig, BoundaryCondition, OutputFormat, CliOverrides
};
