//! Simulation driving, recording and replay validation

pub mod driver;
pub mod recording;
pub mod validator;

pub use driver::{Simulation, build_initial_grid};
pub use recording::{Recording, RecordingSummary, StabilityAnalysis};
pub use validator::{RecordingValidator, ValidationResult};
