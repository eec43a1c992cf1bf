//! Presentation helpers: formatting, terminal animation, export

pub mod display;

pub use display::{ColorOutput, GridFormatter, ProgressIndicator, RecordingFormatter, TerminalAnimation};
