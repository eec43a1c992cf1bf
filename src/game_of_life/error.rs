//! Error types for grid construction and pattern placement

use thiserror::Error;

pub type GridResult<T> = std::result::Result<T, GridError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },

    #[error("row {row} has length {len}, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },

    #[error("cell ({row}, {col}) has value {value}, only 0 and 1 are allowed")]
    NonBinaryCell { row: usize, col: usize, value: u8 },

    #[error("cell buffer holds {len} values, expected {expected}")]
    CellCountMismatch { len: usize, expected: usize },

    #[error("coordinates ({row}, {col}) out of bounds for {rows}x{cols} grid")]
    OutOfBounds { row: usize, col: usize, rows: usize, cols: usize },

    #[error(
        "pattern '{name}' ({pattern_rows}x{pattern_cols}) at offset ({row}, {col}) \
         does not fit in {rows}x{cols} grid"
    )]
    PatternOutOfBounds {
        name: String,
        pattern_rows: usize,
        pattern_cols: usize,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("unknown seed pattern '{0}'")]
    UnknownPattern(String),

    #[error("fill probability {0} must be within [0, 1]")]
    InvalidProbability(f64),
}
