//! Error types for grid construction and cell access

use thiserror::Error;

/// Errors raised by the simulation engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("Coordinates ({row}, {col}) out of bounds for {rows}x{cols} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Row {row} has length {len}, expected {expected}")]
    RaggedRows { row: usize, len: usize, expected: usize },
    #[error("Density must be within [0, 1], got {0}")]
    InvalidDensity(f64),
}
