//! Error types for solver operations.

use gw_core::GwError;
use gw_grid::GridError;
use thiserror::Error;

/// Errors that can occur while solving a grid.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Zero conductance sum at interior cell (row {row}, col {col})")]
    DivisionByZero { row: usize, col: usize },

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Numeric error: {0}")]
    Core(#[from] GwError),
}

pub type SolverResult<T> = Result<T, SolverError>;
