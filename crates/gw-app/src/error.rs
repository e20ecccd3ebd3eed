//! Error types for the gw-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a single error interface for drivers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Grid(#[from] gw_grid::GridError),

    #[error("Solver error: {0}")]
    Solver(#[from] gw_solver::SolverError),

    #[error("Results error: {0}")]
    Results(#[from] gw_results::ResultsError),

    #[error("Failed to read study file: {path}")]
    StudyFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Study error: {0}")]
    Study(String),

    #[error("Study validation failed: {0}")]
    Validation(String),

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gw-app operations.
pub type AppResult<T> = Result<T, AppError>;
