//! Shared application service layer for gwflow.
//!
//! Wraps the loader, solver, and emitter into single calls the CLI (or any
//! other driver) can make: solve one artifact, or run a whole influence study.

pub mod error;
pub mod influence;
pub mod progress;
pub mod solve_service;
pub mod study;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use influence::{InfluenceTable, read_influence_table, run_influence_study, write_influence_table};
pub use progress::{RunProgressEvent, RunStage};
pub use solve_service::{
    SolveRequest, SolveResponse, check_artifact, solve_artifact, solve_artifact_with_progress,
};
pub use study::{InfluenceStudy, MonitoredCell, WellCase, WellSource, load_study, validate_study};
