//! gw-grid: structured grid input format, loader, and validation.
//!
//! The input artifact is a line-ordered text file. Its layout is declared
//! once in [`schema::INPUT_SCHEMA`] and the loader walks that table, so every
//! diagnostic names the field it was reading.

pub mod loader;
pub mod model;
pub mod schema;
pub mod validate;

pub use loader::{load_path, parse_bytes, parse_str};
pub use model::{BoundaryFlag, BoundarySide, Boundaries, GridModel, GridSummary, Spacing};
pub use schema::{FieldId, FieldSpec, INPUT_SCHEMA, Kind, Shape};
pub use validate::validate_model;

use std::path::PathBuf;

pub type GridResult<T> = Result<T, GridError>;

#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error("Malformed input at line {line}: field '{field}' expected {expected}, found {found}")]
    MalformedInput {
        line: usize,
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("Failed to read input artifact: {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Core error: {0}")]
    Core(#[from] gw_core::GwError),
}

impl GridError {
    pub fn malformed(
        line: usize,
        field: &'static str,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        GridError::MalformedInput {
            line,
            field,
            expected: expected.into(),
            found: found.into(),
        }
    }
}
