use thiserror::Error;

pub type GwResult<T> = Result<T, GwError>;

/// Failures shared by every gwflow crate.
#[derive(Error, Debug)]
pub enum GwError {
    #[error("{what} is not finite: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    Dimension {
        what: &'static str,
        expected: String,
        found: String,
    },

    #[error("{what} index {index} out of range for length {len}")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },
}
