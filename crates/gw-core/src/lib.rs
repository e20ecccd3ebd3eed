//! gw-core: stable foundation for gwflow.
//!
//! Contains:
//! - numeric (Real + unit constants + float helpers)
//! - field (row/col indexed cell arrays)
//! - error (shared error types)
//! - timing (opt-in wall clock timers)

pub mod error;
pub mod field;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{GwError, GwResult};
pub use field::*;
pub use numeric::*;
