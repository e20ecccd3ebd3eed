//! Steady-state confined groundwater flow solver.
//!
//! Builds finite-difference conductances from the conductivity fields of a
//! [`gw_grid::GridModel`], then relaxes the head field in place until the
//! sum of squared changes over one sweep drops to the model tolerance or the
//! iteration cap is reached.

pub mod coefficients;
pub mod error;
pub mod relax;
pub mod solve;

pub use coefficients::Coefficients;
pub use error::{SolverError, SolverResult};
pub use relax::{apply_boundaries, sweep_interior};
pub use solve::{
    HeadSolution, SolveProgressEvent, SolveReport, SolveState, Termination, solve,
    solve_with_progress,
};
