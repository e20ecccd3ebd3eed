//! High-level solver interface.

use gw_core::timing::Timer;
use gw_core::{Field, Real, min_max, sum_squared_diff};
use gw_grid::{GridModel, validate_model};
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};

use crate::coefficients::Coefficients;
use crate::error::SolverResult;
use crate::relax::{apply_boundaries, sweep_interior};

/// Stages of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveState {
    Initializing,
    IteratingBoundary,
    IteratingInterior,
    ConvergenceCheck,
    Converged,
    MaxIterExceeded,
}

/// How a solve ended. Neither outcome is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Converged,
    MaxIterExceeded,
}

/// Summary of a finished solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Sweeps performed. Equals `max_iterations` on non-convergence.
    pub iterations: usize,
    pub max_iterations: usize,
    pub termination: Termination,
    /// Sum of squared head changes over the last sweep; `None` if no sweep ran.
    pub closure_error: Option<Real>,
    pub min_head: Real,
    pub max_head: Real,
    pub solve_time_s: Option<f64>,
}

impl SolveReport {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Final head field and how it was reached.
#[derive(Debug, Clone)]
pub struct HeadSolution {
    pub head: Field,
    pub report: SolveReport,
}

/// Emitted after every convergence check.
#[derive(Debug, Clone)]
pub struct SolveProgressEvent {
    pub iteration: usize,
    pub max_iterations: usize,
    pub closure_error: Real,
    pub tolerance: Real,
}

/// Solve a grid model to convergence or the iteration cap.
pub fn solve(model: GridModel) -> SolverResult<HeadSolution> {
    solve_with_progress(model, None)
}

/// Solve, reporting each iteration's closure error to `progress`.
pub fn solve_with_progress(
    model: GridModel,
    mut progress: Option<&mut dyn FnMut(SolveProgressEvent)>,
) -> SolverResult<HeadSolution> {
    validate_model(&model)?;
    let timer = Timer::start("solve");

    let co = Coefficients::build(&model)?;

    info!(
        nrows = model.nrows,
        ncols = model.ncols,
        tolerance = model.tolerance,
        max_iterations = model.max_iterations,
        "starting relaxation"
    );

    let GridModel {
        mut head,
        boundaries,
        tolerance,
        max_iterations,
        ..
    } = model;
    let mut previous = head.clone();
    let mut iterations = 0;
    let mut closure_error = None;

    let mut state = SolveState::Initializing;
    loop {
        state = match state {
            SolveState::Initializing => {
                previous.copy_from(&head);
                if max_iterations == 0 {
                    SolveState::MaxIterExceeded
                } else {
                    SolveState::IteratingBoundary
                }
            }
            SolveState::IteratingBoundary => {
                apply_boundaries(&mut head, &boundaries);
                SolveState::IteratingInterior
            }
            SolveState::IteratingInterior => {
                sweep_interior(&mut head, &co);
                SolveState::ConvergenceCheck
            }
            SolveState::ConvergenceCheck => {
                iterations += 1;
                let sse = sum_squared_diff(&head, &previous)?;
                closure_error = Some(sse);
                trace!(iteration = iterations, closure_error = sse, "sweep complete");

                if let Some(cb) = progress.as_mut() {
                    cb(SolveProgressEvent {
                        iteration: iterations,
                        max_iterations,
                        closure_error: sse,
                        tolerance,
                    });
                }

                if sse <= tolerance {
                    SolveState::Converged
                } else if iterations >= max_iterations {
                    SolveState::MaxIterExceeded
                } else {
                    previous.copy_from(&head);
                    SolveState::IteratingBoundary
                }
            }
            SolveState::Converged | SolveState::MaxIterExceeded => break,
        };
    }

    let termination = if state == SolveState::Converged {
        Termination::Converged
    } else {
        Termination::MaxIterExceeded
    };
    let (min_head, max_head) = min_max(&head).unwrap_or((Real::NAN, Real::NAN));

    match termination {
        Termination::Converged => info!(iterations, ?closure_error, min_head, "converged"),
        Termination::MaxIterExceeded => warn!(
            iterations,
            ?closure_error,
            "iteration cap reached before tolerance was met"
        ),
    }

    Ok(HeadSolution {
        head,
        report: SolveReport {
            iterations,
            max_iterations,
            termination,
            closure_error,
            min_head,
            max_head,
            solve_time_s: timer.stop(),
        },
    })
}
