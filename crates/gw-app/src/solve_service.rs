//! Single-artifact solve service: load, solve, emit.

use std::path::{Path, PathBuf};
use std::time::Instant;

use gw_core::timing::{RunTiming, Timer};
use gw_grid::{GridError, GridSummary};
use gw_results::{
    RunManifest, compute_input_digest, manifest_path_for, output_path_for, save_manifest,
    write_head_artifact,
};
use gw_solver::{SolveReport, solve_with_progress};
use tracing::{info, warn};

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage};

/// Request to solve one input artifact.
#[derive(Debug, Clone)]
pub struct SolveRequest {
    pub input: PathBuf,
    /// Defaults to the input path with its suffix swapped.
    pub output: Option<PathBuf>,
    pub write_manifest: bool,
}

impl SolveRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            write_manifest: false,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| output_path_for(&self.input))
    }
}

/// What a finished solve produced.
#[derive(Debug, Clone)]
pub struct SolveResponse {
    pub output_path: PathBuf,
    pub manifest_path: Option<PathBuf>,
    pub grid: GridSummary,
    pub report: SolveReport,
    pub timing: RunTiming,
}

pub fn solve_artifact(request: &SolveRequest) -> AppResult<SolveResponse> {
    solve_artifact_with_progress(request, None)
}

pub fn solve_artifact_with_progress(
    request: &SolveRequest,
    mut progress: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<SolveResponse> {
    let wall = Instant::now();
    let mut timing = RunTiming::default();
    let mut emit = |event: RunProgressEvent| {
        if let Some(cb) = progress.as_mut() {
            cb(event);
        }
    };

    emit(RunProgressEvent::stage(
        RunStage::LoadingInput,
        wall.elapsed().as_secs_f64(),
    ));
    let timer = Timer::start("load");
    let bytes = std::fs::read(&request.input).map_err(|e| GridError::Io {
        path: request.input.clone(),
        source: e,
    })?;
    let model = gw_grid::parse_bytes(&request.input, &bytes)?;
    timing.record(timer.label(), timer.stop());
    let grid = model.summary();

    emit(RunProgressEvent::stage(
        RunStage::Solving,
        wall.elapsed().as_secs_f64(),
    ));
    let solution = {
        let mut forward = |e: gw_solver::SolveProgressEvent| {
            emit(RunProgressEvent {
                stage: RunStage::Solving,
                elapsed_wall_s: wall.elapsed().as_secs_f64(),
                iteration: Some(e.iteration),
                max_iterations: Some(e.max_iterations),
                closure_error: Some(e.closure_error),
            });
        };
        solve_with_progress(model, Some(&mut forward))?
    };
    timing.record("solve", solution.report.solve_time_s);
    if !solution.report.converged() {
        warn!(
            input = %request.input.display(),
            iterations = solution.report.iterations,
            "maximum iterations reached without convergence"
        );
    }

    emit(RunProgressEvent::stage(
        RunStage::WritingOutput,
        wall.elapsed().as_secs_f64(),
    ));
    let timer = Timer::start("write");
    let output_path = request.output_path();
    write_head_artifact(&output_path, &solution.head)?;

    let manifest_path = if request.write_manifest {
        let path = manifest_path_for(&output_path);
        let manifest = RunManifest::new(
            request.input.clone(),
            output_path.clone(),
            compute_input_digest(&bytes, env!("CARGO_PKG_VERSION")),
            grid.clone(),
            solution.report.clone(),
        );
        save_manifest(&path, &manifest)?;
        Some(path)
    } else {
        None
    };
    timing.record(timer.label(), timer.stop());

    emit(RunProgressEvent::stage(
        RunStage::Completed,
        wall.elapsed().as_secs_f64(),
    ));
    info!(
        input = %request.input.display(),
        output = %output_path.display(),
        iterations = solution.report.iterations,
        "solve complete"
    );

    Ok(SolveResponse {
        output_path,
        manifest_path,
        grid,
        report: solution.report,
        timing,
    })
}

/// Load and validate an input artifact without solving it.
pub fn check_artifact(input: &Path) -> AppResult<GridSummary> {
    let model = gw_grid::load_path(input)?;
    gw_grid::validate_model(&model)?;
    Ok(model.summary())
}
