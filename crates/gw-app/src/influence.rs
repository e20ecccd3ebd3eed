//! Influence study runner.
//!
//! Solves the base model and every well case, then tabulates drawdown
//! (base head minus well-case head) at each monitored cell. Case solves are
//! independent and run on a rayon pool; each owns its model and writes its
//! own head artifact.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gw_core::{Field, Real, ensure_same_shape, field_from_rows};
use gw_grid::{GridModel, load_path};
use gw_results::{OUTPUT_SUFFIX, output_path_for, write_head_artifact};
use gw_solver::{SolveReport, solve};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::study::{InfluenceStudy, WellSource};

const BASE_CASE_ID: &str = "base";

/// One independent solve.
struct CaseJob {
    id: String,
    model: GridModel,
    output: PathBuf,
}

struct CaseResult {
    id: String,
    head: Field,
    report: SolveReport,
    output: PathBuf,
}

/// Drawdown at every monitored cell for every well case.
#[derive(Debug, Clone)]
pub struct InfluenceTable {
    /// Column labels, in study order.
    pub wells: Vec<String>,
    /// Row labels, in study order.
    pub cells: Vec<String>,
    /// `cells.len()` x `wells.len()`.
    pub drawdown: Field,
    /// Per-case solve reports, base first.
    pub reports: Vec<(String, SolveReport)>,
    /// Per-case head artifacts, base first.
    pub artifacts: Vec<(String, PathBuf)>,
}

impl InfluenceTable {
    pub fn drawdown_at(&self, cell: &str, well: &str) -> Option<Real> {
        let i = self.cells.iter().position(|c| c == cell)?;
        let j = self.wells.iter().position(|w| w == well)?;
        Some(self.drawdown[(i, j)])
    }

    pub fn unconverged(&self) -> impl Iterator<Item = &str> {
        self.reports
            .iter()
            .filter(|(_, r)| !r.converged())
            .map(|(id, _)| id.as_str())
    }
}

/// Run a loaded study and write its drawdown table to `study.output`.
pub fn run_influence_study(study: &InfluenceStudy) -> AppResult<InfluenceTable> {
    let jobs = plan_jobs(study)?;
    if let Some(dir) = &study.output_dir {
        std::fs::create_dir_all(dir)?;
    }
    info!(
        cases = jobs.len(),
        threads = study.threads.unwrap_or_else(rayon::current_num_threads),
        "running influence study"
    );

    let results = match study.threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| AppError::Backend {
                    message: format!("Failed to build worker pool: {}", e),
                })?;
            pool.install(|| run_jobs(jobs))?
        }
        None => run_jobs(jobs)?,
    };

    let table = tabulate(study, results)?;
    for id in table.unconverged() {
        warn!(case = id, "case stopped at its iteration cap");
    }
    write_influence_table(&study.output, &table)?;
    info!(output = %study.output.display(), "influence table written");
    Ok(table)
}

fn run_jobs(jobs: Vec<CaseJob>) -> AppResult<Vec<CaseResult>> {
    jobs.into_par_iter().map(run_case).collect()
}

fn run_case(job: CaseJob) -> AppResult<CaseResult> {
    let CaseJob { id, model, output } = job;
    let solution = solve(model)?;
    write_head_artifact(&output, &solution.head)?;
    debug!(
        case = %id,
        iterations = solution.report.iterations,
        output = %output.display(),
        "case solved"
    );
    Ok(CaseResult {
        id,
        head: solution.head,
        report: solution.report,
        output,
    })
}

/// Build the base job plus one per well, checking the artifact names first.
fn plan_jobs(study: &InfluenceStudy) -> AppResult<Vec<CaseJob>> {
    let base = load_path(&study.base)?;

    for cell in &study.monitored {
        if cell.row >= base.nrows || cell.col >= base.ncols {
            return Err(AppError::Validation(format!(
                "Monitored cell '{}' at ({}, {}) is outside the {}x{} grid",
                cell.id, cell.row, cell.col, base.nrows, base.ncols
            )));
        }
    }

    let relocate = |path: PathBuf| match &study.output_dir {
        Some(dir) => match path.file_name() {
            Some(name) => dir.join(name),
            None => dir.join(&path),
        },
        None => path,
    };
    let cell_dir = study
        .output_dir
        .clone()
        .or_else(|| study.base.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    let mut jobs = Vec::with_capacity(study.wells.len() + 1);
    jobs.push(CaseJob {
        id: BASE_CASE_ID.to_string(),
        output: relocate(output_path_for(&study.base)),
        model: base.clone(),
    });

    for well in &study.wells {
        let (model, output) = match &well.source {
            WellSource::Input { input } => {
                let model = load_path(input)?;
                if model.nrows != base.nrows || model.ncols != base.ncols {
                    return Err(AppError::Validation(format!(
                        "Well '{}' grid is {}x{}, base grid is {}x{}",
                        well.id, model.nrows, model.ncols, base.nrows, base.ncols
                    )));
                }
                (model, relocate(output_path_for(input)))
            }
            WellSource::Cell { cell: [row, col] } => {
                let mut model = base.clone();
                model.add_pumping(*row, *col, study.unit_rate)?;
                (model, cell_dir.join(format!("{}{}", well.id, OUTPUT_SUFFIX)))
            }
        };
        jobs.push(CaseJob {
            id: well.id.clone(),
            model,
            output,
        });
    }

    let mut claimed: HashMap<&Path, &str> = HashMap::new();
    for job in &jobs {
        if let Some(other) = claimed.insert(job.output.as_path(), job.id.as_str()) {
            return Err(AppError::Validation(format!(
                "Cases '{}' and '{}' would both write {}",
                other,
                job.id,
                job.output.display()
            )));
        }
    }
    if jobs.iter().any(|j| j.output == study.output) {
        return Err(AppError::Validation(format!(
            "Influence table {} collides with a head artifact",
            study.output.display()
        )));
    }

    Ok(jobs)
}

fn tabulate(study: &InfluenceStudy, results: Vec<CaseResult>) -> AppResult<InfluenceTable> {
    let mut results = results.into_iter();
    let base = results.next().ok_or_else(|| AppError::Backend {
        message: "base case produced no result".to_string(),
    })?;
    let wells: Vec<CaseResult> = results.collect();

    let mut drawdown = Field::zeros(study.monitored.len(), wells.len());
    for (j, well) in wells.iter().enumerate() {
        ensure_same_shape(&base.head, &well.head, "well case head")
            .map_err(gw_grid::GridError::from)?;
        for (i, cell) in study.monitored.iter().enumerate() {
            drawdown[(i, j)] = base.head[(cell.row, cell.col)] - well.head[(cell.row, cell.col)];
        }
    }

    let mut reports = Vec::with_capacity(wells.len() + 1);
    let mut artifacts = Vec::with_capacity(wells.len() + 1);
    reports.push((base.id.clone(), base.report));
    artifacts.push((base.id, base.output));
    for well in &wells {
        reports.push((well.id.clone(), well.report.clone()));
        artifacts.push((well.id.clone(), well.output.clone()));
    }

    Ok(InfluenceTable {
        wells: wells.into_iter().map(|w| w.id).collect(),
        cells: study.monitored.iter().map(|c| c.id.clone()).collect(),
        drawdown,
        reports,
        artifacts,
    })
}

/// One line per monitored cell: its id, then drawdown for each well in order.
pub fn write_influence_table(path: &Path, table: &InfluenceTable) -> AppResult<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "cell {}", table.wells.join(" "))?;
    for (i, cell) in table.cells.iter().enumerate() {
        let values = (0..table.drawdown.ncols())
            .map(|j| format!("{:?}", table.drawdown[(i, j)]))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(w, "{cell} {values}")?;
    }
    w.flush()?;
    Ok(())
}

/// Read a drawdown table back as `(cells, wells, drawdown)`.
pub fn read_influence_table(path: &Path) -> AppResult<(Vec<String>, Vec<String>, Field)> {
    let content = std::fs::read_to_string(path)?;
    let malformed = |line: usize, what: String| {
        AppError::Study(format!(
            "Malformed influence table {} at line {}: {}",
            path.display(),
            line,
            what
        ))
    };

    let mut lines = content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let (_, header) = lines
        .next()
        .ok_or_else(|| malformed(1, "missing header".to_string()))?;
    let wells: Vec<String> = header.split_whitespace().skip(1).map(String::from).collect();

    let mut cells = Vec::new();
    let mut rows = Vec::new();
    for (idx, line) in lines {
        let mut tokens = line.split_whitespace();
        let Some(id) = tokens.next() else { continue };
        let values = tokens
            .map(|t| t.parse::<Real>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| malformed(idx + 1, e.to_string()))?;
        if values.len() != wells.len() {
            return Err(malformed(
                idx + 1,
                format!("expected {} values, found {}", wells.len(), values.len()),
            ));
        }
        cells.push(id.to_string());
        rows.push(values);
    }

    let drawdown = if rows.is_empty() {
        Field::zeros(0, wells.len())
    } else {
        field_from_rows(&rows, wells.len()).map_err(gw_grid::GridError::from)?
    };
    Ok((cells, wells, drawdown))
}
