use clap::{Parser, Subcommand};
use gw_app::{
    AppResult, InfluenceTable, RunProgressEvent, RunStage, SolveRequest, SolveResponse,
    check_artifact, load_study, run_influence_study, solve_artifact,
    solve_artifact_with_progress,
};
use gw_core::timing::{RunTiming, enable_timing};
use gw_solver::Termination;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gw-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "gwflow - steady confined groundwater flow by finite-difference relaxation",
    long_about = "With no subcommand, reads the input artifact path from the first line of stdin, \
                  solves it, and writes the head field next to it."
)]
struct Cli {
    /// Log at debug level (echoes inputs and coefficient arrays)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Report wall-clock timing per stage
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one input artifact
    Solve {
        /// Path to the input artifact
        input: PathBuf,
        /// Output path (defaults to the input name with `.out`)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write a JSON run manifest next to the output
        #[arg(long)]
        manifest: bool,
    },
    /// Load and validate an input artifact without solving
    Validate {
        /// Path to the input artifact
        input: PathBuf,
    },
    /// Run a well influence study
    Influence {
        /// Path to the study YAML file
        study_path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.timing {
        enable_timing();
    }

    let result = match cli.command {
        None => cmd_stdin(cli.timing),
        Some(Commands::Solve {
            input,
            output,
            manifest,
        }) => cmd_solve(
            SolveRequest {
                input,
                output,
                write_manifest: manifest,
            },
            cli.timing,
        ),
        Some(Commands::Validate { input }) => cmd_validate(&input),
        Some(Commands::Influence { study_path }) => cmd_influence(&study_path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Default mode: one path on stdin, echoed back, then solved.
fn cmd_stdin(timing: bool) -> AppResult<()> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let input = PathBuf::from(line.trim());
    debug!(input = %input.display(), "read input path from stdin");
    println!("{}", input.display());

    let response = solve_artifact(&SolveRequest::new(input))?;
    print_report(&response);
    if timing {
        print_timing_summary(&response.timing);
    }
    Ok(())
}

fn cmd_solve(request: SolveRequest, timing: bool) -> AppResult<()> {
    println!("Solving: {}", request.input.display());

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = solve_artifact_with_progress(
        &request,
        Some(&mut |event: RunProgressEvent| {
            let emit_now =
                last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    print_report(&response);
    if let Some(path) = &response.manifest_path {
        println!("  Manifest:      {}", path.display());
    }
    if timing {
        print_timing_summary(&response.timing);
    }
    Ok(())
}

fn cmd_validate(input: &Path) -> AppResult<()> {
    println!("Validating input: {}", input.display());
    let summary = check_artifact(input)?;
    println!("✓ Input is valid");
    println!(
        "  Grid: {} x {} (dx = {}, dy = {}, dz = {})",
        summary.nrows, summary.ncols, summary.dx, summary.dy, summary.dz
    );
    println!(
        "  Tolerance: {:e}, max iterations: {}",
        summary.tolerance, summary.max_iterations
    );
    println!("  No-flow edge cells: {}", summary.no_flow_edges);
    Ok(())
}

fn cmd_influence(study_path: &Path) -> AppResult<()> {
    println!("Running influence study: {}", study_path.display());
    let study = load_study(study_path)?;
    let table = run_influence_study(&study)?;
    print_influence_table(&table);
    println!("✓ Table written: {}", study.output.display());
    Ok(())
}

fn print_report(response: &SolveResponse) {
    let report = &response.report;
    match report.termination {
        Termination::Converged => println!("✓ Converged"),
        Termination::MaxIterExceeded => {
            println!("✗ Maximum iterations reached without meeting the tolerance")
        }
    }
    println!("  Iterations:    {}", report.iterations);
    match report.closure_error {
        Some(e) => println!("  Closure error: {:.3}", e),
        None => println!("  Closure error: n/a"),
    }
    println!("  Minimum head:  {:.3}", report.min_head);
    println!("  Maximum head:  {:.3}", report.max_head);
    println!("  Output:        {}", response.output_path.display());
}

fn print_influence_table(table: &InfluenceTable) {
    print!("{:>12}", "cell");
    for well in &table.wells {
        print!(" {:>12}", well);
    }
    println!();
    for (i, cell) in table.cells.iter().enumerate() {
        print!("{:>12}", cell);
        for j in 0..table.wells.len() {
            print!(" {:>12.4}", table.drawdown[(i, j)]);
        }
        println!();
    }
    for id in table.unconverged() {
        println!("  warning: case '{}' did not converge", id);
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (event.stage, event.iteration, event.max_iterations) {
        (RunStage::Solving, Some(iter), Some(max)) => {
            print!(
                "\rphase={}  iter={}/{}  closure={:.3e}  elapsed={:.1}s",
                event.stage.label(),
                iter,
                max,
                event.closure_error.unwrap_or(f64::NAN),
                event.elapsed_wall_s
            );
        }
        _ => {
            print!(
                "\rphase={}  elapsed={:.1}s",
                event.stage.label(),
                event.elapsed_wall_s
            );
        }
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &RunTiming) {
    println!("Timing summary:");
    println!("  Load:  {:.3} s", timing.load_time_s);
    println!("  Solve: {:.3} s", timing.solve_time_s);
    println!("  Write: {:.3} s", timing.write_time_s);
    println!("  Total: {:.3} s", timing.total_s());
}
