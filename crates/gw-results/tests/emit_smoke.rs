use std::path::PathBuf;

use gw_grid::load_path;
use gw_results::*;
use gw_solver::solve;

fn case_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("cases");
    path.push(name);
    path
}

#[test]
fn solved_artifact_is_reproducible() {
    let temp_dir = std::env::temp_dir().join("gw_results_emit_smoke");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();

    let input = temp_dir.join("base-case.txt");
    std::fs::copy(case_path("base-case.txt"), &input).unwrap();
    let output = output_path_for(&input);
    assert_eq!(output, temp_dir.join("base-case.out"));

    let first = solve(load_path(&input).unwrap()).unwrap();
    write_head_artifact(&output, &first.head).unwrap();
    let first_bytes = std::fs::read(&output).unwrap();

    // overwrite in place with a second, independent solve
    let second = solve(load_path(&input).unwrap()).unwrap();
    write_head_artifact(&output, &second.head).unwrap();
    let second_bytes = std::fs::read(&output).unwrap();
    assert_eq!(first_bytes, second_bytes);

    let artifact = read_head_artifact(&output).unwrap();
    assert_eq!(artifact.label, output.display().to_string());
    assert_eq!(artifact.head.shape(), (7, 7));
    for (a, b) in artifact.head.iter().zip(first.head.iter()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn manifest_round_trip_keeps_report() {
    let temp_dir = std::env::temp_dir().join("gw_results_manifest_smoke");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();

    let input = case_path("base-case.txt");
    let bytes = std::fs::read(&input).unwrap();
    let model = load_path(&input).unwrap();
    let grid = model.summary();
    let solution = solve(model).unwrap();

    let output = temp_dir.join("base-case.out");
    let manifest = RunManifest::new(
        input.clone(),
        output.clone(),
        compute_input_digest(&bytes, "test"),
        grid,
        solution.report.clone(),
    );
    let path = manifest_path_for(&output);
    save_manifest(&path, &manifest).unwrap();

    let loaded = load_manifest(&path).unwrap();
    assert_eq!(loaded.report.iterations, 434);
    assert_eq!(loaded.grid.nrows, 7);
    assert_eq!(loaded.input_digest, manifest.input_digest);

    // floats come back bit for bit
    assert_eq!(loaded.grid, manifest.grid);
    assert_eq!(loaded.grid.tolerance.to_bits(), 1e-29f64.to_bits());
    assert_eq!(
        loaded.report.closure_error.map(f64::to_bits),
        manifest.report.closure_error.map(f64::to_bits)
    );
    assert_eq!(loaded.report.max_head.to_bits(), manifest.report.max_head.to_bits());
}

#[test]
fn unwritable_output_is_io_error() {
    let path = std::env::temp_dir()
        .join("gw_results_missing_dir")
        .join("nested")
        .join("x.out");
    let _ = std::fs::remove_dir_all(std::env::temp_dir().join("gw_results_missing_dir"));
    let err = write_head_artifact(&path, &gw_core::Field::zeros(3, 3)).unwrap_err();
    assert!(matches!(err, ResultsError::Io { .. }));
}
