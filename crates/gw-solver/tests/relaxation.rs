//! Integration tests for the relaxation solver.

use std::path::PathBuf;

use gw_core::{Field, sum_squared_diff};
use gw_grid::{BoundaryFlag, Boundaries, GridModel, Spacing, load_path};
use gw_solver::{SolveProgressEvent, SolverError, Termination, solve, solve_with_progress};
use proptest::prelude::*;

fn case_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("cases");
    path.push(name);
    path
}

fn uniform_model(nrows: usize, ncols: usize, boundaries: Boundaries) -> GridModel {
    GridModel {
        spacing: Spacing {
            dx: 100.0,
            dy: 100.0,
            dz: 10.0,
        },
        nrows,
        ncols,
        tolerance: 1e-20,
        max_iterations: 10_000,
        distance_x: vec![0.0; ncols],
        distance_y: vec![0.0; nrows],
        boundaries,
        head: Field::zeros(nrows, ncols),
        conductivity_x: Field::from_element(nrows, ncols, 25.0),
        conductivity_y: Field::from_element(nrows, ncols, 25.0),
        pumping: Field::zeros(nrows, ncols),
    }
}

// Reference heads for the lake-side base case.
const BASE_ROW: [f64; 7] = [
    0.0,
    2.7956388034665838,
    7.179200447302184,
    10.466871680178881,
    12.658652502096675,
    13.754542913055573,
    13.754542913055573,
];

#[test]
fn base_case_matches_reference() {
    let model = load_path(&case_path("base-case.txt")).unwrap();
    let solution = solve(model).unwrap();

    assert_eq!(solution.report.termination, Termination::Converged);
    assert_eq!(solution.report.iterations, 434);
    let closure = solution.report.closure_error.unwrap();
    assert!(closure <= 1e-29);
    assert_eq!(closure.to_bits(), 8.283039504820624e-30f64.to_bits());

    for row in 0..7 {
        for (col, expected) in BASE_ROW.iter().enumerate() {
            let got = solution.head[(row, col)];
            assert!(
                (got - expected).abs() < 1e-12,
                "head[{row},{col}] = {got}, expected {expected}"
            );
        }
    }

    // the documented rounding
    let documented = [0.0, 2.7956, 7.1792, 10.4669, 12.6587, 13.7545, 13.7545];
    for (col, d) in documented.iter().enumerate() {
        assert!((solution.head[(1, col)] - d).abs() < 1e-3);
    }
    assert_eq!(solution.report.min_head, 0.0);
}

#[test]
fn zero_start_needs_more_sweeps() {
    let mut model = load_path(&case_path("base-case.txt")).unwrap();
    model.head.fill(0.0);
    let solution = solve(model).unwrap();

    assert!(solution.report.converged());
    assert_eq!(solution.report.iterations, 813);
    for (col, expected) in BASE_ROW.iter().enumerate() {
        assert!((solution.head[(3, col)] - expected).abs() < 1e-9);
    }
}

#[test]
fn iteration_cap_still_returns_heads() {
    let mut model = load_path(&case_path("base-case.txt")).unwrap();
    model.head.fill(0.0);
    model.max_iterations = 5;

    let mut events = Vec::new();
    let solution =
        solve_with_progress(model, Some(&mut |e: SolveProgressEvent| events.push(e.iteration)))
            .unwrap();

    assert_eq!(solution.report.termination, Termination::MaxIterExceeded);
    assert_eq!(solution.report.iterations, 5);
    assert_eq!(events, vec![1, 2, 3, 4, 5]);
    assert!(solution.report.closure_error.unwrap() > 0.0);
    assert!(solution.head[(3, 3)] > 0.0);
}

#[test]
fn zero_iteration_cap_is_not_an_error() {
    let mut model = load_path(&case_path("base-case.txt")).unwrap();
    model.max_iterations = 0;
    let initial = model.head.clone();

    let solution = solve(model).unwrap();
    assert_eq!(solution.report.termination, Termination::MaxIterExceeded);
    assert_eq!(solution.report.iterations, 0);
    assert_eq!(solution.report.closure_error, None);
    assert_eq!(solution.head, initial);
}

#[test]
fn resolve_is_bit_identical() {
    let model = load_path(&case_path("pump-lake.txt")).unwrap();
    let first = solve(model.clone()).unwrap();
    let second = solve(model).unwrap();

    assert_eq!(first.report.iterations, second.report.iterations);
    for (a, b) in first.head.iter().zip(second.head.iter()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn pumped_well_draws_down_its_cell() {
    let model = load_path(&case_path("pump-lake.txt")).unwrap();
    let solution = solve(model).unwrap();

    assert!(solution.report.converged());
    assert_eq!(solution.report.iterations, 738);
    assert!((solution.head[(5, 1)] - 1.8953003600155507).abs() < 1e-12);
}

#[test]
fn zero_conductivity_surfaces_division_by_zero() {
    let mut model = uniform_model(4, 4, Boundaries::uniform(4, 4, BoundaryFlag::NoFlow));
    model.conductivity_x.fill(0.0);
    model.conductivity_y.fill(0.0);
    let err = solve(model).unwrap_err();
    assert!(matches!(err, SolverError::DivisionByZero { row: 1, col: 1 }));
}

#[test]
fn no_flow_edges_carry_no_flux() {
    // fixed lake on the left, no-flow elsewhere, no pumping
    let mut boundaries = Boundaries::uniform(6, 6, BoundaryFlag::NoFlow);
    boundaries.left = vec![BoundaryFlag::Fixed; 6];
    let mut model = uniform_model(6, 6, boundaries);
    for i in 0..6 {
        model.head[(i, 0)] = 20.0;
    }

    let solution = solve(model.clone()).unwrap();
    assert!(solution.report.converged());

    let h = &solution.head;
    let mut flux = 0.0;
    for j in 1..5 {
        flux += model.conductivity_x[(0, j)] * (h[(0, j)] - h[(1, j)]);
        flux += model.conductivity_x[(5, j)] * (h[(5, j)] - h[(4, j)]);
    }
    for i in 1..5 {
        flux += model.conductivity_y[(i, 5)] * (h[(i, 5)] - h[(i, 4)]);
    }
    assert!(flux.abs() < 1e-6, "net no-flow flux {flux}");

    // with no sources the whole aquifer settles at the lake level
    for v in h.iter() {
        assert!((v - 20.0).abs() < 1e-8);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn uniform_boundary_is_a_fixed_point(
        level in 0.0f64..100.0,
        interior in prop::collection::vec(0.0f64..100.0, 9),
    ) {
        let mut model = uniform_model(5, 5, Boundaries::uniform(5, 5, BoundaryFlag::Fixed));
        model.head.fill(level);
        for i in 1..4 {
            for j in 1..4 {
                model.head[(i, j)] = interior[(i - 1) * 3 + (j - 1)];
            }
        }

        let solution = solve(model).unwrap();
        prop_assert!(solution.report.converged());
        for v in solution.head.iter() {
            prop_assert!((v - level).abs() < 1e-8);
        }
    }

    #[test]
    fn no_flow_edges_copy_pre_sweep_neighbour(
        cells in prop::collection::vec(-50.0f64..50.0, 30),
        flags in prop::collection::vec(any::<bool>(), 22),
    ) {
        let to_flag = |b: bool| if b { BoundaryFlag::NoFlow } else { BoundaryFlag::Fixed };
        let boundaries = Boundaries {
            top: flags[0..6].iter().copied().map(to_flag).collect(),
            bottom: flags[6..12].iter().copied().map(to_flag).collect(),
            left: flags[12..17].iter().copied().map(to_flag).collect(),
            right: flags[17..22].iter().copied().map(to_flag).collect(),
        };
        let mut model = uniform_model(5, 6, boundaries.clone());
        model.head = Field::from_row_slice(5, 6, &cells);

        let co = gw_solver::Coefficients::build(&model).unwrap();
        let mut head = model.head.clone();
        gw_solver::apply_boundaries(&mut head, &boundaries);
        let before_sweep = head.clone();
        gw_solver::sweep_interior(&mut head, &co);

        for j in 1..5 {
            if boundaries.top[j].is_no_flow() {
                prop_assert_eq!(head[(0, j)], before_sweep[(1, j)]);
            }
            if boundaries.bottom[j].is_no_flow() {
                prop_assert_eq!(head[(4, j)], before_sweep[(3, j)]);
            }
        }
        for i in 1..4 {
            if boundaries.left[i].is_no_flow() {
                prop_assert_eq!(head[(i, 0)], before_sweep[(i, 1)]);
            }
            if boundaries.right[i].is_no_flow() {
                prop_assert_eq!(head[(i, 5)], before_sweep[(i, 4)]);
            }
        }
        // the interior sweep never writes edge cells
        for j in 0..6 {
            prop_assert_eq!(head[(0, j)], before_sweep[(0, j)]);
            prop_assert_eq!(head[(4, j)], before_sweep[(4, j)]);
        }
        prop_assert!(sum_squared_diff(&head, &before_sweep).is_ok());
    }
}
