//! Structural checks on grid models.

use gw_core::{Field, GwError, Real};

use crate::model::GridModel;
use crate::{GridError, GridResult};

/// Smallest grid with one interior cell.
pub const MIN_DIMENSION: usize = 3;

pub(crate) fn check_dimension(line: usize, field: &'static str, n: usize) -> GridResult<usize> {
    if n < MIN_DIMENSION {
        return Err(GridError::malformed(
            line,
            field,
            format!("an integer of at least {MIN_DIMENSION}"),
            n.to_string(),
        ));
    }
    Ok(n)
}

pub(crate) fn check_spacing(line: usize, field: &'static str, v: Real) -> GridResult<Real> {
    if v <= 0.0 {
        return Err(GridError::malformed(
            line,
            field,
            "a positive length",
            v.to_string(),
        ));
    }
    Ok(v)
}

/// Check that every array and flag vector matches the grid dimensions.
///
/// Models built in code (not loaded) should pass through this before solving.
pub fn validate_model(model: &GridModel) -> GridResult<()> {
    if model.nrows < MIN_DIMENSION || model.ncols < MIN_DIMENSION {
        return Err(GwError::Dimension {
            what: "grid",
            expected: format!("at least {MIN_DIMENSION}x{MIN_DIMENSION}"),
            found: format!("{}x{}", model.nrows, model.ncols),
        }
        .into());
    }

    let s = model.spacing;
    if !(s.dx > 0.0 && s.dy > 0.0 && s.dz > 0.0) {
        return Err(GwError::InvalidArg {
            what: "grid spacing must be positive",
        }
        .into());
    }
    if !(model.tolerance >= 0.0) {
        return Err(GwError::InvalidArg {
            what: "tolerance must be non-negative",
        }
        .into());
    }

    check_len("x_distances", model.distance_x.len(), model.ncols)?;
    check_len("y_distances", model.distance_y.len(), model.nrows)?;
    check_len("top_boundary", model.boundaries.top.len(), model.ncols)?;
    check_len("bottom_boundary", model.boundaries.bottom.len(), model.ncols)?;
    check_len("left_boundary", model.boundaries.left.len(), model.nrows)?;
    check_len("right_boundary", model.boundaries.right.len(), model.nrows)?;

    for (what, field) in [
        ("initial_head", &model.head),
        ("conductivity_x", &model.conductivity_x),
        ("conductivity_y", &model.conductivity_y),
        ("pumping", &model.pumping),
    ] {
        check_shape(what, field, model.nrows, model.ncols)?;
    }
    Ok(())
}

fn check_len(what: &'static str, found: usize, expected: usize) -> GridResult<()> {
    if found != expected {
        return Err(GwError::Dimension {
            what,
            expected: expected.to_string(),
            found: found.to_string(),
        }
        .into());
    }
    Ok(())
}

fn check_shape(what: &'static str, field: &Field, nrows: usize, ncols: usize) -> GridResult<()> {
    if field.shape() != (nrows, ncols) {
        return Err(GwError::Dimension {
            what,
            expected: format!("{nrows}x{ncols}"),
            found: format!("{}x{}", field.nrows(), field.ncols()),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundaryFlag, Boundaries, Spacing};

    fn model(nrows: usize, ncols: usize) -> GridModel {
        GridModel {
            spacing: Spacing {
                dx: 1.0,
                dy: 1.0,
                dz: 1.0,
            },
            nrows,
            ncols,
            tolerance: 0.0,
            max_iterations: 1,
            distance_x: vec![0.0; ncols],
            distance_y: vec![0.0; nrows],
            boundaries: Boundaries::uniform(nrows, ncols, BoundaryFlag::Fixed),
            head: Field::zeros(nrows, ncols),
            conductivity_x: Field::from_element(nrows, ncols, 1.0),
            conductivity_y: Field::from_element(nrows, ncols, 1.0),
            pumping: Field::zeros(nrows, ncols),
        }
    }

    #[test]
    fn well_formed_model_passes() {
        validate_model(&model(4, 5)).unwrap();
    }

    #[test]
    fn too_small_grid_rejected() {
        let err = validate_model(&model(2, 5)).unwrap_err();
        assert!(format!("{err}").contains("2x5"));
    }

    #[test]
    fn mismatched_array_rejected() {
        let mut m = model(4, 5);
        m.pumping = Field::zeros(4, 4);
        let err = validate_model(&m).unwrap_err();
        assert!(format!("{err}").contains("pumping"));
    }

    #[test]
    fn mismatched_flags_rejected() {
        let mut m = model(4, 5);
        m.boundaries.left.pop();
        assert!(validate_model(&m).is_err());
    }

    #[test]
    fn dimension_check_reports_line() {
        match check_dimension(4, "nrows", 2).unwrap_err() {
            GridError::MalformedInput { line, found, .. } => {
                assert_eq!(line, 4);
                assert_eq!(found, "2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
