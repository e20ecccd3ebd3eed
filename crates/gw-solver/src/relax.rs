//! One relaxation iteration: boundary update, then an in-place interior sweep.
//!
//! The interior sweep overwrites `head` row by row, left to right, so a cell
//! sees its upper and left neighbours already updated in the same sweep.
//! Iteration counts depend on this order.

use gw_core::Field;
use gw_grid::Boundaries;

use crate::coefficients::Coefficients;

/// Copy the interior neighbour's head onto every no-flow edge cell.
///
/// Rows first (top then bottom per column), then columns (left then right
/// per row), so corner cells end with the column pass value.
///
/// # Panics
///
/// `head` must be at least 3x3 and each flag vector as long as the edge it
/// describes. `solve` validates its model before calling this.
pub fn apply_boundaries(head: &mut Field, boundaries: &Boundaries) {
    let (nrows, ncols) = head.shape();
    debug_assert!(nrows >= 3 && ncols >= 3, "grid {nrows}x{ncols} has no interior");
    debug_assert!(
        boundaries.top.len() == ncols
            && boundaries.bottom.len() == ncols
            && boundaries.left.len() == nrows
            && boundaries.right.len() == nrows,
        "boundary flags do not match a {nrows}x{ncols} grid"
    );

    for j in 0..ncols {
        if boundaries.top[j].is_no_flow() {
            head[(0, j)] = head[(1, j)];
        }
        if boundaries.bottom[j].is_no_flow() {
            head[(nrows - 1, j)] = head[(nrows - 2, j)];
        }
    }
    for i in 0..nrows {
        if boundaries.left[i].is_no_flow() {
            head[(i, 0)] = head[(i, 1)];
        }
        if boundaries.right[i].is_no_flow() {
            head[(i, ncols - 1)] = head[(i, ncols - 2)];
        }
    }
}

/// Replace every interior head with the conductance-weighted neighbour
/// average less the net flux.
///
/// # Panics
///
/// `head` must be at least 3x3 and every coefficient array the same shape.
pub fn sweep_interior(head: &mut Field, co: &Coefficients) {
    let (nrows, ncols) = head.shape();
    debug_assert!(nrows >= 3 && ncols >= 3, "grid {nrows}x{ncols} has no interior");
    debug_assert_eq!(co.sum.shape(), (nrows, ncols), "coefficient shape mismatch");

    for i in 1..nrows - 1 {
        for j in 1..ncols - 1 {
            let num = -co.q[(i, j)]
                + co.a[(i, j)] * head[(i - 1, j)]
                + co.b[(i, j)] * head[(i + 1, j)]
                + co.c[(i, j)] * head[(i, j - 1)]
                + co.d[(i, j)] * head[(i, j + 1)];
            head[(i, j)] = num / co.sum[(i, j)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_grid::BoundaryFlag;

    fn unit_coefficients(nrows: usize, ncols: usize) -> Coefficients {
        let mut ones = Field::zeros(nrows, ncols);
        for i in 1..nrows - 1 {
            for j in 1..ncols - 1 {
                ones[(i, j)] = 1.0;
            }
        }
        Coefficients {
            a: ones.clone(),
            b: ones.clone(),
            c: ones.clone(),
            d: ones.clone(),
            q: Field::zeros(nrows, ncols),
            sum: ones * 4.0,
        }
    }

    #[test]
    fn sweep_reads_updated_neighbours() {
        let co = unit_coefficients(3, 4);
        let mut head = Field::zeros(3, 4);
        head[(1, 0)] = 4.0;

        sweep_interior(&mut head, &co);

        assert_eq!(head[(1, 1)], 1.0);
        // a double-buffered update would leave this at zero
        assert_eq!(head[(1, 2)], 0.25);
    }

    #[test]
    fn fixed_edges_untouched() {
        let mut head = Field::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
        let before = head.clone();
        apply_boundaries(&mut head, &Boundaries::uniform(3, 3, BoundaryFlag::Fixed));
        assert_eq!(head, before);
    }

    #[test]
    fn corner_takes_column_pass_value() {
        let mut head = Field::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
        apply_boundaries(&mut head, &Boundaries::uniform(3, 3, BoundaryFlag::NoFlow));
        // top pass sets (0,0) = (1,0) = 3, left pass then sets (0,0) = (0,1) = 4
        assert_eq!(head[(0, 1)], 4.0);
        assert_eq!(head[(0, 0)], 4.0);
        assert_eq!(head[(1, 0)], 4.0);
        assert_eq!(head[(1, 2)], 4.0);
    }

    #[test]
    #[should_panic]
    fn boundaries_need_an_interior() {
        let mut head = Field::zeros(2, 2);
        apply_boundaries(&mut head, &Boundaries::uniform(2, 2, BoundaryFlag::NoFlow));
    }

    #[test]
    #[should_panic]
    fn boundaries_need_matching_flags() {
        let mut head = Field::zeros(4, 4);
        apply_boundaries(&mut head, &Boundaries::uniform(3, 3, BoundaryFlag::NoFlow));
    }

    #[test]
    #[should_panic]
    fn sweep_needs_matching_coefficients() {
        let co = unit_coefficients(3, 3);
        let mut head = Field::zeros(5, 5);
        sweep_interior(&mut head, &co);
    }

    #[test]
    fn sink_lowers_head() {
        let mut co = unit_coefficients(3, 3);
        co.q[(1, 1)] = 2.0;
        let mut head = Field::from_element(3, 3, 10.0);
        sweep_interior(&mut head, &co);
        assert_eq!(head[(1, 1)], 9.5);
    }
}
