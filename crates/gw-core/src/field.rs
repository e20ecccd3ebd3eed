//! Cell arrays for structured grids.
//!
//! A [`Field`] is indexed `(row, col)` with row 0 at the top of the grid.
//! Storage order is nalgebra's (column-major); callers that care about
//! visiting order must iterate explicitly with [`for_each_row_major`].

use nalgebra::DMatrix;

use crate::{GwError, GwResult, Real};

pub type Field = DMatrix<Real>;

/// Build a field from row vectors. Every row must have `ncols` entries.
pub fn field_from_rows(rows: &[Vec<Real>], ncols: usize) -> GwResult<Field> {
    for row in rows {
        if row.len() != ncols {
            return Err(GwError::Dimension {
                what: "field row",
                expected: ncols.to_string(),
                found: row.len().to_string(),
            });
        }
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

/// Visit every cell row by row, left to right.
pub fn for_each_row_major(field: &Field, mut f: impl FnMut(usize, usize, Real)) {
    for i in 0..field.nrows() {
        for j in 0..field.ncols() {
            f(i, j, field[(i, j)]);
        }
    }
}

/// Sum of squared cell differences, accumulated in row-major order.
///
/// Accumulation order matters for bit-exact closure errors.
pub fn sum_squared_diff(a: &Field, b: &Field) -> GwResult<Real> {
    ensure_same_shape(a, b, "field comparison")?;
    let mut sse = 0.0;
    for_each_row_major(a, |i, j, v| {
        let d = v - b[(i, j)];
        sse += d * d;
    });
    Ok(sse)
}

pub fn ensure_same_shape(a: &Field, b: &Field, what: &'static str) -> GwResult<()> {
    if a.shape() != b.shape() {
        return Err(GwError::Dimension {
            what,
            expected: format!("{}x{}", a.nrows(), a.ncols()),
            found: format!("{}x{}", b.nrows(), b.ncols()),
        });
    }
    Ok(())
}

/// Minimum and maximum cell value. `None` for an empty field.
pub fn min_max(field: &Field) -> Option<(Real, Real)> {
    if field.is_empty() {
        return None;
    }
    Some((field.min(), field.max()))
}
