//! Finite-difference conductances and net flux per interior cell.

use gw_core::{DAYS_PER_YEAR, Field, Real};
use gw_grid::GridModel;
use tracing::debug;

use crate::error::{SolverError, SolverResult};

/// Conductances coupling each interior cell to its neighbours.
///
/// `a`/`b` couple to the rows above/below, `c`/`d` to the columns left/right.
/// Edge entries stay zero and are never read.
#[derive(Debug, Clone)]
pub struct Coefficients {
    pub a: Field,
    pub b: Field,
    pub c: Field,
    pub d: Field,
    /// Net flux per unit area per day.
    pub q: Field,
    /// `a + b + c + d`, summed in that order.
    pub sum: Field,
}

impl Coefficients {
    /// Build conductances from the model's conductivity and pumping arrays.
    ///
    /// Fails with [`SolverError::DivisionByZero`] at the first interior cell
    /// (row-major) whose conductances sum to zero.
    pub fn build(model: &GridModel) -> SolverResult<Self> {
        let (nrows, ncols) = (model.nrows, model.ncols);
        let kx = &model.conductivity_x;
        let ky = &model.conductivity_y;
        let dz = model.spacing.dz;
        let x_denom = 2.0 * model.spacing.dx * model.spacing.dx;
        let y_denom = 2.0 * model.spacing.dy * model.spacing.dy;

        let mut a = Field::zeros(nrows, ncols);
        let mut b = Field::zeros(nrows, ncols);
        let mut c = Field::zeros(nrows, ncols);
        let mut d = Field::zeros(nrows, ncols);
        let mut sum = Field::zeros(nrows, ncols);

        for i in 1..nrows - 1 {
            for j in 1..ncols - 1 {
                a[(i, j)] = ((kx[(i - 1, j)] + kx[(i, j)]) * dz) / x_denom;
                b[(i, j)] = ((kx[(i, j)] + kx[(i + 1, j)]) * dz) / x_denom;
                c[(i, j)] = ((ky[(i, j - 1)] + ky[(i, j)]) * dz) / y_denom;
                d[(i, j)] = ((ky[(i, j)] + ky[(i, j + 1)]) * dz) / y_denom;

                let s = a[(i, j)] + b[(i, j)] + c[(i, j)] + d[(i, j)];
                if s == 0.0 {
                    return Err(SolverError::DivisionByZero { row: i, col: j });
                }
                sum[(i, j)] = s;
            }
        }

        let area = model.spacing.dx * model.spacing.dy;
        let q = model.pumping.map(|p: Real| p / area / DAYS_PER_YEAR);

        debug!("conductance a:{a}");
        debug!("conductance b:{b}");
        debug!("conductance c:{c}");
        debug!("conductance d:{d}");
        debug!("net flux q:{q}");

        Ok(Self { a, b, c, d, q, sum })
    }
}
