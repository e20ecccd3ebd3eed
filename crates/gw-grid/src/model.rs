//! In-memory grid model produced by the loader.

use gw_core::{Field, GwError, Real};
use serde::{Deserialize, Serialize};

use crate::GridResult;

/// Cell spacing and aquifer thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub dx: Real,
    pub dy: Real,
    pub dz: Real,
}

/// Per-cell boundary behaviour along one edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryFlag {
    /// Zero gradient: the edge cell copies its interior neighbour.
    NoFlow,
    /// The caller-supplied head persists.
    Fixed,
}

impl BoundaryFlag {
    /// `0` is no-flow, any other value keeps the boundary head.
    pub fn from_value(v: Real) -> Self {
        if v == 0.0 {
            BoundaryFlag::NoFlow
        } else {
            BoundaryFlag::Fixed
        }
    }

    pub fn is_no_flow(self) -> bool {
        matches!(self, BoundaryFlag::NoFlow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySide {
    Top,
    Bottom,
    Left,
    Right,
}

impl BoundarySide {
    pub const ALL: [BoundarySide; 4] = [
        BoundarySide::Top,
        BoundarySide::Bottom,
        BoundarySide::Left,
        BoundarySide::Right,
    ];
}

/// Flag vectors for the four edges. Top/bottom have `ncols` entries,
/// left/right have `nrows`.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundaries {
    pub top: Vec<BoundaryFlag>,
    pub bottom: Vec<BoundaryFlag>,
    pub left: Vec<BoundaryFlag>,
    pub right: Vec<BoundaryFlag>,
}

impl Boundaries {
    pub fn uniform(nrows: usize, ncols: usize, flag: BoundaryFlag) -> Self {
        Self {
            top: vec![flag; ncols],
            bottom: vec![flag; ncols],
            left: vec![flag; nrows],
            right: vec![flag; nrows],
        }
    }

    pub fn side(&self, side: BoundarySide) -> &[BoundaryFlag] {
        match side {
            BoundarySide::Top => &self.top,
            BoundarySide::Bottom => &self.bottom,
            BoundarySide::Left => &self.left,
            BoundarySide::Right => &self.right,
        }
    }

    pub fn no_flow_count(&self) -> usize {
        BoundarySide::ALL
            .iter()
            .map(|&side| self.side(side).iter().filter(|f| f.is_no_flow()).count())
            .sum()
    }
}

/// Everything one steady-state solve needs, owned by that solve.
#[derive(Debug, Clone)]
pub struct GridModel {
    pub spacing: Spacing,
    pub nrows: usize,
    pub ncols: usize,
    /// Sum-of-squared-differences threshold between sweeps.
    pub tolerance: Real,
    pub max_iterations: usize,
    /// Carried from the artifact; the solver does not read them.
    pub distance_x: Vec<Real>,
    pub distance_y: Vec<Real>,
    pub boundaries: Boundaries,
    pub head: Field,
    pub conductivity_x: Field,
    pub conductivity_y: Field,
    /// Net pumping/recharge volume per year per cell.
    pub pumping: Field,
}

impl GridModel {
    pub fn is_interior(&self, row: usize, col: usize) -> bool {
        row >= 1 && row + 1 < self.nrows && col >= 1 && col + 1 < self.ncols
    }

    pub fn interior_cell_count(&self) -> usize {
        self.nrows.saturating_sub(2) * self.ncols.saturating_sub(2)
    }

    /// Add `rate` to the pumping term of one cell.
    pub fn add_pumping(&mut self, row: usize, col: usize, rate: Real) -> GridResult<()> {
        if row >= self.nrows {
            return Err(GwError::IndexOob {
                what: "pumping row",
                index: row,
                len: self.nrows,
            }
            .into());
        }
        if col >= self.ncols {
            return Err(GwError::IndexOob {
                what: "pumping column",
                index: col,
                len: self.ncols,
            }
            .into());
        }
        self.pumping[(row, col)] += rate;
        Ok(())
    }

    pub fn summary(&self) -> GridSummary {
        GridSummary {
            nrows: self.nrows,
            ncols: self.ncols,
            dx: self.spacing.dx,
            dy: self.spacing.dy,
            dz: self.spacing.dz,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            no_flow_edges: self.boundaries.no_flow_count(),
        }
    }
}

/// Serializable description of a grid, for reports and manifests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub nrows: usize,
    pub ncols: usize,
    pub dx: Real,
    pub dy: Real,
    pub dz: Real,
    pub tolerance: Real,
    pub max_iterations: usize,
    pub no_flow_edges: usize,
}
