//! Declarative layout of the grid input artifact.

/// Identifies one field of the input artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Dx,
    Dy,
    Dz,
    Nrows,
    Ncols,
    Tolerance,
    MaxIterations,
    DistanceX,
    DistanceY,
    TopFlags,
    BottomFlags,
    LeftFlags,
    RightFlags,
    Head,
    ConductivityX,
    ConductivityY,
    Pumping,
}

/// Token type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Real,
    Integer,
    Flag,
}

impl Kind {
    pub fn describe(self) -> &'static str {
        match self {
            Kind::Real => "a finite real number",
            Kind::Integer => "a non-negative integer",
            Kind::Flag => "a numeric boundary flag",
        }
    }
}

/// How many tokens and lines a field spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// One token on its own line.
    Scalar,
    /// One line of `ncols` tokens.
    Cols,
    /// One line of `nrows` tokens.
    Rows,
    /// `nrows` lines of `ncols` tokens.
    Grid,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: FieldId,
    pub name: &'static str,
    pub kind: Kind,
    pub shape: Shape,
}

const fn spec(id: FieldId, name: &'static str, kind: Kind, shape: Shape) -> FieldSpec {
    FieldSpec {
        id,
        name,
        kind,
        shape,
    }
}

/// Fields in file order. `nrows` and `ncols` precede every sized field.
pub const INPUT_SCHEMA: [FieldSpec; 17] = [
    spec(FieldId::Dx, "dx", Kind::Real, Shape::Scalar),
    spec(FieldId::Dy, "dy", Kind::Real, Shape::Scalar),
    spec(FieldId::Dz, "dz", Kind::Real, Shape::Scalar),
    spec(FieldId::Nrows, "nrows", Kind::Integer, Shape::Scalar),
    spec(FieldId::Ncols, "ncols", Kind::Integer, Shape::Scalar),
    spec(FieldId::Tolerance, "tolerance", Kind::Real, Shape::Scalar),
    spec(FieldId::MaxIterations, "max_iterations", Kind::Integer, Shape::Scalar),
    spec(FieldId::DistanceX, "x_distances", Kind::Real, Shape::Cols),
    spec(FieldId::DistanceY, "y_distances", Kind::Real, Shape::Rows),
    spec(FieldId::TopFlags, "top_boundary", Kind::Flag, Shape::Cols),
    spec(FieldId::BottomFlags, "bottom_boundary", Kind::Flag, Shape::Cols),
    spec(FieldId::LeftFlags, "left_boundary", Kind::Flag, Shape::Rows),
    spec(FieldId::RightFlags, "right_boundary", Kind::Flag, Shape::Rows),
    spec(FieldId::Head, "initial_head", Kind::Real, Shape::Grid),
    spec(FieldId::ConductivityX, "conductivity_x", Kind::Real, Shape::Grid),
    spec(FieldId::ConductivityY, "conductivity_y", Kind::Real, Shape::Grid),
    spec(FieldId::Pumping, "pumping", Kind::Real, Shape::Grid),
];

/// Number of non-blank lines a well-formed artifact has for the given grid.
pub fn expected_line_count(nrows: usize) -> usize {
    INPUT_SCHEMA
        .iter()
        .map(|f| match f.shape {
            Shape::Scalar | Shape::Cols | Shape::Rows => 1,
            Shape::Grid => nrows,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_come_before_sized_fields() {
        let first_sized = INPUT_SCHEMA
            .iter()
            .position(|f| f.shape != Shape::Scalar)
            .unwrap();
        let nrows = INPUT_SCHEMA
            .iter()
            .position(|f| f.id == FieldId::Nrows)
            .unwrap();
        let ncols = INPUT_SCHEMA
            .iter()
            .position(|f| f.id == FieldId::Ncols)
            .unwrap();
        assert!(nrows < first_sized);
        assert!(ncols < first_sized);
    }

    #[test]
    fn seven_by_seven_line_count() {
        // 13 header lines + 4 arrays of 7 rows
        assert_eq!(expected_line_count(7), 41);
    }
}
