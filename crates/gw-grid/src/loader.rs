//! Grid Model Loader.
//!
//! Walks [`INPUT_SCHEMA`] against the artifact's non-blank lines. No partial
//! recovery: the first field that does not match its schema entry aborts the load.

use std::path::Path;

use gw_core::{Field, GwError, Real, ensure_finite, field_from_rows};
use tracing::{debug, warn};

use crate::model::{BoundaryFlag, Boundaries, GridModel, Spacing};
use crate::schema::{FieldId, FieldSpec, INPUT_SCHEMA, Kind, Shape, expected_line_count};
use crate::validate::{check_dimension, check_spacing, validate_model};
use crate::{GridError, GridResult};

/// Load a grid model from an input artifact on disk.
pub fn load_path(path: &Path) -> GridResult<GridModel> {
    let bytes = std::fs::read(path).map_err(|e| GridError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_bytes(path, &bytes)
}

/// Parse artifact bytes already read from `path`.
///
/// Bytes that are not UTF-8 are a [`GridError::Io`] with
/// `ErrorKind::InvalidData`, as `read_to_string` would report them.
pub fn parse_bytes(path: &Path, bytes: &[u8]) -> GridResult<GridModel> {
    let text = std::str::from_utf8(bytes).map_err(|e| GridError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read input artifact");
    parse_str(text)
}

/// Parse a grid model from the artifact text.
pub fn parse_str(text: &str) -> GridResult<GridModel> {
    let mut cursor = LineCursor::new(text);
    let mut fields = Fields::default();

    for spec in INPUT_SCHEMA.iter() {
        let value = read_field(&mut cursor, spec, fields.nrows, fields.ncols)?;
        fields.store(spec, value, cursor.last_line)?;
    }

    if let Some((line, _)) = cursor.next_non_blank() {
        let expected_lines = fields.nrows.map(expected_line_count).unwrap_or(0);
        warn!(line, expected_lines, "ignoring trailing content after pumping array");
    }

    let model = fields.finish()?;
    validate_model(&model)?;
    Ok(model)
}

struct LineCursor<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    last_line: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last_line: 0,
        }
    }

    /// Next non-blank line with its 1-based physical line number.
    fn next_non_blank(&mut self) -> Option<(usize, &'a str)> {
        for (idx, line) in self.lines.by_ref() {
            self.last_line = idx + 1;
            if !line.trim().is_empty() {
                return Some((idx + 1, line));
            }
        }
        None
    }

    fn expect_line(&mut self, field: &'static str, expected: &str) -> GridResult<(usize, &'a str)> {
        self.next_non_blank()
            .ok_or_else(|| GridError::malformed(self.last_line + 1, field, expected, "end of file"))
    }
}

enum Value {
    Real(Real),
    Count(usize),
    Row(Vec<Real>),
    Grid(Field),
}

fn read_field(
    cursor: &mut LineCursor<'_>,
    spec: &FieldSpec,
    nrows: Option<usize>,
    ncols: Option<usize>,
) -> GridResult<Value> {
    match spec.shape {
        Shape::Scalar => {
            let (line_no, line) = cursor.expect_line(spec.name, spec.kind.describe())?;
            let tokens = split_exact(line_no, line, spec.name, 1)?;
            match spec.kind {
                Kind::Integer => parse_count(line_no, spec.name, tokens[0]).map(Value::Count),
                Kind::Real | Kind::Flag => {
                    parse_real(line_no, spec, tokens[0]).map(Value::Real)
                }
            }
        }
        Shape::Cols | Shape::Rows => {
            let len = if spec.shape == Shape::Cols {
                require_dim(ncols, "ncols")?
            } else {
                require_dim(nrows, "nrows")?
            };
            let expected = format!("{len} values");
            let (line_no, line) = cursor.expect_line(spec.name, &expected)?;
            read_row(line_no, line, spec, len).map(Value::Row)
        }
        Shape::Grid => {
            let nrows = require_dim(nrows, "nrows")?;
            let ncols = require_dim(ncols, "ncols")?;
            let expected = format!("{nrows} rows of {ncols} values");
            let mut rows = Vec::with_capacity(nrows);
            for _ in 0..nrows {
                let (line_no, line) = cursor.expect_line(spec.name, &expected)?;
                rows.push(read_row(line_no, line, spec, ncols)?);
            }
            Ok(Value::Grid(field_from_rows(&rows, ncols)?))
        }
    }
}

fn require_dim(dim: Option<usize>, what: &'static str) -> GridResult<usize> {
    dim.ok_or_else(|| GwError::InvalidArg { what }.into())
}

fn split_exact<'a>(
    line_no: usize,
    line: &'a str,
    field: &'static str,
    count: usize,
) -> GridResult<Vec<&'a str>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != count {
        return Err(GridError::malformed(
            line_no,
            field,
            format!("{count} value{}", if count == 1 { "" } else { "s" }),
            format!("{} values", tokens.len()),
        ));
    }
    Ok(tokens)
}

fn read_row(line_no: usize, line: &str, spec: &FieldSpec, len: usize) -> GridResult<Vec<Real>> {
    split_exact(line_no, line, spec.name, len)?
        .into_iter()
        .map(|tok| parse_real(line_no, spec, tok))
        .collect()
}

fn parse_real(line_no: usize, spec: &FieldSpec, token: &str) -> GridResult<Real> {
    let malformed =
        || GridError::malformed(line_no, spec.name, spec.kind.describe(), format!("'{token}'"));
    let v: Real = token.parse().map_err(|_| malformed())?;
    ensure_finite(v, spec.name).map_err(|_| malformed())
}

fn parse_count(line_no: usize, field: &'static str, token: &str) -> GridResult<usize> {
    token.parse().map_err(|_| {
        GridError::malformed(line_no, field, Kind::Integer.describe(), format!("'{token}'"))
    })
}

#[derive(Default)]
struct Fields {
    dx: Option<Real>,
    dy: Option<Real>,
    dz: Option<Real>,
    nrows: Option<usize>,
    ncols: Option<usize>,
    tolerance: Option<Real>,
    max_iterations: Option<usize>,
    distance_x: Option<Vec<Real>>,
    distance_y: Option<Vec<Real>>,
    top: Option<Vec<BoundaryFlag>>,
    bottom: Option<Vec<BoundaryFlag>>,
    left: Option<Vec<BoundaryFlag>>,
    right: Option<Vec<BoundaryFlag>>,
    head: Option<Field>,
    conductivity_x: Option<Field>,
    conductivity_y: Option<Field>,
    pumping: Option<Field>,
}

impl Fields {
    fn store(&mut self, spec: &FieldSpec, value: Value, line: usize) -> GridResult<()> {
        match (spec.id, value) {
            (FieldId::Dx, Value::Real(v)) => self.dx = Some(check_spacing(line, spec.name, v)?),
            (FieldId::Dy, Value::Real(v)) => self.dy = Some(check_spacing(line, spec.name, v)?),
            (FieldId::Dz, Value::Real(v)) => self.dz = Some(check_spacing(line, spec.name, v)?),
            (FieldId::Nrows, Value::Count(n)) => {
                self.nrows = Some(check_dimension(line, spec.name, n)?)
            }
            (FieldId::Ncols, Value::Count(n)) => {
                self.ncols = Some(check_dimension(line, spec.name, n)?)
            }
            (FieldId::Tolerance, Value::Real(v)) => {
                if v < 0.0 {
                    return Err(GridError::malformed(
                        line,
                        spec.name,
                        "a non-negative real number",
                        v.to_string(),
                    ));
                }
                self.tolerance = Some(v)
            }
            (FieldId::MaxIterations, Value::Count(n)) => self.max_iterations = Some(n),
            (FieldId::DistanceX, Value::Row(v)) => self.distance_x = Some(v),
            (FieldId::DistanceY, Value::Row(v)) => self.distance_y = Some(v),
            (FieldId::TopFlags, Value::Row(v)) => self.top = Some(to_flags(&v)),
            (FieldId::BottomFlags, Value::Row(v)) => self.bottom = Some(to_flags(&v)),
            (FieldId::LeftFlags, Value::Row(v)) => self.left = Some(to_flags(&v)),
            (FieldId::RightFlags, Value::Row(v)) => self.right = Some(to_flags(&v)),
            (FieldId::Head, Value::Grid(f)) => self.head = Some(f),
            (FieldId::ConductivityX, Value::Grid(f)) => self.conductivity_x = Some(f),
            (FieldId::ConductivityY, Value::Grid(f)) => self.conductivity_y = Some(f),
            (FieldId::Pumping, Value::Grid(f)) => self.pumping = Some(f),
            _ => {
                return Err(GwError::InvalidArg {
                    what: "schema field shape does not match its kind",
                }
                .into());
            }
        }
        Ok(())
    }

    fn finish(self) -> GridResult<GridModel> {
        Ok(GridModel {
            spacing: Spacing {
                dx: take(self.dx, "dx")?,
                dy: take(self.dy, "dy")?,
                dz: take(self.dz, "dz")?,
            },
            nrows: take(self.nrows, "nrows")?,
            ncols: take(self.ncols, "ncols")?,
            tolerance: take(self.tolerance, "tolerance")?,
            max_iterations: take(self.max_iterations, "max_iterations")?,
            distance_x: take(self.distance_x, "x_distances")?,
            distance_y: take(self.distance_y, "y_distances")?,
            boundaries: Boundaries {
                top: take(self.top, "top_boundary")?,
                bottom: take(self.bottom, "bottom_boundary")?,
                left: take(self.left, "left_boundary")?,
                right: take(self.right, "right_boundary")?,
            },
            head: take(self.head, "initial_head")?,
            conductivity_x: take(self.conductivity_x, "conductivity_x")?,
            conductivity_y: take(self.conductivity_y, "conductivity_y")?,
            pumping: take(self.pumping, "pumping")?,
        })
    }
}

fn take<T>(v: Option<T>, what: &'static str) -> GridResult<T> {
    v.ok_or_else(|| GwError::InvalidArg { what }.into())
}

fn to_flags(values: &[Real]) -> Vec<BoundaryFlag> {
    values.iter().copied().map(BoundaryFlag::from_value).collect()
}
