//! Result Emitter: the head field as a plain text artifact.
//!
//! Layout: the artifact's own name on the first line, then one line per grid
//! row of space-separated heads. Values use the shortest representation that
//! reads back to the same `f64`.
//!
//! Exponents are written without padding or a plus sign: `1e-5` and `1e16`,
//! where Python's `str` gives `1e-05` and `1e+16`. Only heads below 1e-4 or
//! at least 1e16 in magnitude differ textually from the reference `.out`
//! files; the values parse identically.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gw_core::{Field, Real, field_from_rows};
use tracing::debug;

use crate::{ResultsError, ResultsResult};

/// Suffix removed from input names before the output suffix is added.
pub const INPUT_SUFFIX: &str = ".txt";
pub const OUTPUT_SUFFIX: &str = ".out";

/// Derive the output artifact path from the input path.
///
/// `cases/base-case.txt` becomes `cases/base-case.out`; names without the
/// input suffix get the output suffix appended.
pub fn output_path_for(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(INPUT_SUFFIX).unwrap_or(&name);
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
}

/// Write `head` to `path`, replacing any existing file.
pub fn write_head_artifact(path: &Path, head: &Field) -> ResultsResult<()> {
    let file = File::create(path).map_err(|e| ResultsError::io(path, e))?;
    let mut w = BufWriter::new(file);
    let io = |e| ResultsError::io(path, e);

    writeln!(w, "{}", path.display()).map_err(io)?;
    for i in 0..head.nrows() {
        let line = (0..head.ncols())
            .map(|j| format!("{:?}", head[(i, j)]))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(w, "{line}").map_err(io)?;
    }
    w.flush().map_err(io)?;

    debug!(path = %path.display(), nrows = head.nrows(), ncols = head.ncols(), "wrote head artifact");
    Ok(())
}

/// A head artifact read back from disk.
#[derive(Debug, Clone)]
pub struct HeadArtifact {
    /// The echoed name on the first line.
    pub label: String,
    pub head: Field,
}

/// Read an artifact written by [`write_head_artifact`].
pub fn read_head_artifact(path: &Path) -> ResultsResult<HeadArtifact> {
    let text = std::fs::read_to_string(path).map_err(|e| ResultsError::io(path, e))?;
    let malformed = |line: usize, what: String| ResultsError::Malformed {
        path: path.to_path_buf(),
        line,
        what,
    };

    let mut lines = text.lines().enumerate();
    let label = lines
        .next()
        .map(|(_, l)| l.trim().to_string())
        .ok_or_else(|| malformed(1, "empty artifact".to_string()))?;

    let mut rows: Vec<Vec<Real>> = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<Real>()
                    .map_err(|_| malformed(idx + 1, format!("invalid head value '{tok}'")))
            })
            .collect::<ResultsResult<Vec<_>>>()?;
        rows.push(row);
    }

    let ncols = rows.first().map(Vec::len).unwrap_or(0);
    let head = field_from_rows(&rows, ncols).map_err(|e| malformed(0, e.to_string()))?;
    Ok(HeadArtifact { label, head })
}
