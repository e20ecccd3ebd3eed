//! Run manifests: what was solved, from which bytes, and how it ended.

use std::path::{Path, PathBuf};

use gw_grid::GridSummary;
use gw_solver::SolveReport;
use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_digest: String,
    pub solver_version: String,
    pub timestamp: String,
    pub grid: GridSummary,
    pub report: SolveReport,
}

impl RunManifest {
    pub fn new(
        input_path: PathBuf,
        output_path: PathBuf,
        input_digest: String,
        grid: GridSummary,
        report: SolveReport,
    ) -> Self {
        Self {
            input_path,
            output_path,
            input_digest,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            grid,
            report,
        }
    }
}

/// `runs/base-case.out` -> `runs/base-case.manifest.json`
pub fn manifest_path_for(output: &Path) -> PathBuf {
    output.with_extension("manifest.json")
}

pub fn save_manifest(path: &Path, manifest: &RunManifest) -> ResultsResult<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json).map_err(|e| ResultsError::io(path, e))
}

pub fn load_manifest(path: &Path) -> ResultsResult<RunManifest> {
    let content = std::fs::read_to_string(path).map_err(|e| ResultsError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_next_to_output() {
        assert_eq!(
            manifest_path_for(Path::new("runs/base-case.out")),
            PathBuf::from("runs/base-case.manifest.json")
        );
    }
}
