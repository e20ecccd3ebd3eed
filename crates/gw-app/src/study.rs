//! Influence study definition, loaded from YAML.
//!
//! ```yaml
//! base: base-case.txt
//! output: influence.out
//! threads: 4
//! unit_rate: 1.0e6
//! wells:
//!   - id: lake-edge
//!     input: pump-lake.txt
//!   - id: w-3-3
//!     cell: [3, 3]
//! monitored:
//!   - id: village
//!     row: 5
//!     col: 1
//! ```
//!
//! Relative paths resolve against the directory holding the study file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use gw_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_UNIT_RATE: Real = 1.0e6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceStudy {
    /// Unpumped input artifact every well case is compared against.
    pub base: PathBuf,
    pub wells: Vec<WellCase>,
    pub monitored: Vec<MonitoredCell>,
    /// Drawdown table path.
    pub output: PathBuf,
    /// Where per-case head artifacts go. Defaults to next to each input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Worker threads for the case solves. Defaults to the rayon global pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    /// Pumping added to the base model for `cell` wells.
    #[serde(default = "default_unit_rate")]
    pub unit_rate: Real,
}

fn default_unit_rate() -> Real {
    DEFAULT_UNIT_RATE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellCase {
    pub id: String,
    #[serde(flatten)]
    pub source: WellSource,
}

/// Where a well case's model comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WellSource {
    /// A complete input artifact of its own.
    Input { input: PathBuf },
    /// The base model with `unit_rate` added at one cell.
    Cell { cell: [usize; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredCell {
    pub id: String,
    pub row: usize,
    pub col: usize,
}

impl InfluenceStudy {
    /// Rewrite relative paths so they hang off `dir`.
    pub fn resolve_paths(&mut self, dir: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        join(&mut self.base);
        join(&mut self.output);
        if let Some(out) = self.output_dir.as_mut() {
            join(out);
        }
        for well in &mut self.wells {
            if let WellSource::Input { input } = &mut well.source {
                join(input);
            }
        }
    }
}

/// Load a study from YAML and resolve its paths against the file's directory.
pub fn load_study(path: &Path) -> AppResult<InfluenceStudy> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::StudyFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut study: InfluenceStudy = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Study(format!("Failed to parse study YAML: {}", e)))?;

    if let Some(dir) = path.parent() {
        study.resolve_paths(dir);
    }
    validate_study(&study)?;
    Ok(study)
}

/// Structural checks that need no grid data.
pub fn validate_study(study: &InfluenceStudy) -> AppResult<()> {
    if study.wells.is_empty() {
        return Err(AppError::Validation(
            "Study must list at least one well".to_string(),
        ));
    }
    if study.monitored.is_empty() {
        return Err(AppError::Validation(
            "Study must list at least one monitored cell".to_string(),
        ));
    }
    if study.threads == Some(0) {
        return Err(AppError::Validation(
            "threads must be at least 1".to_string(),
        ));
    }
    if !study.unit_rate.is_finite() {
        return Err(AppError::Validation(format!(
            "unit_rate must be finite, got {}",
            study.unit_rate
        )));
    }

    let mut seen = HashSet::new();
    for well in &study.wells {
        if !seen.insert(well.id.as_str()) {
            return Err(AppError::Validation(format!(
                "Duplicate well id '{}'",
                well.id
            )));
        }
    }
    let mut seen = HashSet::new();
    for cell in &study.monitored {
        if !seen.insert(cell.id.as_str()) {
            return Err(AppError::Validation(format!(
                "Duplicate monitored cell id '{}'",
                cell.id
            )));
        }
    }

    Ok(())
}
