//! gw-results: head artifacts and run manifests.

pub mod artifact;
pub mod hash;
pub mod manifest;

pub use artifact::{
    HeadArtifact, OUTPUT_SUFFIX, INPUT_SUFFIX, output_path_for, read_head_artifact,
    write_head_artifact,
};
pub use hash::compute_input_digest;
pub use manifest::{RunManifest, load_manifest, manifest_path_for, save_manifest};

use std::path::PathBuf;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed head artifact {path} at line {line}: {what}")]
    Malformed {
        path: PathBuf,
        line: usize,
        what: String,
    },
}

impl ResultsError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ResultsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
