use std::path::PathBuf;

use thiserror::Error;

/// Task-level failure modes shared by the extraction and spectral stages.
///
/// Each variant is fatal for the task that produced it only; the stage
/// barrier collects and reports them after all sibling tasks have run.
#[derive(Debug, Error)]
pub enum QcError {
    #[error("unknown genome build: {0}")]
    UnknownBuild(String),
    #[error("could not read alignment input {}: {}", path.display(), reason)]
    InputRead { path: PathBuf, reason: String },
    #[error("could not write output {}: {}", path.display(), reason)]
    OutputWrite { path: PathBuf, reason: String },
    #[error("malformed coverage file {}: {}", path.display(), reason)]
    CoverageFormat { path: PathBuf, reason: String },
    #[error("no coverage files found for sample {0}")]
    NoCoverageData(String),
}
