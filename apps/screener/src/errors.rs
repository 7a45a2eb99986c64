use std::path::PathBuf;

use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::models::screening::DocumentHandle;

/// The only failure that aborts a batch: without a job description there is
/// nothing to classify against.
#[derive(Debug, Error)]
pub enum BatchFatalError {
    #[error("could not load job description from {handle}: {source}")]
    JobDescription {
        handle: DocumentHandle,
        #[source]
        source: ExtractionError,
    },
}

/// Application-level error type for the `screener` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No resume PDF files found in folder: {}", .0.display())]
    NoResumes(PathBuf),

    #[error("Cannot read resume folder {}: {source}", path.display())]
    ResumeFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Batch aborted: {0}")]
    Batch(#[from] BatchFatalError),

    #[error("Failed to write report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
