use std::path::PathBuf;
use thiserror::Error;

/// Domain errors shared by every crate in the workspace.
#[derive(Error, Debug)]
pub enum CornersError {
    #[error("Required artifact missing: {path}")]
    MissingArtifact { path: PathBuf },

    #[error("Feature schema mismatch: model expects {expected:?}, pipeline produces {found:?}")]
    SchemaMismatch { expected: Vec<String>, found: Vec<String> },

    #[error("Invalid odds: {0}")]
    InvalidOdds(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CornersError>;
