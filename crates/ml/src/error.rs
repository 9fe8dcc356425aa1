use corners_models::CornersError;
use thiserror::Error;

/// Errors raised while building datasets, fitting or loading models.
#[derive(Error, Debug)]
pub enum MlError {
    #[error("Not enough training rows: {rows} (need at least {required})")]
    InsufficientData { rows: usize, required: usize },

    #[error("Invalid hyperparameter {name}: {reason}")]
    InvalidHyperparameter { name: &'static str, reason: String },

    #[error("Model training failed: {reason}")]
    TrainingFailed { reason: String },

    #[error(transparent)]
    Linfa(#[from] linfa::Error),

    #[error(transparent)]
    Corners(#[from] CornersError),
}

pub type Result<T> = std::result::Result<T, MlError>;
