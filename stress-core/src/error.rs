//! Error handling

use thiserror::Error;

use crate::logic::features::LayoutMismatchError;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error at line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("invalid stress level '{0}' (expected 0, 1 or 2)")]
    InvalidLabel(String),

    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("feature '{name}' is not a finite number")]
    NonFiniteFeature { name: String },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("invalid split: {0}")]
    InvalidSplit(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("training data must contain at least 2 stress levels")]
    NotEnoughClasses,

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("artifact kind mismatch: expected {expected}, found {found}")]
    ArtifactKind { expected: String, found: String },

    #[error("artifact checksum mismatch: {path}")]
    Checksum { path: String },
}
