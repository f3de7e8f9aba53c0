//! Error types for artifact loading, inference and explanation

use std::path::PathBuf;

use thiserror::Error;

use super::features::LayoutMismatchError;

/// Artifact could not be used. Missing files are expected (demo mode),
/// malformed files are logged at warn.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("malformed artifact {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl ArtifactError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ArtifactError::Malformed { path: path.into(), reason: reason.to_string() }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ArtifactError::Missing { .. })
    }
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error("scaler expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid model output: {0}")]
    InvalidOutput(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("background dataset is empty")]
    EmptyBackground,

    #[error("instance has {actual} features, explainer was fitted on {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("classifier failed on perturbed samples: {0}")]
    Inference(#[from] InferenceError),

    #[error("surrogate fit failed: {0}")]
    Numerical(String),
}
