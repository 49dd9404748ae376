use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the prediction pipeline.
///
/// Each variant maps onto one user-visible failure category at the HTTP
/// boundary: model not ready, bad request data, or an unexpected failure
/// while preparing features or running inference.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Model not loaded")]
    ServiceUnavailable,

    #[error("{reason}")]
    InvalidInput { reason: String },

    #[error("Prediction error: {reason}")]
    Internal { reason: String },
}

impl PredictionError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Stable category name used in error bodies and metric labels
    pub fn category(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "service_unavailable",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Internal { .. } => "internal_error",
        }
    }
}

/// Errors raised while reading or writing the persisted artifact pair
#[derive(Debug, Error)]
pub enum ModelStoreError {
    #[error("Artifact not found at {path:?}")]
    Missing { path: PathBuf },

    #[error("Artifact at {path:?} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize artifact for {path:?}: {reason}")]
    Serialization { path: PathBuf, reason: String },
}

/// Errors raised while fitting or validating the model pair
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Training failed: {reason}")]
    Training { reason: String },

    #[error("Feature shape mismatch: expected {expected} features, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("Cannot fit scaler on an empty sample set")]
    EmptyDataset,

    #[error("Invalid scaler: {reason}")]
    InvalidScaler { reason: String },

    #[error("Model pair failed verification: {reason}")]
    Verification { reason: String },

    #[error(transparent)]
    Store(#[from] ModelStoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_error_categories() {
        assert_eq!(
            PredictionError::ServiceUnavailable.category(),
            "service_unavailable"
        );
        assert_eq!(
            PredictionError::invalid_input("x").category(),
            "invalid_input"
        );
        assert_eq!(PredictionError::internal("x").category(), "internal_error");
    }

    #[test]
    fn test_internal_error_carries_message() {
        let err = PredictionError::internal("matrix was empty");
        assert_eq!(err.to_string(), "Prediction error: matrix was empty");
    }
}
