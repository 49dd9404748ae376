use super::feature_registry::{DEFAULT_VOLATILITY, DEFAULT_VOLUME, FEATURE_COUNT, FeatureVector};
use super::scaler::FeatureScaler;
use crate::domain::errors::{ModelError, PredictionError};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

pub type Regressor = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// The fitted regressor together with the scaler it was trained behind.
///
/// The two are only ever constructed, persisted and loaded as one value, so a
/// scaler from one training run can never be paired with another run's trees.
/// Both persisted halves carry the same `training_id`.
pub struct ModelArtifacts {
    training_id: Uuid,
    regressor: Regressor,
    scaler: FeatureScaler,
}

impl ModelArtifacts {
    /// Pairs freshly fitted halves under a new training id
    pub fn new(regressor: Regressor, scaler: FeatureScaler) -> Result<Self, ModelError> {
        Self::with_training_id(Uuid::new_v4(), regressor, scaler)
    }

    /// Re-pairs halves read back from storage under their recorded id
    pub fn with_training_id(
        training_id: Uuid,
        regressor: Regressor,
        scaler: FeatureScaler,
    ) -> Result<Self, ModelError> {
        if scaler.n_features() != FEATURE_COUNT {
            return Err(ModelError::Shape {
                expected: FEATURE_COUNT,
                actual: scaler.n_features(),
            });
        }
        Ok(Self {
            training_id,
            regressor,
            scaler,
        })
    }

    pub fn training_id(&self) -> Uuid {
        self.training_id
    }

    pub fn regressor(&self) -> &Regressor {
        &self.regressor
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    /// Scales the raw vector and returns the regressor's point estimate
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        let scaled = self
            .scaler
            .transform(&features.to_vec())
            .map_err(|e| PredictionError::internal(e.to_string()))?;

        let input = DenseMatrix::from_2d_vec(&vec![scaled])
            .map_err(|e| PredictionError::internal(format!("Matrix creation failed: {}", e)))?;

        // smartcore indexes past the matrix (and panics) when the trees were
        // fitted on more columns than the row has.
        let predictions = panic::catch_unwind(AssertUnwindSafe(|| self.regressor.predict(&input)))
            .map_err(|payload| {
                PredictionError::internal(format!(
                    "Inference panicked: {}",
                    panic_message(payload.as_ref())
                ))
            })?
            .map_err(|e| PredictionError::internal(format!("Inference failed: {}", e)))?;

        let value = predictions
            .first()
            .copied()
            .ok_or_else(|| PredictionError::internal("No prediction returned"))?;

        if !value.is_finite() {
            return Err(PredictionError::internal(format!(
                "Model produced a non-finite prediction ({})",
                value
            )));
        }

        Ok(value)
    }

    /// Runs one prediction on a reference row.
    ///
    /// A pair that deserializes cleanly can still be unusable, e.g. trees
    /// fitted on a different feature width. Run this before publishing a
    /// loaded pair.
    pub fn verify(&self) -> Result<(), ModelError> {
        let reference = FeatureVector {
            price: 100.0,
            volume: DEFAULT_VOLUME,
            day_of_week: 0,
            month: 1,
            volatility: DEFAULT_VOLATILITY,
        };

        self.predict(&reference)
            .map(|_| ())
            .map_err(|e| ModelError::Verification {
                reason: e.to_string(),
            })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Readiness holder for the artifact pair.
///
/// Starts unready; becomes ready exactly once when artifacts are published.
/// After publication the pair is immutable and shared without locking.
#[derive(Default)]
pub struct ModelState {
    artifacts: OnceLock<Arc<ModelArtifacts>>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.artifacts.get().is_some()
    }

    pub fn artifacts(&self) -> Option<Arc<ModelArtifacts>> {
        self.artifacts.get().cloned()
    }

    /// Publishes the pair. Returns `false` if the state was already ready,
    /// in which case the existing pair is kept.
    pub fn publish(&self, artifacts: ModelArtifacts) -> bool {
        self.artifacts.set(Arc::new(artifacts)).is_ok()
    }
}
