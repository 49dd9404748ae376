//! Test doubles for the domain ports.

use crate::domain::errors::{ModelError, ModelStoreError};
use crate::domain::ml::{FEATURE_NAMES, FeatureScaler, ModelArtifacts, Regressor};
use crate::domain::ports::{Clock, ModelStore};
use chrono::NaiveDateTime;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}

/// Store with nothing on it that refuses every write.
///
/// Drives the lifecycle into training and then makes persistence fail, which
/// must leave the model state unready.
#[derive(Debug, Default)]
pub struct UnwritableModelStore {
    load_attempts: AtomicUsize,
    save_attempts: AtomicUsize,
}

impl UnwritableModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }

    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

impl ModelStore for UnwritableModelStore {
    fn load_pair(&self) -> Result<ModelArtifacts, ModelStoreError> {
        self.load_attempts.fetch_add(1, Ordering::SeqCst);
        Err(ModelStoreError::Missing {
            path: PathBuf::from("<unwritable>"),
        })
    }

    fn save_pair(&self, _artifacts: &ModelArtifacts) -> Result<(), ModelStoreError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        Err(ModelStoreError::Io {
            path: PathBuf::from("<unwritable>"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store"),
        })
    }

    fn describe(&self) -> String {
        "<unwritable>".to_string()
    }
}

/// A pair whose trees were fitted on two more columns than the scaler emits.
///
/// Every tree splits on one of the extra columns, so any prediction through
/// this pair reads past the end of the input row.
pub fn width_mismatched_artifacts() -> Result<ModelArtifacts, ModelError> {
    let width = FEATURE_NAMES.len() + 2;
    let rows: Vec<Vec<f64>> = (0..200)
        .map(|i| {
            let mut row = vec![0.0; width];
            row[width - 2] = i as f64;
            row[width - 1] = 2.0 * i as f64;
            row
        })
        .collect();
    let targets: Vec<f64> = (0..200).map(|i| i as f64).collect();

    let x = DenseMatrix::from_2d_vec(&rows).map_err(|e| ModelError::Training {
        reason: e.to_string(),
    })?;
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(10)
        .with_m(width)
        .with_seed(42);
    let regressor: Regressor =
        RandomForestRegressor::fit(&x, &targets, params).map_err(|e| ModelError::Training {
            reason: e.to_string(),
        })?;

    let scaler = FeatureScaler::from_parts(
        vec![0.0; FEATURE_NAMES.len()],
        vec![1.0; FEATURE_NAMES.len()],
    )?;
    ModelArtifacts::new(regressor, scaler)
}

/// Store that always hands back [`width_mismatched_artifacts`] and accepts
/// every write.
#[derive(Debug, Default)]
pub struct MismatchedModelStore {
    save_attempts: AtomicUsize,
}

impl MismatchedModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

impl ModelStore for MismatchedModelStore {
    fn load_pair(&self) -> Result<ModelArtifacts, ModelStoreError> {
        width_mismatched_artifacts().map_err(|e| ModelStoreError::Corrupt {
            path: PathBuf::from("<mismatched>"),
            reason: e.to_string(),
        })
    }

    fn save_pair(&self, _artifacts: &ModelArtifacts) -> Result<(), ModelStoreError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "<mismatched>".to_string()
    }
}
