//! Synthetic training set and model fitting.
//!
//! The regressor is trained on generated data only: each sample draws price,
//! volume, calendar and volatility features independently, and the target is
//! the price perturbed by 2% Gaussian noise.

use crate::domain::errors::ModelError;
use crate::domain::ml::{FeatureScaler, ModelArtifacts, Regressor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::info;

/// Standard deviation of the multiplicative target noise
const TARGET_NOISE_STD: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingConfig {
    pub samples: usize,
    pub n_trees: usize,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            n_trees: 100,
            seed: 42,
        }
    }
}

/// Raw feature rows (see `FEATURE_NAMES`) and their target prices
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl SyntheticDataset {
    pub fn generate(samples: usize, seed: u64) -> Result<Self, ModelError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, TARGET_NOISE_STD).map_err(|e| ModelError::Training {
            reason: format!("Invalid noise distribution: {}", e),
        })?;

        let mut features = Vec::with_capacity(samples);
        let mut targets = Vec::with_capacity(samples);

        for _ in 0..samples {
            let price: f64 = rng.random_range(10.0..500.0);
            let volume: f64 = rng.random_range(1000.0..1_000_000.0);
            let day_of_week = rng.random_range(0..7u32);
            let month = rng.random_range(1..13u32);
            let volatility: f64 = rng.random_range(0.01..0.5);

            features.push(vec![
                price,
                volume,
                day_of_week as f64,
                month as f64,
                volatility,
            ]);
            targets.push(price * (1.0 + noise.sample(&mut rng)));
        }

        Ok(Self { features, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Splits off the trailing `fraction` of samples as a hold-out set
    pub fn split(&self, fraction: f64) -> (SyntheticDataset, SyntheticDataset) {
        let fraction = fraction.clamp(0.0, 1.0);
        let cut = self.len() - (self.len() as f64 * fraction).floor() as usize;
        (
            SyntheticDataset {
                features: self.features[..cut].to_vec(),
                targets: self.targets[..cut].to_vec(),
            },
            SyntheticDataset {
                features: self.features[cut..].to_vec(),
                targets: self.targets[cut..].to_vec(),
            },
        )
    }
}

/// Fits the scaler on raw features, then the forest on scaled features
pub fn fit_artifacts(
    dataset: &SyntheticDataset,
    config: &TrainingConfig,
) -> Result<ModelArtifacts, ModelError> {
    let scaler = FeatureScaler::fit(&dataset.features)?;
    let scaled = scaler.transform_all(&dataset.features)?;

    let x = DenseMatrix::from_2d_vec(&scaled).map_err(|e| ModelError::Training {
        reason: format!("Matrix error: {}", e),
    })?;

    let params = RandomForestRegressorParameters::default()
        .with_n_trees(config.n_trees)
        .with_seed(config.seed);

    info!(
        "Training Random Forest Regressor (Trees: {}, Samples: {})...",
        config.n_trees,
        dataset.len()
    );

    let regressor: Regressor =
        RandomForestRegressor::fit(&x, &dataset.targets, params).map_err(|e| {
            ModelError::Training {
                reason: e.to_string(),
            }
        })?;

    ModelArtifacts::new(regressor, scaler)
}

/// Generates the synthetic set and fits a fresh pair
pub fn train_synthetic(config: &TrainingConfig) -> Result<ModelArtifacts, ModelError> {
    let dataset = SyntheticDataset::generate(config.samples, config.seed)?;
    fit_artifacts(&dataset, config)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationReport {
    pub samples: usize,
    pub rmse: f64,
    pub mae: f64,
}

/// Scores a fitted pair against a labelled set
pub fn evaluate(
    artifacts: &ModelArtifacts,
    dataset: &SyntheticDataset,
) -> Result<EvaluationReport, ModelError> {
    if dataset.is_empty() {
        return Err(ModelError::EmptyDataset);
    }

    let scaled = artifacts.scaler().transform_all(&dataset.features)?;
    let x = DenseMatrix::from_2d_vec(&scaled).map_err(|e| ModelError::Training {
        reason: format!("Matrix error: {}", e),
    })?;
    let predictions = artifacts
        .regressor()
        .predict(&x)
        .map_err(|e| ModelError::Training {
            reason: format!("Predict error: {}", e),
        })?;

    let n = predictions.len() as f64;
    let sq_err: f64 = predictions
        .iter()
        .zip(&dataset.targets)
        .map(|(p, t)| (p - t).powi(2))
        .sum();
    let abs_err: f64 = predictions
        .iter()
        .zip(&dataset.targets)
        .map(|(p, t)| (p - t).abs())
        .sum();

    Ok(EvaluationReport {
        samples: predictions.len(),
        rmse: (sq_err / n).sqrt(),
        mae: abs_err / n,
    })
}
