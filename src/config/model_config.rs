//! Model lifecycle configuration parsing from environment variables.
//!
//! Controls where the artifact pair lives and how the synthetic model is
//! trained when no usable artifacts are found.

use crate::application::ml::TrainingConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub model_dir: PathBuf,
    pub training: TrainingConfig,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model"),
            training: TrainingConfig::default(),
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = TrainingConfig::default();

        let model_dir = env::var("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("model"));

        let training = TrainingConfig {
            samples: Self::parse("MODEL_TRAINING_SAMPLES", defaults.samples)?,
            n_trees: Self::parse("MODEL_N_TREES", defaults.n_trees)?,
            seed: Self::parse("MODEL_SEED", defaults.seed)?,
        };

        if training.samples == 0 {
            anyhow::bail!("MODEL_TRAINING_SAMPLES must be greater than zero");
        }
        if training.n_trees == 0 {
            anyhow::bail!("MODEL_N_TREES must be greater than zero");
        }

        Ok(Self {
            model_dir,
            training,
        })
    }

    fn parse<T>(key: &str, default: T) -> Result<T>
    where
        T: FromStr + ToString,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<T>()
            .context(format!("Failed to parse {}", key))
    }
}
