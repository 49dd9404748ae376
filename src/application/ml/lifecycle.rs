use super::training::{TrainingConfig, train_synthetic};
use crate::domain::errors::{ModelError, ModelStoreError};
use crate::domain::ml::ModelState;
use crate::domain::ports::ModelStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// How the model state became ready
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelStatus {
    /// Already published earlier in this process; nothing was done
    AlreadyReady,
    /// Deserialized from the store
    Loaded,
    /// Freshly trained and persisted
    Trained { duration: Duration },
}

/// Brings the shared model state from "unready" to "ready".
///
/// Tries the store first and falls back to training exactly once. A training
/// or persistence failure leaves the state unready for the rest of the
/// process; there is no retry.
pub struct ModelLifecycleManager {
    store: Arc<dyn ModelStore>,
    state: Arc<ModelState>,
    training: TrainingConfig,
}

impl ModelLifecycleManager {
    pub fn new(
        store: Arc<dyn ModelStore>,
        state: Arc<ModelState>,
        training: TrainingConfig,
    ) -> Self {
        Self {
            store,
            state,
            training,
        }
    }

    pub fn state(&self) -> Arc<ModelState> {
        self.state.clone()
    }

    /// Blocking; run before the server accepts traffic.
    pub fn ensure_model_ready(&self) -> Result<ModelStatus, ModelError> {
        if self.state.is_ready() {
            return Ok(ModelStatus::AlreadyReady);
        }

        match self.store.load_pair() {
            Ok(artifacts) => match artifacts.verify() {
                Ok(()) => {
                    let training_id = artifacts.training_id();
                    self.state.publish(artifacts);
                    info!(
                        "Model {} loaded successfully from {}",
                        training_id,
                        self.store.describe()
                    );
                    return Ok(ModelStatus::Loaded);
                }
                Err(e) => {
                    warn!("Loaded model is unusable: {}. Retraining.", e);
                }
            },
            Err(ModelStoreError::Missing { path }) => {
                info!("No model artifact at {:?}. Training a new model.", path);
            }
            Err(e) => {
                warn!("Error loading model: {}. Retraining.", e);
            }
        }

        let started = Instant::now();
        let artifacts = train_synthetic(&self.training).map_err(|e| {
            error!("Model training failed: {}", e);
            e
        })?;

        self.store.save_pair(&artifacts).map_err(|e| {
            error!("Failed to persist trained model: {}", e);
            ModelError::from(e)
        })?;

        let duration = started.elapsed();
        let training_id = artifacts.training_id();
        self.state.publish(artifacts);
        info!(
            "Model {} trained and saved successfully in {:.2}s ({} samples, {} trees)",
            training_id,
            duration.as_secs_f64(),
            self.training.samples,
            self.training.n_trees
        );

        Ok(ModelStatus::Trained { duration })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::{MismatchedModelStore, UnwritableModelStore};
    use crate::infrastructure::model_store::FileModelStore;
    use tempfile::TempDir;

    fn small_training() -> TrainingConfig {
        TrainingConfig {
            samples: 120,
            n_trees: 5,
            seed: 42,
        }
    }

    #[test]
    fn test_trains_then_reports_already_ready() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(FileModelStore::new(tmp.path().join("model")));
        let manager = ModelLifecycleManager::new(
            store.clone(),
            Arc::new(ModelState::new()),
            small_training(),
        );

        let status = manager.ensure_model_ready().unwrap();
        assert!(matches!(status, ModelStatus::Trained { .. }));
        assert!(manager.state().is_ready());
        assert!(store.regressor_path().exists());
        assert!(store.scaler_path().exists());

        assert_eq!(
            manager.ensure_model_ready().unwrap(),
            ModelStatus::AlreadyReady
        );
    }

    #[test]
    fn test_failed_persist_leaves_state_unready() {
        let store = Arc::new(UnwritableModelStore::new());
        let manager = ModelLifecycleManager::new(
            store.clone(),
            Arc::new(ModelState::new()),
            small_training(),
        );

        let result = manager.ensure_model_ready();
        assert!(matches!(result, Err(ModelError::Store(_))));
        assert!(!manager.state().is_ready());
        assert_eq!(store.load_attempts(), 1);
        assert_eq!(store.save_attempts(), 1);
    }

    #[test]
    fn test_invalid_training_config_leaves_state_unready() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(FileModelStore::new(tmp.path()));
        let config = TrainingConfig {
            samples: 0,
            ..small_training()
        };
        let manager =
            ModelLifecycleManager::new(store.clone(), Arc::new(ModelState::new()), config);

        assert!(manager.ensure_model_ready().is_err());
        assert!(!manager.state().is_ready());
        assert!(!store.regressor_path().exists());
    }

    #[test]
    fn test_unusable_loaded_pair_is_replaced_by_training() {
        let store = Arc::new(MismatchedModelStore::new());
        let manager = ModelLifecycleManager::new(
            store.clone(),
            Arc::new(ModelState::new()),
            small_training(),
        );

        let status = manager.ensure_model_ready().unwrap();
        assert!(matches!(status, ModelStatus::Trained { .. }));
        assert_eq!(store.save_attempts(), 1);

        let published = manager.state().artifacts().unwrap();
        assert!(published.verify().is_ok());
    }
}
