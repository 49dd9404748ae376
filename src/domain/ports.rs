use crate::domain::errors::ModelStoreError;
use crate::domain::ml::ModelArtifacts;
use chrono::NaiveDateTime;

/// Source of wall-clock time for calendar features and timestamps
pub trait Clock: Send + Sync {
    /// Local wall-clock time
    fn now(&self) -> NaiveDateTime;
}

/// Persistence for the regressor/scaler pair.
///
/// Implementations must load and save both artifacts together; a load that
/// finds only one of them reports it as missing.
pub trait ModelStore: Send + Sync {
    fn load_pair(&self) -> Result<ModelArtifacts, ModelStoreError>;

    fn save_pair(&self, artifacts: &ModelArtifacts) -> Result<(), ModelStoreError>;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}
