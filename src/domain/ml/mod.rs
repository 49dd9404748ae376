pub mod artifacts;
pub mod feature_registry;
pub mod scaler;

pub use artifacts::{ModelArtifacts, ModelState, Regressor};
pub use feature_registry::{FEATURE_NAMES, FeatureVector};
pub use scaler::FeatureScaler;
