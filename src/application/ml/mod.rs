pub mod lifecycle;
pub mod predictor;
pub mod training;

pub use lifecycle::{ModelLifecycleManager, ModelStatus};
pub use predictor::{ConfidenceSynthesizer, PricePredictor};
pub use training::{TrainingConfig, train_synthetic};
