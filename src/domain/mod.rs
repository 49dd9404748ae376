// Domain-specific error types
pub mod errors;

// Feature vector, scaler and the model pair
pub mod ml;

// Port interfaces
pub mod ports;

// Request / result records
pub mod prediction;
