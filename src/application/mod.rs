// Model lifecycle and prediction pipeline
pub mod ml;

// Service wiring and startup
pub mod system;
