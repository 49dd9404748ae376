use crate::domain::errors::PredictionError;
use crate::domain::ml::{FeatureVector, ModelState};
use crate::domain::ports::Clock;
use crate::domain::prediction::{
    HistoricalRecord, PricePredictionRequest, PredictionResult, round_to_cents,
};
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Placeholder confidence: `base + U(0, spread)`.
///
/// Carries no statistical meaning; the model exposes no calibrated
/// uncertainty and none is derived here.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceSynthesizer {
    pub base: f64,
    pub spread: f64,
}

impl Default for ConfidenceSynthesizer {
    fn default() -> Self {
        Self {
            base: 0.7,
            spread: 0.2,
        }
    }
}

impl ConfidenceSynthesizer {
    pub fn sample(&self) -> f64 {
        let mut rng = rand::rng();
        self.base + rng.random_range(0.0..=self.spread)
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.base, self.base + self.spread)
    }
}

/// Request pipeline: features -> scaler -> forest -> rounded result
pub struct PricePredictor {
    state: Arc<ModelState>,
    clock: Arc<dyn Clock>,
    confidence: ConfidenceSynthesizer,
}

impl PricePredictor {
    pub fn new(state: Arc<ModelState>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state,
            clock,
            confidence: ConfidenceSynthesizer::default(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn predict(
        &self,
        symbol: &str,
        current_price: f64,
        historical_data: &[HistoricalRecord],
        risk_tolerance: &str,
    ) -> Result<PredictionResult, PredictionError> {
        let artifacts = self
            .state
            .artifacts()
            .ok_or(PredictionError::ServiceUnavailable)?;

        let latest = historical_data
            .last()
            .ok_or_else(|| PredictionError::invalid_input("Historical data required"))?;

        let now = self.clock.now();
        let features = FeatureVector::from_latest_record(current_price, latest, now)?;
        let predicted = artifacts.predict(&features)?;
        let confidence = self.confidence.sample();

        debug!(
            "Prediction for {} (risk: {}): features={:?} -> {:.4}",
            symbol, risk_tolerance, features, predicted
        );

        Ok(PredictionResult {
            symbol: symbol.to_string(),
            current_price,
            predicted_price: round_to_cents(predicted),
            confidence: round_to_cents(confidence),
            prediction_date: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        })
    }

    pub fn predict_request(
        &self,
        request: &PricePredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        self.predict(
            &request.symbol,
            request.current_price,
            &request.historical_data,
            &request.user_risk_tolerance,
        )
    }
}
