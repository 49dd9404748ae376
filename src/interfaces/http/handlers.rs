//! API route handlers

use super::AppState;
use super::api_error::ApiError;
use crate::domain::ports::Clock;
use crate::domain::prediction::{PricePredictionRequest, PredictionResult};
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use std::time::Instant;
use tracing::{info, warn};

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Finance AI Service is running",
        "model_loaded": state.predictor.is_ready(),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let timestamp = state
        .predictor
        .clock()
        .now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string();

    Json(json!({
        "status": "healthy",
        "model_loaded": state.predictor.is_ready(),
        "timestamp": timestamp,
    }))
}

pub async fn predict_price(
    State(state): State<AppState>,
    Json(request): Json<PricePredictionRequest>,
) -> Result<Json<PredictionResult>, ApiError> {
    let started = Instant::now();
    let outcome = state.predictor.predict_request(&request);
    let latency = started.elapsed().as_secs_f64();

    match outcome {
        Ok(result) => {
            state.metrics.record_prediction("ok", latency);
            info!(
                "Predicted {} -> {:.2} (current {:.2}, confidence {:.2})",
                result.symbol, result.predicted_price, result.current_price, result.confidence
            );
            Ok(Json(result))
        }
        Err(e) => {
            state.metrics.record_prediction(e.category(), latency);
            warn!("Prediction for {} rejected: {}", request.symbol, e);
            Err(e.into())
        }
    }
}
