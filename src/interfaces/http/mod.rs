//! REST interface: `/`, `/health` and `/predict-price`.

pub mod api_error;
pub mod handlers;

use crate::application::ml::PricePredictor;
use crate::infrastructure::observability::Metrics;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<PricePredictor>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(predictor: Arc<PricePredictor>, metrics: Metrics) -> Self {
        Self { predictor, metrics }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/predict-price", post(handlers::predict_price))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
