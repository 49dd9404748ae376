use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use pricecast::application::ml::TrainingConfig;
use pricecast::application::system::Application;
use pricecast::config::Config;
use pricecast::infrastructure::mock::{
    FixedClock, UnwritableModelStore, width_mismatched_artifacts,
};
use pricecast::infrastructure::model_store::FileModelStore;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn test_config() -> Config {
    let mut config = Config::default();
    config.model.training = TrainingConfig {
        samples: 200,
        n_trees: 10,
        seed: 42,
    };
    config
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        NaiveDate::from_ymd_opt(2024, 7, 4)
            .unwrap()
            .and_hms_opt(8, 15, 30)
            .unwrap(),
    ))
}

async fn ready_app(tmp: &TempDir) -> Application {
    let store = Arc::new(FileModelStore::new(tmp.path()));
    let app = Application::with_parts(test_config(), store, clock()).unwrap();
    assert!(app.prepare_model().await.is_some());
    app
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn predict_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict-price")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_predict_price_success() {
    let tmp = TempDir::new().unwrap();
    let app = ready_app(&tmp).await;

    let (status, body) = send(
        app.router(),
        predict_request(json!({
            "symbol": "AAPL",
            "current_price": 100.0,
            "historical_data": [{"volume": 500000, "volatility": 0.2}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["current_price"], 100.0);
    assert!(body["predicted_price"].as_f64().unwrap().is_finite());

    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.70..=0.90).contains(&confidence));
    assert_eq!(body["prediction_date"], "2024-07-04T08:15:30.000000");
    assert_eq!(app.metrics.prediction_count("ok"), 1);
}

#[tokio::test]
async fn test_empty_history_returns_bad_request() {
    let tmp = TempDir::new().unwrap();
    let app = ready_app(&tmp).await;

    let (status, body) = send(
        app.router(),
        predict_request(json!({
            "symbol": "AAPL",
            "current_price": 100.0,
            "historical_data": [],
            "user_risk_tolerance": "high"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["detail"], "Historical data required");
    assert_eq!(app.metrics.prediction_count("invalid_input"), 1);
}

#[tokio::test]
async fn test_non_numeric_volume_returns_bad_request() {
    let tmp = TempDir::new().unwrap();
    let app = ready_app(&tmp).await;

    let (status, body) = send(
        app.router(),
        predict_request(json!({
            "symbol": "AAPL",
            "current_price": 100.0,
            "historical_data": [{"volume": "a lot"}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("volume"));
}

#[tokio::test]
async fn test_predict_before_model_ready_is_unavailable() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(FileModelStore::new(tmp.path()));
    let app = Application::with_parts(test_config(), store, clock()).unwrap();

    let (status, body) = send(
        app.router(),
        predict_request(json!({
            "symbol": "AAPL",
            "current_price": 100.0,
            "historical_data": [{"volume": 500000}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "service_unavailable");
}

#[tokio::test]
async fn test_failed_training_keeps_service_unavailable() {
    let app = Application::with_parts(
        test_config(),
        Arc::new(UnwritableModelStore::new()),
        clock(),
    )
    .unwrap();

    assert!(app.prepare_model().await.is_none());
    assert!(!app.state.is_ready());

    let (status, _) = send(
        app.router(),
        predict_request(json!({
            "symbol": "AAPL",
            "current_price": 100.0,
            "historical_data": [{}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (_, health) = send(app.router(), get("/health")).await;
    assert_eq!(health["model_loaded"], false);
}

#[tokio::test]
async fn test_inference_failure_returns_internal_error() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(FileModelStore::new(tmp.path()));
    let app = Application::with_parts(test_config(), store, clock()).unwrap();
    assert!(app.state.publish(width_mismatched_artifacts().unwrap()));

    let (status, body) = send(
        app.router(),
        predict_request(json!({
            "symbol": "AAPL",
            "current_price": 100.0,
            "historical_data": [{"volume": 500000, "volatility": 0.2}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Prediction error: Inference"), "{}", detail);
    assert_eq!(app.metrics.prediction_count("internal_error"), 1);
}

#[tokio::test]
async fn test_health_and_root_report_readiness() {
    let tmp = TempDir::new().unwrap();
    let app = ready_app(&tmp).await;

    let (status, health) = send(app.router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["model_loaded"], true);
    assert_eq!(health["timestamp"], "2024-07-04T08:15:30.000000");

    let (status, root) = send(app.router(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(root["message"], "Finance AI Service is running");
    assert_eq!(root["model_loaded"], true);
}

#[tokio::test]
async fn test_malformed_body_is_rejected_by_extractor() {
    let tmp = TempDir::new().unwrap();
    let app = ready_app(&tmp).await;

    let (status, _) = send(
        app.router(),
        predict_request(json!({
            "symbol": "AAPL",
            "current_price": "one hundred",
            "historical_data": [{}]
        })),
    )
    .await;

    assert!(status.is_client_error());
    assert_eq!(app.metrics.prediction_count("ok"), 0);
}
