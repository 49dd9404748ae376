//! Push-based metrics reporter for pricecast
//!
//! Periodically outputs metrics as structured JSON to stdout.

use crate::domain::ml::ModelState;
use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model_loaded: bool,
    pub predictions: PredictionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct PredictionSnapshot {
    pub ok: u64,
    pub invalid_input: u64,
    pub service_unavailable: u64,
    pub internal_error: u64,
    pub mean_latency_ms: f64,
}

/// Outputs metrics as structured JSON logs on a configurable interval.
/// No scrape endpoint; only outbound data.
pub struct MetricsReporter {
    state: Arc<ModelState>,
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(state: Arc<ModelState>, metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            state,
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Prefix so log shippers can filter metric lines
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Model loaded: {} | Predictions ok: {} | Uptime: {}s",
                        snapshot.model_loaded, snapshot.predictions.ok, snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    pub fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        let ready = self.state.is_ready();

        self.metrics.uptime_seconds.set(uptime as f64);
        self.metrics.set_model_ready(ready);

        let latency = &self.metrics.prediction_latency_seconds;
        let count = latency.get_sample_count();
        let mean_latency_ms = if count > 0 {
            latency.get_sample_sum() / count as f64 * 1000.0
        } else {
            0.0
        };

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_loaded: ready,
            predictions: PredictionSnapshot {
                ok: self.metrics.prediction_count("ok"),
                invalid_input: self.metrics.prediction_count("invalid_input"),
                service_unavailable: self.metrics.prediction_count("service_unavailable"),
                internal_error: self.metrics.prediction_count("internal_error"),
                mean_latency_ms,
            },
        }
    }
}
