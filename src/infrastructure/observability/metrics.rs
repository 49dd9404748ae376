//! Prometheus metrics definitions for pricecast
//!
//! All metrics use the `pricecast_` prefix.

use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the prediction service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Prediction requests by outcome (ok / error category)
    pub predictions_total: CounterVec,
    /// Time spent in the prediction pipeline
    pub prediction_latency_seconds: Histogram,
    /// 1 once the model pair is published, 0 before
    pub model_ready: GenericGauge<AtomicF64>,
    /// Wall time of the last training run
    pub model_training_seconds: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new(
                "pricecast_predictions_total",
                "Total prediction requests by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "pricecast_prediction_latency_seconds",
                "Prediction pipeline latency in seconds",
            )
            .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1]),
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let model_ready = Gauge::with_opts(Opts::new(
            "pricecast_model_ready",
            "Model readiness (0=unready, 1=ready)",
        ))?;
        registry.register(Box::new(model_ready.clone()))?;

        let model_training_seconds = Gauge::with_opts(Opts::new(
            "pricecast_model_training_seconds",
            "Duration of the last model training run",
        ))?;
        registry.register(Box::new(model_training_seconds.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "pricecast_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            prediction_latency_seconds,
            model_ready,
            model_training_seconds,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn record_prediction(&self, outcome: &str, latency: f64) {
        self.predictions_total.with_label_values(&[outcome]).inc();
        self.prediction_latency_seconds.observe(latency);
    }

    pub fn prediction_count(&self, outcome: &str) -> u64 {
        self.predictions_total.with_label_values(&[outcome]).get() as u64
    }

    pub fn set_model_ready(&self, ready: bool) {
        self.model_ready.set(if ready { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        metrics.set_model_ready(true);
        let output = metrics.render();
        assert!(output.contains("pricecast_model_ready 1"));
    }

    #[test]
    fn test_prediction_counter() {
        let metrics = Metrics::new().unwrap();
        metrics.record_prediction("ok", 0.002);
        metrics.record_prediction("ok", 0.003);
        metrics.record_prediction("invalid_input", 0.0001);

        assert_eq!(metrics.prediction_count("ok"), 2);
        assert_eq!(metrics.prediction_count("invalid_input"), 1);
        assert!(metrics.render().contains("pricecast_predictions_total"));
    }
}
