//! pricecast server - price prediction HTTP service
//!
//! Loads (or trains) the model pair, then serves `/`, `/health` and
//! `/predict-price`. Metrics are pushed via structured JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! MODEL_DIR=model PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `HOST` / `PORT` - Listen address (default: 0.0.0.0:8000)
//! - `MODEL_DIR` - Directory holding the artifact pair (default: model)
//! - `MODEL_TRAINING_SAMPLES`, `MODEL_N_TREES`, `MODEL_SEED` - Fallback training
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::Result;
use pricecast::application::system::Application;
use pricecast::config::Config;
use pricecast::infrastructure::observability::MetricsReporter;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("pricecast server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Listen={}:{}, ModelDir={:?}, Training={:?}",
        config.server.host, config.server.port, config.model.model_dir, config.model.training
    );

    let app = Application::build(config.clone())?;

    if config.observability.enabled {
        let reporter = MetricsReporter::new(
            app.state.clone(),
            app.metrics.clone(),
            config.observability.interval_seconds,
        );

        tokio::spawn(async move {
            reporter.run().await;
        });

        info!(
            "Metrics reporter started (interval: {}s)",
            config.observability.interval_seconds
        );
    } else {
        info!("Metrics reporting disabled.");
    }

    app.serve().await
}
