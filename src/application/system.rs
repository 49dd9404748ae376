use crate::application::ml::{ModelLifecycleManager, ModelStatus, PricePredictor};
use crate::config::Config;
use crate::domain::ml::ModelState;
use crate::domain::ports::{Clock, ModelStore};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::model_store::FileModelStore;
use crate::infrastructure::observability::Metrics;
use crate::interfaces::http::{AppState, build_router};
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Wires the model state, lifecycle manager, predictor and HTTP router.
pub struct Application {
    pub config: Config,
    pub state: Arc<ModelState>,
    pub metrics: Metrics,
    pub lifecycle: Arc<ModelLifecycleManager>,
    pub predictor: Arc<PricePredictor>,
}

impl Application {
    /// Production wiring: artifacts on disk, local wall clock
    pub fn build(config: Config) -> Result<Self> {
        let store = Arc::new(FileModelStore::new(config.model.model_dir.clone()));
        Self::with_parts(config, store, Arc::new(SystemClock))
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn ModelStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        info!(
            "Building pricecast application (model dir: {})...",
            store.describe()
        );

        let metrics = Metrics::new().context("Failed to register metrics")?;
        let state = Arc::new(ModelState::new());
        let lifecycle = Arc::new(ModelLifecycleManager::new(
            store,
            state.clone(),
            config.model.training,
        ));
        let predictor = Arc::new(PricePredictor::new(state.clone(), clock));

        Ok(Self {
            config,
            state,
            metrics,
            lifecycle,
            predictor,
        })
    }

    /// Runs load-or-train on the blocking pool.
    ///
    /// Failure is logged, not returned: the service still starts and rejects
    /// predictions as unavailable.
    pub async fn prepare_model(&self) -> Option<ModelStatus> {
        let lifecycle = self.lifecycle.clone();
        let outcome = tokio::task::spawn_blocking(move || lifecycle.ensure_model_ready()).await;

        let status = match outcome {
            Ok(Ok(status)) => Some(status),
            Ok(Err(e)) => {
                error!("Model unavailable for this process: {}", e);
                None
            }
            Err(e) => {
                error!("Model preparation task panicked: {}", e);
                None
            }
        };

        if let Some(ModelStatus::Trained { duration }) = status {
            self.metrics
                .model_training_seconds
                .set(duration.as_secs_f64());
        }
        self.metrics.set_model_ready(self.state.is_ready());

        status
    }

    pub fn router(&self) -> Router {
        build_router(AppState::new(self.predictor.clone(), self.metrics.clone()))
    }

    /// Prepares the model, then binds and serves until Ctrl+C
    pub async fn serve(self) -> Result<()> {
        match self.prepare_model().await {
            Some(status) => info!("Model ready: {:?}", status),
            None => warn!("Serving without a model; /predict-price will return 503"),
        }

        let addr = self.config.server.socket_addr()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!(
            "pricecast v{} listening on {}",
            env!("CARGO_PKG_VERSION"),
            addr
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutdown signal received. Exiting...");
            })
            .await
            .context("HTTP server error")
    }
}
