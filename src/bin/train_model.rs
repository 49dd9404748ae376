//! Offline trainer: regenerates and persists the regressor/scaler pair.
//!
//! The server trains on its own when no artifacts exist; this binary forces a
//! fresh pair and reports hold-out error first.

use anyhow::{Context, Result};
use clap::Parser;
use pricecast::application::ml::TrainingConfig;
use pricecast::application::ml::training::{SyntheticDataset, evaluate, fit_artifacts};
use pricecast::domain::ports::ModelStore;
use pricecast::infrastructure::model_store::FileModelStore;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to write price_predictor.json and scaler.json into
    #[arg(long, default_value = "model")]
    model_dir: PathBuf,

    /// Number of synthetic samples to generate
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 100)]
    n_trees: usize,

    /// Seed for both data generation and the forest
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of samples held out for evaluation (0 disables). The final
    /// model is always fitted on every sample.
    #[arg(long, default_value_t = 0.2)]
    holdout: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = TrainingConfig {
        samples: args.samples,
        n_trees: args.n_trees,
        seed: args.seed,
    };

    println!(
        "Generating {} synthetic samples (seed {})...",
        config.samples, config.seed
    );
    let dataset = SyntheticDataset::generate(config.samples, config.seed)?;

    if args.holdout > 0.0 {
        let (train, test) = dataset.split(args.holdout);
        if train.is_empty() || test.is_empty() {
            println!("Hold-out split left an empty side; skipping evaluation.");
        } else {
            println!(
                "Evaluating on hold-out (train={}, test={})...",
                train.len(),
                test.len()
            );
            let candidate = fit_artifacts(&train, &config)?;
            let report = evaluate(&candidate, &test)?;
            println!(
                "OOS Test (n={}): RMSE={:.4}, MAE={:.4}",
                report.samples, report.rmse, report.mae
            );
        }
    }

    println!(
        "Training Random Forest Regressor (Trees: {}) on {} samples...",
        config.n_trees,
        dataset.len()
    );
    let started = Instant::now();
    let artifacts = fit_artifacts(&dataset, &config)?;
    println!("Trained in {:.2}s", started.elapsed().as_secs_f64());

    let store = FileModelStore::new(&args.model_dir);
    store
        .save_pair(&artifacts)
        .with_context(|| format!("Failed to save model to {:?}", args.model_dir))?;

    println!(
        "Done. Model saved to {:?} and {:?}.",
        store.regressor_path(),
        store.scaler_path()
    );
    Ok(())
}
