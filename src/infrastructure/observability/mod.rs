//! Push-based observability for pricecast
//!
//! Metrics are kept in a prometheus registry and pushed periodically as
//! structured JSON log lines. The service exposes no scrape endpoint.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
