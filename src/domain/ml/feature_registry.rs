use crate::domain::errors::PredictionError;
use chrono::{Datelike, NaiveDateTime};
use serde_json::{Map, Value};

/// Ordered list of feature names.
/// This order MUST match the column order used when the scaler and regressor
/// were fitted. Any change here is a breaking change for persisted artifacts.
pub const FEATURE_NAMES: &[&str] = &["price", "volume", "day_of_week", "month", "volatility"];

pub const FEATURE_COUNT: usize = 5;

/// Volume assumed when the latest historical record carries none
pub const DEFAULT_VOLUME: f64 = 1_000_000.0;

/// Volatility assumed when the latest historical record carries none
pub const DEFAULT_VOLATILITY: f64 = 0.1;

/// Raw (unscaled) model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub price: f64,
    pub volume: f64,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    /// 1 .. 12
    pub month: u32,
    pub volatility: f64,
}

impl FeatureVector {
    /// Builds the feature vector from the most recent historical record.
    ///
    /// Calendar features come from `now`, not from the record, so the same
    /// request yields different vectors on different days.
    pub fn from_latest_record(
        current_price: f64,
        latest: &Map<String, Value>,
        now: NaiveDateTime,
    ) -> Result<Self, PredictionError> {
        Ok(Self {
            price: current_price,
            volume: numeric_field(latest, "volume", DEFAULT_VOLUME)?,
            day_of_week: now.weekday().num_days_from_monday(),
            month: now.month(),
            volatility: numeric_field(latest, "volatility", DEFAULT_VOLATILITY)?,
        })
    }

    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.price,
            self.volume,
            self.day_of_week as f64,
            self.month as f64,
            self.volatility,
        ]
    }
}

fn numeric_field(
    record: &Map<String, Value>,
    name: &str,
    default: f64,
) -> Result<f64, PredictionError> {
    match record.get(name) {
        None => Ok(default),
        Some(value) => value.as_f64().ok_or_else(|| {
            PredictionError::invalid_input(format!(
                "Field '{}' in historical data must be numeric, got {}",
                name, value
            ))
        }),
    }
}
