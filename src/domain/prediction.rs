use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One free-form historical record (e.g. `{"close": 99.1, "volume": 500000}`)
pub type HistoricalRecord = Map<String, Value>;

fn default_risk_tolerance() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePredictionRequest {
    pub symbol: String,
    pub current_price: f64,
    pub historical_data: Vec<HistoricalRecord>,
    #[serde(default = "default_risk_tolerance")]
    pub user_risk_tolerance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub symbol: String,
    pub current_price: f64,
    pub predicted_price: f64,
    /// Placeholder score, not a calibrated confidence interval
    pub confidence: f64,
    pub prediction_date: String,
}

/// Rounds half-to-even at two decimal places on the exact binary value.
///
/// Values outside the Decimal range are returned unchanged.
pub fn round_to_cents(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(101.2449), 101.24);
        assert_eq!(round_to_cents(0.876), 0.88);
        assert_eq!(round_to_cents(-3.14159), -3.14);
        assert_eq!(
            Decimal::from_f64(round_to_cents(99.999)).unwrap(),
            dec!(100)
        );
    }

    #[test]
    fn test_request_defaults_risk_tolerance() {
        let request: PricePredictionRequest = serde_json::from_str(
            r#"{"symbol":"AAPL","current_price":100.0,"historical_data":[{"volume":500000}]}"#,
        )
        .unwrap();
        assert_eq!(request.user_risk_tolerance, "medium");
        assert_eq!(request.historical_data.len(), 1);
    }
}
