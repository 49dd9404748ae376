use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Per-feature standardization: `(x - mean) / std`.
///
/// Uses the population standard deviation. A constant column gets a scale of
/// 1.0 so it maps to zero instead of NaN.
///
/// Deserialization goes through [`FeatureScaler::from_parts`], so a persisted
/// scaler with mismatched lengths or a zero scale never loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScalerParams")]
pub struct FeatureScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

#[derive(Deserialize)]
struct ScalerParams {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl TryFrom<ScalerParams> for FeatureScaler {
    type Error = ModelError;

    fn try_from(params: ScalerParams) -> Result<Self, Self::Error> {
        Self::from_parts(params.means, params.scales)
    }
}

impl FeatureScaler {
    pub fn from_parts(means: Vec<f64>, scales: Vec<f64>) -> Result<Self, ModelError> {
        let invalid = |reason: String| Err(ModelError::InvalidScaler { reason });

        if means.is_empty() {
            return invalid("no features".to_string());
        }
        if means.len() != scales.len() {
            return invalid(format!(
                "{} means but {} scales",
                means.len(),
                scales.len()
            ));
        }
        if let Some(i) = means.iter().position(|m| !m.is_finite()) {
            return invalid(format!("mean {} is not finite", i));
        }
        if let Some(i) = scales.iter().position(|s| !(s.is_finite() && *s > 0.0)) {
            return invalid(format!("scale {} is not a positive finite number", i));
        }

        Ok(Self { means, scales })
    }

    pub fn fit(samples: &[Vec<f64>]) -> Result<Self, ModelError> {
        let width = samples.first().map(Vec::len).ok_or(ModelError::EmptyDataset)?;

        if let Some(bad) = samples.iter().find(|row| row.len() != width) {
            return Err(ModelError::Shape {
                expected: width,
                actual: bad.len(),
            });
        }

        let mut means = Vec::with_capacity(width);
        let mut scales = Vec::with_capacity(width);

        for col in 0..width {
            let column: Vec<f64> = samples.iter().map(|row| row[col]).collect();
            let mean = column.iter().mean();
            let std_dev = column.iter().population_std_dev();

            means.push(mean);
            scales.push(if std_dev > 0.0 && std_dev.is_finite() {
                std_dev
            } else {
                1.0
            });
        }

        Self::from_parts(means, scales)
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.n_features() {
            return Err(ModelError::Shape {
                expected: self.n_features(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }

    pub fn transform_all(&self, samples: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ModelError> {
        samples.iter().map(|row| self.transform(row)).collect()
    }
}
