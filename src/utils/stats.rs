use serde::{Deserialize, Serialize};

/// Arithmetic mean using a running update, so a constant series yields a
/// mean bit-identical to its values. Empty input yields `NaN`.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    values
        .iter()
        .enumerate()
        .fold(0.0, |mean, (i, value)| mean + (value - mean) / (i + 1) as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
}

impl SeriesStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);

        Some(Self {
            max,
            min,
            mean: mean(values),
        })
    }
}
