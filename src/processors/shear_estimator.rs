use crate::error::{ProcessingError, Result};
use crate::models::{CityMap, FileKey, MeasurementTable};
use crate::utils::constants::{REFERENCE_HEIGHT, SHEAR_BASE_HEIGHT, SHEAR_INTERCEPT, SHEAR_SLOPE};
use crate::utils::stats::mean;
use std::collections::BTreeMap;
use tracing::debug;

/// Power-law exponent from the mean wind speed at `reference_height`:
///
/// `alpha = (0.37 - 0.088 ln(U_ref)) / (1 - 0.088 ln(Z_ref / 10))`
///
/// Returns `None` when the mean speed is not positive (or not finite).
pub fn shear_exponent(mean_speed: f64, reference_height: f64) -> Option<f64> {
    if !mean_speed.is_finite() || mean_speed <= 0.0 {
        return None;
    }

    let numerator = SHEAR_INTERCEPT - SHEAR_SLOPE * mean_speed.ln();
    let denominator = 1.0 - SHEAR_SLOPE * (reference_height / SHEAR_BASE_HEIGHT).ln();
    Some(numerator / denominator)
}

/// Computes one shear exponent per annual file.
pub struct ShearEstimator {
    reference_height: f64,
}

impl ShearEstimator {
    pub fn new(reference_height: f64) -> Self {
        Self { reference_height }
    }

    pub fn estimate(&self, key: &FileKey, table: &MeasurementTable) -> Result<f64> {
        let mean_speed = mean(&table.wind_speeds());
        shear_exponent(mean_speed, self.reference_height).ok_or_else(|| {
            ProcessingError::ShearDomain {
                city: key.city.clone(),
                file: key.file_name.clone(),
                mean_speed,
            }
        })
    }

    /// Exponents for every file, keyed by (city, file name).
    pub fn estimate_all(&self, data: &CityMap<MeasurementTable>) -> Result<BTreeMap<FileKey, f64>> {
        let mut alphas = BTreeMap::new();

        for (city, files) in data {
            for (file_name, table) in files {
                let key = FileKey::new(city.clone(), file_name.clone());
                let alpha = self.estimate(&key, table)?;
                debug!("Alpha for '{}': {}", key, alpha);
                alphas.insert(key, alpha);
            }
        }

        Ok(alphas)
    }
}

impl Default for ShearEstimator {
    fn default() -> Self {
        Self::new(REFERENCE_HEIGHT)
    }
}
