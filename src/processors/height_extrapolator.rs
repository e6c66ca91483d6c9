use crate::error::{ProcessingError, Result};
use crate::models::{CityMap, FileKey, MeasurementTable};
use std::collections::BTreeMap;

/// Rescales wind speed from the reference height to the target height with
/// `U(Z) = (Z / Z_ref)^alpha * U(Z_ref)`.
pub struct HeightExtrapolator {
    reference_height: f64,
    target_height: f64,
}

impl HeightExtrapolator {
    pub fn new(reference_height: f64, target_height: f64) -> Self {
        Self {
            reference_height,
            target_height,
        }
    }

    pub fn extrapolate(&self, speed: f64, alpha: f64) -> f64 {
        (self.target_height / self.reference_height).powf(alpha) * speed
    }

    pub fn apply(&self, table: &MeasurementTable, alpha: f64) -> MeasurementTable {
        let factor = (self.target_height / self.reference_height).powf(alpha);
        table.map_wind_speed(|speed| factor * speed)
    }

    pub fn apply_all(
        &self,
        data: &CityMap<MeasurementTable>,
        alphas: &BTreeMap<FileKey, f64>,
    ) -> Result<CityMap<MeasurementTable>> {
        let mut extrapolated: CityMap<MeasurementTable> = BTreeMap::new();

        for (city, files) in data {
            let tables = extrapolated.entry(city.clone()).or_default();
            for (file_name, table) in files {
                let key = FileKey::new(city.clone(), file_name.clone());
                let alpha = alphas.get(&key).ok_or_else(|| ProcessingError::MissingAlpha {
                    city: city.clone(),
                    file: file_name.clone(),
                })?;
                tables.insert(file_name.clone(), self.apply(table, *alpha));
            }
        }

        Ok(extrapolated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourReading;

    #[test]
    fn test_extrapolate() {
        let extrapolator = HeightExtrapolator::new(50.0, 80.0);
        let speed = extrapolator.extrapolate(10.0, 0.1949888933536082);
        assert!((speed - 10.959762159762974).abs() < 1e-9);
    }

    #[test]
    fn test_same_height_is_identity() {
        let extrapolator = HeightExtrapolator::new(50.0, 50.0);
        assert_eq!(extrapolator.extrapolate(7.3, 0.25), 7.3);
    }

    #[test]
    fn test_round_trip_restores_speed() {
        let alpha = 0.23915273913217733;
        let up = HeightExtrapolator::new(50.0, 120.0);
        let down = HeightExtrapolator::new(120.0, 50.0);

        for speed in [0.4, 3.0, 6.5, 10.2, 25.0] {
            let back = down.extrapolate(up.extrapolate(speed, alpha), alpha);
            assert!((back - speed).abs() < 1e-12, "speed = {}", speed);
        }
    }

    #[test]
    fn test_apply_all_requires_alpha() {
        let mut data: CityMap<MeasurementTable> = BTreeMap::new();
        data.entry("Karachi".into()).or_default().insert(
            "Karachi (2015).csv".into(),
            MeasurementTable::new(vec![HourReading::new(20.0, 1.0, 180.0, 10.0)]),
        );
        let extrapolator = HeightExtrapolator::new(50.0, 80.0);

        assert!(extrapolator.apply_all(&data, &BTreeMap::new()).is_err());

        let mut alphas = BTreeMap::new();
        alphas.insert(FileKey::new("Karachi", "Karachi (2015).csv"), 0.0);
        let out = extrapolator.apply_all(&data, &alphas).unwrap();
        assert_eq!(out["Karachi"]["Karachi (2015).csv"].rows[0].wind_speed, 10.0);
    }
}
