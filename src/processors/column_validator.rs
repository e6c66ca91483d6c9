use crate::error::{ProcessingError, Result};
use crate::models::{
    CityMap, Exclusion, ExclusionScope, ExclusionStage, FileKey, HourReading, HourlyTable,
    MeasurementTable, StageOutcome,
};
use crate::utils::constants::{TIME_COLUMN_COUNT, VALUE_COLUMNS};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Requires the value columns to be exactly `T2M, PS, WD50M, WS50M`, in
/// that order, and narrows accepted files to those four columns.
pub struct ColumnValidator {
    scope: ExclusionScope,
}

impl ColumnValidator {
    pub fn new(scope: ExclusionScope) -> Self {
        Self { scope }
    }

    pub fn validate(&self, data: &CityMap<HourlyTable>) -> Result<StageOutcome<MeasurementTable>> {
        let mut accepted: CityMap<MeasurementTable> = BTreeMap::new();
        let mut exclusions = Vec::new();

        for (city, files) in data {
            let tables = accepted.entry(city.clone()).or_default();
            for (file_name, table) in files {
                if has_expected_columns(table) {
                    let key = FileKey::new(city.clone(), file_name.clone());
                    tables.insert(file_name.clone(), to_measurements(&key, table)?);
                    continue;
                }

                let reason = format!(
                    "column order {:?} is not the exact same as {:?}",
                    value_columns(table),
                    VALUE_COLUMNS
                );
                warn!("File: '{}' ({}) {}, so it is EXCLUDED", file_name, city, reason);
                exclusions.push(Exclusion {
                    stage: ExclusionStage::ColumnOrder,
                    key: FileKey::new(city.clone(), file_name.clone()),
                    reason,
                });
            }
        }

        if exclusions.is_empty() {
            info!("No files to exclude, all files have the expected column order");
        }

        Ok(StageOutcome {
            data: accepted,
            exclusions,
        }
        .apply_exclusions(self.scope))
    }
}

impl Default for ColumnValidator {
    fn default() -> Self {
        Self::new(ExclusionScope::default())
    }
}

fn value_columns(table: &HourlyTable) -> &[String] {
    table.columns.get(TIME_COLUMN_COUNT..).unwrap_or_default()
}

pub fn has_expected_columns(table: &HourlyTable) -> bool {
    let columns = value_columns(table);
    columns.len() == VALUE_COLUMNS.len()
        && columns.iter().zip(VALUE_COLUMNS).all(|(c, e)| c == e)
}

/// Parse the four value columns of an accepted table. A missing or
/// non-numeric value is an input-shape error.
fn to_measurements(key: &FileKey, table: &HourlyTable) -> Result<MeasurementTable> {
    let mut rows = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let mut values = [0.0f64; 4];
        for (offset, value) in values.iter_mut().enumerate() {
            let column = TIME_COLUMN_COUNT + offset;
            let text = table.field(row, column).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "{}: row {} has no {} value",
                    key, row, VALUE_COLUMNS[offset]
                ))
            })?;
            *value = text.parse::<f64>().map_err(|_| {
                ProcessingError::InvalidFormat(format!(
                    "{}: row {} has invalid {} value '{}'",
                    key, row, VALUE_COLUMNS[offset], text
                ))
            })?;
        }
        let [temperature, pressure, wind_direction, wind_speed] = values;
        rows.push(HourReading::new(
            temperature,
            pressure,
            wind_direction,
            wind_speed,
        ));
    }

    Ok(MeasurementTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(value_columns: [&str; 4], value: &str) -> HourlyTable {
        let columns = ["YEAR", "MO", "DY", "HR"]
            .into_iter()
            .chain(value_columns)
            .map(String::from)
            .collect();
        let row = ["2015", "1", "1", "0", "21.5", "101.325", "270.0", value]
            .into_iter()
            .map(|f| Some(f.to_string()))
            .collect();
        HourlyTable::new(columns, vec![row])
    }

    fn single(city: &str, file: &str, table: HourlyTable) -> CityMap<HourlyTable> {
        let mut data: CityMap<HourlyTable> = BTreeMap::new();
        data.entry(city.into()).or_default().insert(file.into(), table);
        data
    }

    #[test]
    fn test_expected_order_is_accepted_and_narrowed() {
        let data = single("Karachi", "Karachi (2015).csv", table(VALUE_COLUMNS, "6.25"));
        let outcome = ColumnValidator::default().validate(&data).unwrap();

        assert!(outcome.exclusions.is_empty());
        let kept = &outcome.data["Karachi"]["Karachi (2015).csv"];
        assert_eq!(kept.rows, [HourReading::new(21.5, 101.325, 270.0, 6.25)]);
    }

    #[test]
    fn test_order_matters() {
        let swapped = table(["PS", "T2M", "WD50M", "WS50M"], "6.25");
        let data = single("Karachi", "Karachi (2015).csv", swapped);
        let outcome = ColumnValidator::default().validate(&data).unwrap();

        assert_eq!(outcome.exclusions.len(), 1);
        assert_eq!(outcome.exclusions[0].stage, ExclusionStage::ColumnOrder);
        assert!(outcome.exclusions[0].reason.contains("T2M"));
        assert!(outcome.data["Karachi"].is_empty());
    }

    #[test]
    fn test_exclusion_reaches_same_named_file_in_other_city() {
        let mut data = single(
            "Karachi",
            "Data (2015).csv",
            table(["T2M", "PS", "WS50M", "WD50M"], "6.25"),
        );
        data.entry("Lahore".into())
            .or_default()
            .insert("Data (2015).csv".into(), table(VALUE_COLUMNS, "6.25"));

        let outcome = ColumnValidator::new(ExclusionScope::FileName)
            .validate(&data)
            .unwrap();

        assert!(outcome.data["Lahore"].is_empty());
    }

    #[test]
    fn test_non_numeric_value_is_an_error() {
        let data = single("Karachi", "Karachi (2015).csv", table(VALUE_COLUMNS, "calm"));
        let error = ColumnValidator::default().validate(&data).unwrap_err();

        assert!(error.to_string().contains("invalid WS50M value 'calm'"));
    }

    #[test]
    fn test_short_header_is_rejected() {
        let mut short = table(VALUE_COLUMNS, "6.25");
        short.columns.truncate(6);
        assert!(!has_expected_columns(&short));
    }
}
