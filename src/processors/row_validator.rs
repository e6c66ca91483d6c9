use crate::error::Result;
use crate::models::{
    CityMap, Exclusion, ExclusionScope, ExclusionStage, FileKey, HourlyTable, StageOutcome,
};
use crate::utils::constants::{DAY_COLUMN, EXPECTED_HOURS, MONTH_COLUMN, YEAR_COLUMN};
use crate::utils::filename::year_from_file_name;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Accepts a file only when it holds exactly one 8760-hour year.
///
/// Rows from other years are dropped first. For years divisible by four the
/// 24 hours of February 29th are dropped as well, so leap-year files are
/// reduced to the same 8760 rows as any other year.
pub struct RowValidator {
    expected_rows: usize,
    scope: ExclusionScope,
}

impl RowValidator {
    pub fn new(scope: ExclusionScope) -> Self {
        Self {
            expected_rows: EXPECTED_HOURS,
            scope,
        }
    }

    pub fn validate(&self, data: &CityMap<HourlyTable>) -> Result<StageOutcome<HourlyTable>> {
        let mut accepted: CityMap<HourlyTable> = BTreeMap::new();
        let mut exclusions = Vec::new();

        for (city, files) in data {
            let tables = accepted.entry(city.clone()).or_default();
            for (file_name, table) in files {
                let year = year_from_file_name(file_name)?;
                let filtered = filter_year(table, year);
                let null_rows = filtered.fully_null_rows();

                if filtered.len() == self.expected_rows && null_rows == 0 {
                    tables.insert(file_name.clone(), filtered);
                    continue;
                }

                let reason = if null_rows > 0 {
                    format!(
                        "contains {} rows with {} fully null rows",
                        filtered.len(),
                        null_rows
                    )
                } else {
                    format!(
                        "contains {} rows, expected {}",
                        filtered.len(),
                        self.expected_rows
                    )
                };
                warn!("File: '{}' ({}) {}, so it is EXCLUDED", file_name, city, reason);
                exclusions.push(Exclusion {
                    stage: ExclusionStage::RowCount,
                    key: FileKey::new(city.clone(), file_name.clone()),
                    reason,
                });
            }
        }

        if exclusions.is_empty() {
            info!("No files to exclude, all files contain {} rows", self.expected_rows);
        }

        Ok(StageOutcome {
            data: accepted,
            exclusions,
        }
        .apply_exclusions(self.scope))
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new(ExclusionScope::default())
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0
}

/// Rows whose year field equals `year`, minus February 29th in leap years.
pub fn filter_year(table: &HourlyTable, year: i32) -> HourlyTable {
    let numeric = |row: &[Option<String>], column: usize| -> Option<i32> {
        row.get(column)?.as_deref()?.trim().parse::<i32>().ok()
    };
    let leap = is_leap_year(year);

    let rows = table
        .rows
        .iter()
        .filter(|row| numeric(row, YEAR_COLUMN) == Some(year))
        .filter(|row| {
            !(leap && numeric(row, MONTH_COLUMN) == Some(2) && numeric(row, DAY_COLUMN) == Some(29))
        })
        .cloned()
        .collect();

    HourlyTable::new(table.columns.clone(), rows)
}
