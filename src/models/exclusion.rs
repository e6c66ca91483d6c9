use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::warn;

use super::city::{CityMap, FileKey};

/// How far an exclusion reaches across cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionScope {
    /// A rejected file name is dropped from every city that has a file of
    /// that name.
    #[default]
    FileName,
    /// Only the rejected (city, file) pair is dropped.
    CityFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionStage {
    RowCount,
    ColumnOrder,
}

impl fmt::Display for ExclusionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionStage::RowCount => write!(f, "row validation"),
            ExclusionStage::ColumnOrder => write!(f, "column validation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub stage: ExclusionStage,
    pub key: FileKey,
    pub reason: String,
}

/// Result of a validation stage: the surviving tables plus what was dropped.
#[derive(Debug, Clone)]
pub struct StageOutcome<T> {
    pub data: CityMap<T>,
    pub exclusions: Vec<Exclusion>,
}

impl<T> StageOutcome<T> {
    /// Removes every rejected file from `data` according to `scope`.
    ///
    /// Files that were themselves accepted can still be dropped here when
    /// `scope` is [`ExclusionScope::FileName`] and another city rejected a
    /// file of the same name. Each such drop is recorded as its own
    /// exclusion naming the city that rejected the file.
    pub fn apply_exclusions(mut self, scope: ExclusionScope) -> Self {
        match scope {
            ExclusionScope::FileName => {
                let rejected: BTreeSet<FileKey> =
                    self.exclusions.iter().map(|e| e.key.clone()).collect();
                let mut origins: BTreeMap<String, (ExclusionStage, String)> = BTreeMap::new();
                for exclusion in &self.exclusions {
                    origins
                        .entry(exclusion.key.file_name.clone())
                        .or_insert_with(|| (exclusion.stage, exclusion.key.city.clone()));
                }

                let mut collateral = Vec::new();
                for (city, files) in self.data.iter_mut() {
                    files.retain(|name, _| {
                        let Some((stage, origin)) = origins.get(name) else {
                            return true;
                        };
                        let key = FileKey::new(city.clone(), name.clone());
                        if !rejected.contains(&key) {
                            let reason = format!("same file name was excluded in {}", origin);
                            warn!("File: '{}' ({}) {}, so it is EXCLUDED", name, city, reason);
                            collateral.push(Exclusion {
                                stage: *stage,
                                key,
                                reason,
                            });
                        }
                        false
                    });
                }
                self.exclusions.extend(collateral);
            }
            ExclusionScope::CityFile => {
                for exclusion in &self.exclusions {
                    if let Some(files) = self.data.get_mut(&exclusion.key.city) {
                        files.remove(&exclusion.key.file_name);
                    }
                }
            }
        }
        self
    }

    pub fn surviving_files(&self) -> usize {
        self.data.values().map(|files| files.len()).sum()
    }
}

/// Everything the run dropped or could not resolve, in stage order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExclusionReport {
    pub exclusions: Vec<Exclusion>,
    pub cities_without_coordinates: Vec<String>,
    pub files_loaded: usize,
    pub files_exported: usize,
}

impl ExclusionReport {
    pub fn excluded_count(&self) -> usize {
        self.exclusions.len()
    }

    pub fn by_stage(&self, stage: ExclusionStage) -> impl Iterator<Item = &Exclusion> {
        self.exclusions.iter().filter(move |e| e.stage == stage)
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Validation Report ===\n");
        summary.push_str(&format!("Files loaded: {}\n", self.files_loaded));
        summary.push_str(&format!("Files prepared: {}\n", self.files_exported));
        summary.push_str(&format!("Files excluded: {}\n", self.excluded_count()));
        summary.push_str(&format!(
            "Excluded by row validation: {}\n",
            self.by_stage(ExclusionStage::RowCount).count()
        ));
        summary.push_str(&format!(
            "Excluded by column validation: {}\n",
            self.by_stage(ExclusionStage::ColumnOrder).count()
        ));

        if !self.exclusions.is_empty() {
            summary.push_str("\nExcluded files:\n");
            for (i, exclusion) in self.exclusions.iter().enumerate() {
                summary.push_str(&format!(
                    "  {}. {} ({}): {}\n",
                    i + 1,
                    exclusion.key,
                    exclusion.stage,
                    exclusion.reason
                ));
            }
        }

        if !self.cities_without_coordinates.is_empty() {
            summary.push_str(&format!(
                "\nCities without coordinates: {}\n",
                self.cities_without_coordinates.join(", ")
            ));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_city_map() -> CityMap<u32> {
        let mut data: CityMap<u32> = BTreeMap::new();
        data.entry("Karachi".into())
            .or_default()
            .insert("Data (2015).csv".into(), 1);
        data.entry("Karachi".into())
            .or_default()
            .insert("Data (2016).csv".into(), 2);
        data.entry("Lahore".into())
            .or_default()
            .insert("Data (2015).csv".into(), 3);
        data
    }

    fn rejected() -> Vec<Exclusion> {
        vec![Exclusion {
            stage: ExclusionStage::RowCount,
            key: FileKey::new("Karachi", "Data (2015).csv"),
            reason: "8759 rows".into(),
        }]
    }

    #[test]
    fn test_file_name_scope_reaches_other_cities() {
        let outcome = StageOutcome {
            data: two_city_map(),
            exclusions: rejected(),
        }
        .apply_exclusions(ExclusionScope::FileName);

        assert_eq!(outcome.data["Karachi"].len(), 1);
        assert!(outcome.data["Lahore"].is_empty());
        assert_eq!(outcome.surviving_files(), 1);

        assert_eq!(outcome.exclusions.len(), 2);
        let dropped = &outcome.exclusions[1];
        assert_eq!(dropped.key, FileKey::new("Lahore", "Data (2015).csv"));
        assert_eq!(dropped.stage, ExclusionStage::RowCount);
        assert_eq!(dropped.reason, "same file name was excluded in Karachi");
    }

    #[test]
    fn test_city_file_scope_stays_local() {
        let outcome = StageOutcome {
            data: two_city_map(),
            exclusions: rejected(),
        }
        .apply_exclusions(ExclusionScope::CityFile);

        assert_eq!(outcome.data["Karachi"].len(), 1);
        assert_eq!(outcome.data["Lahore"].len(), 1);
        assert_eq!(outcome.exclusions.len(), 1);
    }

    #[test]
    fn test_report_summary_lists_exclusions() {
        let report = ExclusionReport {
            exclusions: rejected(),
            cities_without_coordinates: vec!["Quetta".into()],
            files_loaded: 3,
            files_exported: 1,
        };

        let summary = report.summary();
        assert!(summary.contains("Files excluded: 1\n"));
        assert!(summary.contains("Excluded by row validation: 1"));
        assert!(summary.contains("Karachi/Data (2015).csv (row validation): 8759 rows"));
        assert!(summary.contains("Cities without coordinates: Quetta"));
    }
}
