use crate::error::Result;
use crate::models::{CityMap, MeasurementTable};
use crate::utils::constants::{CSV_DIR, EXPECTED_HOURS, MONTH_HOURS, MONTH_LABELS, SUMMARY_DIR};
use crate::utils::filename::year_from_file_name;
use crate::utils::format::format_value;
use crate::utils::progress::ProgressReporter;
use crate::utils::stats::mean;
use crate::writers::numeric_table::parse_table;
use csv::{Terminator, WriterBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Twelve monthly means of one year plus their mean.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub year: i32,
    pub monthly: [f64; 12],
    pub annual: f64,
}

impl MonthlySummary {
    /// Average `values` over the fixed month windows of a 8760-hour year.
    pub fn from_hourly(year: i32, values: &[f64]) -> Option<Self> {
        if values.len() != EXPECTED_HOURS {
            return None;
        }

        let mut monthly = [0.0; 12];
        let mut start = 0;
        for (month, hours) in MONTH_HOURS.iter().enumerate() {
            monthly[month] = mean(&values[start..start + hours]);
            start += hours;
        }

        Some(Self {
            year,
            monthly,
            annual: mean(&monthly),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryQuantity {
    Temperature,
    WindSpeed,
}

impl SummaryQuantity {
    fn file_prefix(self) -> &'static str {
        match self {
            SummaryQuantity::Temperature => "Monthly_Temperature",
            SummaryQuantity::WindSpeed => "Monthly_WindSpeed",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            SummaryQuantity::Temperature => "°C",
            SummaryQuantity::WindSpeed => "m/s",
        }
    }

    fn values(self, table: &MeasurementTable) -> Vec<f64> {
        match self {
            SummaryQuantity::Temperature => table.temperatures(),
            SummaryQuantity::WindSpeed => table.wind_speeds(),
        }
    }

    fn header(self) -> Vec<String> {
        std::iter::once("YEAR".to_string())
            .chain(
                MONTH_LABELS
                    .iter()
                    .map(|month| format!("{} {}", month, self.unit())),
            )
            .chain(std::iter::once(format!("Annual {}", self.unit())))
            .collect()
    }
}

/// Builds per-city monthly temperature and wind speed tables from the
/// prepared numeric tables.
pub struct SummaryWriter {
    output_dir: PathBuf,
}

impl SummaryWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Read `<output>/<City>/CSV/*` for every city folder.
    pub fn read_prepared(&self) -> Result<CityMap<MeasurementTable>> {
        let mut data: CityMap<MeasurementTable> = BTreeMap::new();

        let mut cities: Vec<PathBuf> = fs::read_dir(&self.output_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        cities.sort();

        for city_dir in cities {
            let csv_dir = city_dir.join(CSV_DIR);
            if !csv_dir.is_dir() {
                continue;
            }
            let Some(city) = city_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let tables = data.entry(city.to_string()).or_default();
            for entry in fs::read_dir(&csv_dir)? {
                let path = entry?.path();
                let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if path.is_file() {
                    let table = parse_table(&fs::read_to_string(&path)?)?;
                    tables.insert(file_name.to_string(), table);
                }
            }
        }

        Ok(data)
    }

    pub fn summarize(
        &self,
        files: &BTreeMap<String, MeasurementTable>,
        quantity: SummaryQuantity,
    ) -> Result<Vec<MonthlySummary>> {
        let mut rows = Vec::with_capacity(files.len());

        for (file_name, table) in files {
            let year = year_from_file_name(file_name)?;
            match MonthlySummary::from_hourly(year, &quantity.values(table)) {
                Some(summary) => rows.push(summary),
                None => warn!(
                    "Skipping '{}': {} rows, expected {}",
                    file_name,
                    table.len(),
                    EXPECTED_HOURS
                ),
            }
        }

        Ok(rows)
    }

    pub fn summary_path(&self, city: &str, quantity: SummaryQuantity) -> PathBuf {
        self.output_dir
            .join(city)
            .join(SUMMARY_DIR)
            .join(format!("{}_{}.csv", quantity.file_prefix(), city))
    }

    pub fn write_city(
        &self,
        city: &str,
        files: &BTreeMap<String, MeasurementTable>,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for quantity in [SummaryQuantity::Temperature, SummaryQuantity::WindSpeed] {
            let rows = self.summarize(files, quantity)?;
            let path = self.summary_path(city, quantity);
            write_summary(&path, quantity, &rows)?;
            info!("{} created successfully", path.display());
            written.push(path);
        }

        Ok(written)
    }

    pub fn write_all(&self, progress: &ProgressReporter) -> Result<usize> {
        let data = self.read_prepared()?;

        for (city, files) in &data {
            progress.set_message(&format!("Summarizing {}...", city));
            self.write_city(city, files)?;
            progress.increment(1);
        }

        progress.finish_with_message(&format!("Summarized {} cities", data.len()));
        Ok(data.len())
    }
}

fn write_summary(path: &Path, quantity: SummaryQuantity, rows: &[MonthlySummary]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_path(path)?;
    writer.write_record(quantity.header())?;

    for row in rows {
        let record = std::iter::once(row.year.to_string())
            .chain(row.monthly.iter().map(|v| format_value(*v)))
            .chain(std::iter::once(format_value(row.annual)));
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(())
}
