use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{FileKey, GeoCoordinate, MeasurementTable};
use crate::processors::PipelineOutput;
use crate::utils::constants::{CSV_DIR, SRW_DIR};
use crate::utils::filename::{log_file_name, srw_file_name, year_from_file_name};
use crate::utils::progress::ProgressReporter;
use crate::writers::log_writer::{append_block, LogBlock, LogDetails};
use crate::writers::numeric_table::render_table;
use crate::writers::srw_writer::{write_srw, SrwHeader};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub target_height: f64,
    pub project_name: String,
    pub country: String,
    pub log_details: bool,
}

impl From<&PipelineConfig> for ExportSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            target_height: config.target_height,
            project_name: config.project_name.clone(),
            country: config.country.clone(),
            log_details: config.log_details,
        }
    }
}

/// Output locations of one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityPaths {
    pub csv_dir: PathBuf,
    pub srw_dir: PathBuf,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub cities: usize,
    pub files: usize,
}

/// Writes the numeric table, the resource file and the log block of every
/// prepared file.
///
/// Setup per city is idempotent: output folders are created when missing and
/// any log left by a previous run is deleted before the first block is
/// appended, so the log always describes exactly one run.
pub struct Exporter {
    settings: ExportSettings,
}

impl Exporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    pub fn city_paths(&self, city: &str) -> CityPaths {
        let city_dir = self.settings.output_dir.join(city);
        CityPaths {
            csv_dir: city_dir.join(CSV_DIR),
            srw_dir: city_dir.join(SRW_DIR),
            log_file: city_dir.join(log_file_name(city)),
        }
    }

    /// Create the city's output folders and remove its previous log.
    pub fn prepare_city(&self, city: &str) -> Result<CityPaths> {
        let paths = self.city_paths(city);
        fs::create_dir_all(&paths.csv_dir)?;
        fs::create_dir_all(&paths.srw_dir)?;

        match fs::remove_file(&paths.log_file) {
            Ok(()) => info!(
                "The log '{}' already exists, removing old one",
                paths.log_file.display()
            ),
            Err(e) if e.kind() == ErrorKind::NotFound => debug!(
                "The log '{}' does not exist yet, creating it",
                paths.log_file.display()
            ),
            Err(e) => return Err(e.into()),
        }

        Ok(paths)
    }

    /// Write the three artifacts of one file: table, resource file, log block.
    pub fn export_file(
        &self,
        paths: &CityPaths,
        key: &FileKey,
        table: &MeasurementTable,
        alpha: f64,
        coordinate: Option<GeoCoordinate>,
    ) -> Result<()> {
        let table_text = render_table(table)?;

        let csv_path = paths.csv_dir.join(&key.file_name);
        info!("Exporting {}", csv_path.display());
        fs::write(&csv_path, &table_text)?;

        let coordinate = coordinate.ok_or_else(|| ProcessingError::CoordinateNotFound {
            city: key.city.clone(),
        })?;
        let srw_path = paths.srw_dir.join(srw_file_name(&key.file_name));
        info!("Exporting {}", srw_path.display());
        let header = SrwHeader {
            city: &key.city,
            country: &self.settings.country,
            coordinate,
            project_name: &self.settings.project_name,
            target_height: self.settings.target_height,
        };
        write_srw(&srw_path, &header, &table_text)?;

        let mut block = LogBlock::from_table(year_from_file_name(&key.file_name)?, table)?;
        if self.settings.log_details {
            block = block.with_details(LogDetails {
                alpha,
                coordinate: Some(coordinate),
            });
        }
        append_block(&paths.log_file, &block)?;

        Ok(())
    }

    /// Export every city of a pipeline run. The first error ends the export.
    pub fn export_all(
        &self,
        output: &PipelineOutput,
        progress: &ProgressReporter,
    ) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();

        for (city, files) in &output.tables {
            progress.set_message(&format!("Exporting {}...", city));
            let paths = self.prepare_city(city)?;
            let coordinate = output.coordinates.get(city).copied();

            for (file_name, table) in files {
                let key = FileKey::new(city.clone(), file_name.clone());
                let alpha = output.alphas.get(&key).copied().ok_or_else(|| {
                    ProcessingError::MissingAlpha {
                        city: city.clone(),
                        file: file_name.clone(),
                    }
                })?;
                self.export_file(&paths, &key, table, alpha, coordinate)?;
                summary.files += 1;
            }

            summary.cities += 1;
            progress.increment(1);
        }

        progress.finish_with_message(&format!(
            "Exported {} files for {} cities",
            summary.files, summary.cities
        ));
        Ok(summary)
    }

    pub fn output_dir(&self) -> &Path {
        &self.settings.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourReading;
    use tempfile::TempDir;

    fn settings(output_dir: &Path) -> ExportSettings {
        ExportSettings {
            output_dir: output_dir.to_path_buf(),
            target_height: 80.0,
            project_name: "FinalYearProject".to_string(),
            country: "Pakistan".to_string(),
            log_details: false,
        }
    }

    fn table() -> MeasurementTable {
        MeasurementTable::new(vec![
            HourReading::new(25.5, 1.0, 180.0, 10.5),
            HourReading::new(26.0, 0.99, 190.0, 11.0),
        ])
    }

    #[test]
    fn test_prepare_city_is_idempotent() -> Result<()> {
        let dir = TempDir::new()?;
        let exporter = Exporter::new(settings(dir.path()));

        let paths = exporter.prepare_city("Karachi")?;
        fs::write(&paths.log_file, "stale")?;
        let again = exporter.prepare_city("Karachi")?;

        assert_eq!(paths, again);
        assert!(again.csv_dir.is_dir());
        assert!(again.srw_dir.is_dir());
        assert!(!again.log_file.exists());
        Ok(())
    }

    #[test]
    fn test_export_file_writes_matching_artifacts() -> Result<()> {
        let dir = TempDir::new()?;
        let exporter = Exporter::new(settings(dir.path()));
        let paths = exporter.prepare_city("Karachi")?;
        let key = FileKey::new("Karachi", "Karachi (2015).csv");
        let coordinate = GeoCoordinate::new(67.0011, 24.8607)?;

        exporter.export_file(&paths, &key, &table(), 0.2, Some(coordinate))?;

        let csv = fs::read_to_string(paths.csv_dir.join("Karachi (2015).csv"))?;
        let srw = fs::read_to_string(paths.srw_dir.join("Karachi (2015).srw"))?;
        let log = fs::read_to_string(&paths.log_file)?;

        assert_eq!(csv, "25.5,1.0,180.0,10.5\n26.0,0.99,190.0,11.0\n");
        assert!(srw.starts_with("loc_id,city??,Karachi,Pakistan,year??,lat??,lon??,24.8607,67.0011,8760\n"));
        assert!(srw.ends_with(&csv));
        assert!(log.starts_with("Year: 2015\n"));
        assert!(!log.contains("Alpha Value"));
        Ok(())
    }

    #[test]
    fn test_missing_coordinate_fails_before_resource_file() -> Result<()> {
        let dir = TempDir::new()?;
        let exporter = Exporter::new(settings(dir.path()));
        let paths = exporter.prepare_city("Quetta")?;
        let key = FileKey::new("Quetta", "Quetta (2015).csv");

        let error = exporter
            .export_file(&paths, &key, &table(), 0.2, None)
            .unwrap_err();

        assert!(matches!(error, ProcessingError::CoordinateNotFound { .. }));
        assert!(!paths.srw_dir.join("Quetta (2015).srw").exists());
        assert!(!paths.log_file.exists());
        Ok(())
    }

    #[test]
    fn test_rerun_does_not_duplicate_log() -> Result<()> {
        let dir = TempDir::new()?;
        let exporter = Exporter::new(settings(dir.path()));
        let key = FileKey::new("Karachi", "Karachi (2015).csv");
        let coordinate = Some(GeoCoordinate::new(67.0011, 24.8607)?);

        for _ in 0..2 {
            let paths = exporter.prepare_city("Karachi")?;
            exporter.export_file(&paths, &key, &table(), 0.2, coordinate)?;
        }

        let log = fs::read_to_string(exporter.city_paths("Karachi").log_file)?;
        assert_eq!(log.matches("Year: 2015").count(), 1);
        Ok(())
    }
}
