use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{
    CityMap, ExclusionReport, FileKey, GeoCoordinate, MeasurementTable, RawTable,
};
use crate::processors::{
    ColumnValidator, HeightExtrapolator, RowValidator, SchemaNormalizer, ShearEstimator,
    UnitConverter,
};
use crate::readers::{DirectoryReader, GeoExtractor};
use crate::utils::constants::{RAW_EXTENSION, TIME_FORMAT};
use chrono::Local;
use std::collections::BTreeMap;
use tracing::info;

/// Fully transformed tables plus the side tables the exporter needs.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub tables: CityMap<MeasurementTable>,
    pub alphas: BTreeMap<FileKey, f64>,
    pub coordinates: BTreeMap<String, GeoCoordinate>,
    pub report: ExclusionReport,
}

impl PipelineOutput {
    pub fn file_count(&self) -> usize {
        self.tables.values().map(|files| files.len()).sum()
    }
}

/// Runs every stage over the whole data set before the next one starts.
/// Each stage reads its input by reference and returns new tables.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Load the configured input folder and run every stage.
    pub fn prepare(&self) -> Result<PipelineOutput> {
        let raw = stage("Loading raw files", || {
            DirectoryReader::with_extension(RAW_EXTENSION).read_all(&self.config.input_dir)
        })?;
        self.run(&raw)
    }

    pub fn run(&self, raw: &CityMap<RawTable>) -> Result<PipelineOutput> {
        let mut report = ExclusionReport {
            files_loaded: raw.values().map(|files| files.len()).sum(),
            ..Default::default()
        };
        let scope = self.config.exclusion_scope;

        let geo = stage("Extracting coordinates", || {
            Ok(GeoExtractor::new().extract_all(raw))
        })?;
        report.cities_without_coordinates = geo.missing;

        let normalized = stage("Normalizing schema", || {
            SchemaNormalizer::new().normalize_all(raw)
        })?;

        let rows = stage("Validating rows", || {
            RowValidator::new(scope).validate(&normalized)
        })?;
        report.exclusions.extend(rows.exclusions);

        let columns = stage("Validating columns", || {
            ColumnValidator::new(scope).validate(&rows.data)
        })?;
        report.exclusions.extend(columns.exclusions);

        let converted = stage("Converting pressure", || {
            Ok(UnitConverter::new(self.config.pressure_unit).convert_all(&columns.data))
        })?;

        let estimator = ShearEstimator::new(self.config.reference_height);
        let alphas = stage("Estimating shear exponents", || {
            estimator.estimate_all(&converted)
        })?;

        let extrapolator =
            HeightExtrapolator::new(self.config.reference_height, self.config.target_height);
        let tables = stage("Extrapolating wind speed", || {
            extrapolator.apply_all(&converted, &alphas)
        })?;

        let output = PipelineOutput {
            tables,
            alphas,
            coordinates: geo.coordinates,
            report,
        };
        info!(
            "{} of {} files passed validation",
            output.file_count(),
            output.report.files_loaded
        );
        Ok(output)
    }
}

/// Run one stage with start/end banners. Errors end the stage and the run.
fn stage<T>(name: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    info!("{} started -> {}", name, Local::now().format(TIME_FORMAT));
    let result = f();
    match &result {
        Ok(_) => info!(
            "{} ended successfully -> {}",
            name,
            Local::now().format(TIME_FORMAT)
        ),
        Err(e) => tracing::error!("{} ended with ERROR: '{}'", name, e),
    }
    result
}
