//! Run configuration.
//!
//! Values are layered from built-in defaults, an optional TOML file,
//! `WINDPREP_*` environment variables and finally command-line overrides,
//! then validated before any stage runs.

use crate::error::Result;
use crate::models::ExclusionScope;
use crate::processors::unit_converter::PressureUnit;
use crate::utils::constants::{DEFAULT_COUNTRY, DEFAULT_PROJECT_NAME, REFERENCE_HEIGHT};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

pub const ENV_PREFIX: &str = "WINDPREP";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root folder holding one subfolder per city
    pub input_dir: PathBuf,

    /// Root folder for prepared artifacts
    pub output_dir: PathBuf,

    /// Hub height Z the wind speed is extrapolated to
    #[validate(range(exclusive_min = 0.0))]
    pub target_height: f64,

    /// Measurement height Z_ref of the raw wind speed
    #[validate(range(exclusive_min = 0.0))]
    pub reference_height: f64,

    pub pressure_unit: PressureUnit,

    pub exclusion_scope: ExclusionScope,

    #[validate(length(min = 1))]
    pub project_name: String,

    #[validate(length(min = 1))]
    pub country: String,

    /// Append alpha and coordinates to every log block
    pub log_details: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Input"),
            output_dir: PathBuf::from("Output"),
            target_height: 0.0,
            reference_height: REFERENCE_HEIGHT,
            pressure_unit: PressureUnit::default(),
            exclusion_scope: ExclusionScope::default(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            log_details: false,
        }
    }
}

/// Values supplied on the command line; `None` leaves the layered value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub target_height: Option<f64>,
    pub pressure_unit: Option<PressureUnit>,
    pub exclusion_scope: Option<ExclusionScope>,
    pub log_details: Option<bool>,
}

impl PipelineConfig {
    pub fn new(target_height: f64) -> Self {
        Self {
            target_height,
            ..Self::default()
        }
    }

    pub fn with_input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = input_dir.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_pressure_unit(mut self, pressure_unit: PressureUnit) -> Self {
        self.pressure_unit = pressure_unit;
        self
    }

    pub fn with_exclusion_scope(mut self, exclusion_scope: ExclusionScope) -> Self {
        self.exclusion_scope = exclusion_scope;
        self
    }

    pub fn with_log_details(mut self, log_details: bool) -> Self {
        self.log_details = log_details;
        self
    }

    /// Build the layered configuration and validate it.
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let config = Self::layered(config_file, overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the layered configuration without validating run parameters.
    /// Commands that only need the folder layout read it from here.
    pub fn layered(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option(
                "input_dir",
                overrides
                    .input_dir
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option(
                "output_dir",
                overrides
                    .output_dir
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("target_height", overrides.target_height)?
            .set_override_option(
                "pressure_unit",
                overrides.pressure_unit.map(|u| match u {
                    PressureUnit::Kilopascal => "kilopascal",
                    PressureUnit::Pascal => "pascal",
                }),
            )?
            .set_override_option(
                "exclusion_scope",
                overrides.exclusion_scope.map(|s| match s {
                    ExclusionScope::FileName => "file_name",
                    ExclusionScope::CityFile => "city_file",
                }),
            )?
            .set_override_option("log_details", overrides.log_details)?;

        Ok(builder.build()?.try_deserialize()?)
    }
}
