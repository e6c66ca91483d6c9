pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use config::{ConfigOverrides, PipelineConfig};
pub use error::{ProcessingError, Result};
pub use models::{ExclusionReport, ExclusionScope, FileKey, GeoCoordinate, MeasurementTable};
pub use processors::{Pipeline, PipelineOutput, PressureUnit};
pub use writers::{Exporter, SummaryWriter};
