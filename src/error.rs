use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("No year in parentheses found in file name '{0}'")]
    MissingYear(String),

    #[error("No latitude/longitude available for city '{city}'")]
    CoordinateNotFound { city: String },

    #[error(
        "Mean wind speed {mean_speed} for '{file}' ({city}) is not positive, shear exponent is undefined"
    )]
    ShearDomain {
        city: String,
        file: String,
        mean_speed: f64,
    },

    #[error("No shear exponent computed for '{file}' ({city})")]
    MissingAlpha { city: String, file: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
