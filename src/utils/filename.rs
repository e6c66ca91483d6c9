use crate::error::{ProcessingError, Result};
use crate::utils::constants::{LOG_FILE_SUFFIX, SRW_EXTENSION};
use std::path::Path;

/// Extract the year between the last `(` and the following `)` of a file
/// name, e.g. `Karachi (2015).csv` -> 2015.
pub fn year_from_file_name(file_name: &str) -> Result<i32> {
    let year = file_name
        .rsplit_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(year, _)| year.trim())
        .ok_or_else(|| ProcessingError::MissingYear(file_name.to_string()))?;

    year.parse::<i32>()
        .map_err(|_| ProcessingError::MissingYear(file_name.to_string()))
}

/// Name of the resource file written next to a numeric table.
pub fn srw_file_name(file_name: &str) -> String {
    match file_name.strip_suffix(".csv") {
        Some(stem) => format!("{}.{}", stem, SRW_EXTENSION),
        None => Path::new(file_name)
            .with_extension(SRW_EXTENSION)
            .to_string_lossy()
            .into_owned(),
    }
}

pub fn log_file_name(city: &str) -> String {
    format!("{}{}", city, LOG_FILE_SUFFIX)
}
