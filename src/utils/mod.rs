pub mod constants;
pub mod filename;
pub mod format;
pub mod progress;
pub mod stats;

pub use constants::*;
pub use filename::{log_file_name, srw_file_name, year_from_file_name};
pub use format::{format_height, format_value};
pub use progress::ProgressReporter;
pub use stats::{mean, SeriesStats};
