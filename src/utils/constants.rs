/// Hours in a non-leap year; every prepared file has exactly this many rows.
pub const EXPECTED_HOURS: usize = 8760;

/// Raw file layout
pub const PREAMBLE_ROWS: usize = 12;
pub const RAW_FIELD_COUNT: usize = 8;
pub const LOCATION_ROW: usize = 3;
pub const RAW_DELIMITER: u8 = b',';

/// Positions of the time fields within a normalized table
pub const YEAR_COLUMN: usize = 0;
pub const MONTH_COLUMN: usize = 1;
pub const DAY_COLUMN: usize = 2;
pub const TIME_COLUMN_COUNT: usize = 4;

/// Required value columns, in order
pub const VALUE_COLUMNS: [&str; 4] = ["T2M", "PS", "WD50M", "WS50M"];

/// Heights (metres)
pub const REFERENCE_HEIGHT: f64 = 50.0;

/// Pressure conversion
pub const PASCALS_PER_ATMOSPHERE: f64 = 101_325.0;
pub const PASCALS_PER_KILOPASCAL: f64 = 1000.0;

/// Empirical power-law shear coefficients
pub const SHEAR_INTERCEPT: f64 = 0.37;
pub const SHEAR_SLOPE: f64 = 0.088;
pub const SHEAR_BASE_HEIGHT: f64 = 10.0;

/// Output layout
pub const CSV_DIR: &str = "CSV";
pub const SRW_DIR: &str = "SRW";
pub const SUMMARY_DIR: &str = "Summary";
pub const LOG_FILE_SUFFIX: &str = " Logs.txt";
pub const SRW_EXTENSION: &str = "srw";
pub const RAW_EXTENSION: &str = "csv";

/// Resource file defaults
pub const DEFAULT_PROJECT_NAME: &str = "FinalYearProject";
pub const DEFAULT_COUNTRY: &str = "Pakistan";

/// Hours per month of a 8760-hour year, January first
pub const MONTH_HOURS: [usize; 12] = [744, 672, 744, 720, 744, 720, 744, 744, 720, 744, 720, 744];
pub const MONTH_LABELS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Wall-clock format used in stage banners
pub const TIME_FORMAT: &str = "%I:%M:%S %p";
pub const TIME_FORMAT_COMPLETE: &str = "%d %B,%Y %I:%M:%S %p";
