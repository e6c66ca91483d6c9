pub mod directory_reader;
pub mod geo_extractor;

pub use directory_reader::{read_raw_table, DirectoryReader};
pub use geo_extractor::{parse_location, GeoExtraction, GeoExtractor};
