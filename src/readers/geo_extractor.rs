use crate::models::{CityMap, GeoCoordinate, RawTable};
use crate::utils::constants::LOCATION_ROW;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{info, warn};

static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Latitude\s+(-?\d+\.\d+)\s+Longitude\s+(-?\d+\.\d+)")
        .expect("Invalid location regex")
});

/// Coordinates found per city, and the cities for which none were found.
#[derive(Debug, Clone, Default)]
pub struct GeoExtraction {
    pub coordinates: BTreeMap<String, GeoCoordinate>,
    pub missing: Vec<String>,
}

/// Reads a city's latitude/longitude from the location line of its first
/// raw file.
pub struct GeoExtractor {
    location_row: usize,
}

impl GeoExtractor {
    pub fn new() -> Self {
        Self {
            location_row: LOCATION_ROW,
        }
    }

    pub fn extract_all(&self, data: &CityMap<RawTable>) -> GeoExtraction {
        let mut extraction = GeoExtraction::default();

        for (city, files) in data {
            let found = files
                .values()
                .next()
                .and_then(|raw| raw.line(self.location_row))
                .and_then(parse_location);

            match found {
                Some(coordinate) => {
                    info!(
                        "City: {} -> Latitude: {}, Longitude: {}",
                        city, coordinate.latitude, coordinate.longitude
                    );
                    extraction.coordinates.insert(city.clone(), coordinate);
                }
                None => {
                    warn!("No Longitude and Latitude values found for city: {}", city);
                    extraction.missing.push(city.clone());
                }
            }
        }

        extraction
    }
}

impl Default for GeoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `... Latitude <lat> Longitude <lon> ...`, returning the coordinate
/// in (longitude, latitude) order. Out-of-range values are rejected.
pub fn parse_location(line: &str) -> Option<GeoCoordinate> {
    let captures = LOCATION_PATTERN.captures(line)?;
    let latitude = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let longitude = captures.get(2)?.as_str().parse::<f64>().ok()?;
    GeoCoordinate::new(longitude, latitude).ok()
}
