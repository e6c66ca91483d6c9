use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

use crate::error::Result;

/// Per-city tables keyed by file name. Sorted maps keep the per-city file
/// order stable between runs.
pub type CityMap<T> = BTreeMap<String, BTreeMap<String, T>>;

/// A city's location as extracted from its raw header, stored in
/// (longitude, latitude) order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoCoordinate {
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
}

impl GeoCoordinate {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        let coordinate = Self {
            longitude,
            latitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }
}

/// Identifies one annual file within one city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileKey {
    pub city: String,
    pub file_name: String,
}

impl FileKey {
    pub fn new(city: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            file_name: file_name.into(),
        }
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.city, self.file_name)
    }
}
