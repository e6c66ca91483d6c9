pub mod city;
pub mod exclusion;
pub mod table;

pub use city::{CityMap, FileKey, GeoCoordinate};
pub use exclusion::{Exclusion, ExclusionReport, ExclusionScope, ExclusionStage, StageOutcome};
pub use table::{HourReading, HourlyTable, MeasurementTable, RawTable};
