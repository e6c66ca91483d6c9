use crate::error::{ProcessingError, Result};
use crate::models::{GeoCoordinate, MeasurementTable};
use crate::utils::format::format_value;
use crate::utils::stats::SeriesStats;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Optional extra lines appended to a log block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogDetails {
    pub alpha: f64,
    pub coordinate: Option<GeoCoordinate>,
}

/// One year's entry in a city log: max/min/mean of temperature, wind speed
/// and pressure, taken after conversion and extrapolation.
#[derive(Debug, Clone, PartialEq)]
pub struct LogBlock {
    pub year: i32,
    pub temperature: SeriesStats,
    pub wind_speed: SeriesStats,
    pub pressure: SeriesStats,
    pub details: Option<LogDetails>,
}

impl LogBlock {
    pub fn from_table(year: i32, table: &MeasurementTable) -> Result<Self> {
        let stats = |values: Vec<f64>| {
            SeriesStats::from_values(&values).ok_or_else(|| {
                ProcessingError::MissingData(format!("no rows to summarise for {}", year))
            })
        };

        Ok(Self {
            year,
            temperature: stats(table.temperatures())?,
            wind_speed: stats(table.wind_speeds())?,
            pressure: stats(table.pressures())?,
            details: None,
        })
    }

    pub fn with_details(mut self, details: LogDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn render(&self) -> String {
        let mut block = format!("Year: {}\n", self.year);

        for (label, stats) in [
            ("Temp", &self.temperature),
            ("Wind Speed", &self.wind_speed),
            ("Pressure", &self.pressure),
        ] {
            block.push_str(&format!("Max {}: {}\n", label, format_value(stats.max)));
            block.push_str(&format!("Min {}: {}\n", label, format_value(stats.min)));
            block.push_str(&format!("Average {}: {}\n", label, format_value(stats.mean)));
        }

        if let Some(details) = &self.details {
            block.push_str(&format!("Alpha Value: {}\n", format_value(details.alpha)));
            if let Some(coordinate) = &details.coordinate {
                block.push_str(&format!(
                    "Longitude & Latitude Values: [{}, {}]\n",
                    format_value(coordinate.longitude),
                    format_value(coordinate.latitude)
                ));
            }
        }

        block.push('\n');
        block
    }
}

/// Append one block to the city log, creating the file on first use.
pub fn append_block(path: &Path, block: &LogBlock) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(block.render().as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourReading;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn table() -> MeasurementTable {
        MeasurementTable::new(vec![
            HourReading::new(20.0, 1.0, 90.0, 4.0),
            HourReading::new(30.0, 0.5, 180.0, 8.0),
        ])
    }

    #[test]
    fn test_render_block() {
        let block = LogBlock::from_table(2015, &table()).unwrap();

        assert_eq!(
            block.render(),
            "Year: 2015\n\
             Max Temp: 30.0\n\
             Min Temp: 20.0\n\
             Average Temp: 25.0\n\
             Max Wind Speed: 8.0\n\
             Min Wind Speed: 4.0\n\
             Average Wind Speed: 6.0\n\
             Max Pressure: 1.0\n\
             Min Pressure: 0.5\n\
             Average Pressure: 0.75\n\
             \n"
        );
    }

    #[test]
    fn test_render_details() {
        let block = LogBlock::from_table(2015, &table())
            .unwrap()
            .with_details(LogDetails {
                alpha: 0.25,
                coordinate: Some(GeoCoordinate {
                    longitude: 67.0011,
                    latitude: 24.8607,
                }),
            });

        let text = block.render();
        assert!(text.contains("Alpha Value: 0.25\n"));
        assert!(text.ends_with("Longitude & Latitude Values: [67.0011, 24.8607]\n\n"));
    }

    #[test]
    fn test_empty_table_has_no_block() {
        assert!(LogBlock::from_table(2015, &MeasurementTable::default()).is_err());
    }

    #[test]
    fn test_append_block() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("Karachi Logs.txt");
        let first = LogBlock::from_table(2015, &table())?;
        let second = LogBlock::from_table(2016, &table())?;

        append_block(&path, &first)?;
        append_block(&path, &second)?;

        let text = std::fs::read_to_string(&path)?;
        assert_eq!(text, format!("{}{}", first.render(), second.render()));
        Ok(())
    }
}
