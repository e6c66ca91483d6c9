use serde::{Deserialize, Serialize};

/// An annual file as loaded from disk: one entry per non-blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub lines: Vec<String>,
}

impl RawTable {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A structured table of text fields with named columns. `None` marks a
/// field that was absent from its source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourlyTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl HourlyTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows in which every field is null.
    pub fn fully_null_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.iter().all(Option::is_none))
            .count()
    }

    /// Field at `column` of `row`, trimmed. Absent fields yield `None`.
    pub fn field(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|f| f.as_deref())
            .map(str::trim)
    }
}

/// One hour of the four measured quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourReading {
    pub temperature: f64,
    pub pressure: f64,
    pub wind_direction: f64,
    pub wind_speed: f64,
}

impl HourReading {
    pub fn new(temperature: f64, pressure: f64, wind_direction: f64, wind_speed: f64) -> Self {
        Self {
            temperature,
            pressure,
            wind_direction,
            wind_speed,
        }
    }

    /// Values in export column order: temperature, pressure, direction, speed.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.temperature,
            self.pressure,
            self.wind_direction,
            self.wind_speed,
        ]
    }
}

/// The validated four-column series of one annual file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    pub rows: Vec<HourReading>,
}

impl MeasurementTable {
    pub fn new(rows: Vec<HourReading>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.temperature).collect()
    }

    pub fn pressures(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.pressure).collect()
    }

    pub fn wind_speeds(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.wind_speed).collect()
    }

    /// Returns a copy with `f` applied to every pressure value.
    pub fn map_pressure(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .map(|r| HourReading {
                    pressure: f(r.pressure),
                    ..*r
                })
                .collect(),
        }
    }

    /// Returns a copy with `f` applied to every wind speed value.
    pub fn map_wind_speed(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .map(|r| HourReading {
                    wind_speed: f(r.wind_speed),
                    ..*r
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_table_skips_blank_lines() {
        let raw = RawTable::from_text("-BEGIN HEADER-\n\n  \nYEAR,MO\n2015,1\n");
        assert_eq!(raw.len(), 3);
        assert_eq!(raw.line(1), Some("YEAR,MO"));
        assert_eq!(raw.line(5), None);
    }

    #[test]
    fn test_fully_null_rows() {
        let table = HourlyTable::new(
            vec!["A".into(), "B".into()],
            vec![
                vec![Some("1".into()), None],
                vec![None, None],
                vec![Some("2".into()), Some("3".into())],
            ],
        );

        assert_eq!(table.fully_null_rows(), 1);
        assert_eq!(table.field(0, 0), Some("1"));
        assert_eq!(table.field(0, 1), None);
    }

    #[test]
    fn test_map_columns_leave_input_untouched() {
        let table = MeasurementTable::new(vec![HourReading::new(20.0, 100.0, 90.0, 5.0)]);

        let converted = table.map_pressure(|p| p / 100.0);
        let scaled = converted.map_wind_speed(|s| s * 2.0);

        assert_eq!(table.rows[0].pressure, 100.0);
        assert_eq!(converted.rows[0].pressure, 1.0);
        assert_eq!(scaled.rows[0].wind_speed, 10.0);
        assert_eq!(scaled.rows[0].as_array(), [20.0, 1.0, 90.0, 10.0]);
    }
}
