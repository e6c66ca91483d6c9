use crate::error::{ProcessingError, Result};
use crate::models::{CityMap, HourlyTable, RawTable};
use crate::utils::constants::{PREAMBLE_ROWS, RAW_DELIMITER, RAW_FIELD_COUNT};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use tracing::debug;

/// Reshapes raw single-column files into named-field tables.
pub struct SchemaNormalizer {
    preamble_rows: usize,
    field_count: usize,
    delimiter: u8,
}

impl SchemaNormalizer {
    pub fn new() -> Self {
        Self {
            preamble_rows: PREAMBLE_ROWS,
            field_count: RAW_FIELD_COUNT,
            delimiter: RAW_DELIMITER,
        }
    }

    pub fn normalize_all(&self, data: &CityMap<RawTable>) -> Result<CityMap<HourlyTable>> {
        let mut normalized: CityMap<HourlyTable> = BTreeMap::new();

        for (city, files) in data {
            let tables = normalized.entry(city.clone()).or_default();
            for (file_name, raw) in files {
                let table = self.normalize(raw).map_err(|e| match e {
                    ProcessingError::InvalidFormat(message) => ProcessingError::InvalidFormat(
                        format!("{} ({}): {}", file_name, city, message),
                    ),
                    other => other,
                })?;
                debug!("{} ({}): {} rows after normalization", file_name, city, table.len());
                tables.insert(file_name.clone(), table);
            }
        }

        Ok(normalized)
    }

    /// Drop the preamble, take the next line as the header and split every
    /// remaining line into fields. Short rows are padded with nulls.
    pub fn normalize(&self, raw: &RawTable) -> Result<HourlyTable> {
        if raw.len() <= self.preamble_rows {
            return Err(ProcessingError::InvalidFormat(format!(
                "expected more than {} rows, found {}",
                self.preamble_rows,
                raw.len()
            )));
        }

        let body = raw.lines[self.preamble_rows..].join("\n");
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .delimiter(self.delimiter)
            .from_reader(body.as_bytes());

        let mut records = reader.records();
        let header = match records.next() {
            Some(record) => record?,
            None => {
                return Err(ProcessingError::InvalidFormat(
                    "missing header row".to_string(),
                ))
            }
        };

        if header.len() != self.field_count {
            return Err(ProcessingError::InvalidFormat(format!(
                "header has {} fields, expected {}",
                header.len(),
                self.field_count
            )));
        }
        let columns: Vec<String> = header.iter().map(|f| f.trim().to_string()).collect();

        let mut rows = Vec::with_capacity(raw.len() - self.preamble_rows);
        for (index, record) in records.enumerate() {
            let record = record?;
            if record.len() > self.field_count {
                return Err(ProcessingError::InvalidFormat(format!(
                    "row {} has {} fields, expected {}",
                    index,
                    record.len(),
                    self.field_count
                )));
            }

            let mut row: Vec<Option<String>> = record.iter().map(|f| Some(f.to_string())).collect();
            row.resize(self.field_count, None);
            rows.push(row);
        }

        Ok(HourlyTable::new(columns, rows))
    }
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preamble() -> Vec<String> {
        (0..PREAMBLE_ROWS).map(|i| format!("header line {}", i)).collect()
    }

    #[test]
    fn test_normalize_drops_preamble_and_header() {
        let mut lines = preamble();
        lines.push("YEAR,MO,DY,HR,T2M,PS,WD50M,WS50M".into());
        lines.push("2015,1,1,0,18.2,101.2,45.0,4.1".into());
        lines.push("2015,1,1,1,18.0,101.3,47.5,4.3".into());

        let table = SchemaNormalizer::new().normalize(&RawTable::new(lines)).unwrap();

        assert_eq!(
            table.columns,
            ["YEAR", "MO", "DY", "HR", "T2M", "PS", "WD50M", "WS50M"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.field(0, 4), Some("18.2"));
        assert_eq!(table.field(1, 3), Some("1"));
    }

    #[test]
    fn test_short_rows_are_padded_with_nulls() {
        let mut lines = preamble();
        lines.push("YEAR,MO,DY,HR,T2M,PS,WD50M,WS50M".into());
        lines.push("2015,1,1".into());

        let table = SchemaNormalizer::new().normalize(&RawTable::new(lines)).unwrap();

        assert_eq!(table.rows[0].len(), RAW_FIELD_COUNT);
        assert_eq!(table.field(0, 2), Some("1"));
        assert_eq!(table.field(0, 3), None);
    }

    #[test]
    fn test_stray_quote_stays_within_its_line() {
        let mut lines = preamble();
        lines.push("YEAR,MO,DY,HR,T2M,PS,WD50M,WS50M".into());
        for hour in 0..8760 {
            let temperature = if hour == 100 { "\"25.5" } else { "25.5" };
            lines.push(format!("2015,1,1,{},{},101.2,45.0,4.1", hour % 24, temperature));
        }

        let table = SchemaNormalizer::new().normalize(&RawTable::new(lines)).unwrap();

        assert_eq!(table.len(), 8760);
        assert_eq!(table.field(100, 4), Some("\"25.5"));
        assert_eq!(table.field(101, 4), Some("25.5"));
    }

    #[test]
    fn test_shape_errors() {
        let normalizer = SchemaNormalizer::new();

        assert!(normalizer.normalize(&RawTable::new(preamble())).is_err());

        let mut wrong_header = preamble();
        wrong_header.push("YEAR,MO,DY,HR,T2M".into());
        assert!(normalizer.normalize(&RawTable::new(wrong_header)).is_err());

        let mut wide_row = preamble();
        wide_row.push("YEAR,MO,DY,HR,T2M,PS,WD50M,WS50M".into());
        wide_row.push("2015,1,1,0,1,2,3,4,5".into());
        assert!(normalizer.normalize(&RawTable::new(wide_row)).is_err());
    }

    #[test]
    fn test_normalize_all_names_the_file_on_error() {
        let mut data: CityMap<RawTable> = BTreeMap::new();
        data.entry("Karachi".into())
            .or_default()
            .insert("Karachi (2015).csv".into(), RawTable::new(vec!["x".into()]));

        let error = SchemaNormalizer::new().normalize_all(&data).unwrap_err();
        assert!(error.to_string().contains("Karachi (2015).csv (Karachi)"));
    }
}
