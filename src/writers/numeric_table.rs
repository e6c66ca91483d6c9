use crate::error::{ProcessingError, Result};
use crate::models::{HourReading, MeasurementTable};
use crate::utils::format::format_value;
use csv::{ReaderBuilder, Terminator, WriterBuilder};

/// Render a table as header-less `temperature,pressure,direction,speed`
/// lines. Both the CSV artifact and the SRW body are this exact text.
pub fn render_table(table: &MeasurementTable) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(table.len() * 48));

    for row in &table.rows {
        writer.write_record(row.as_array().iter().map(|v| format_value(*v)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ProcessingError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8 in table: {}", e)))
}

/// Parse text produced by [`render_table`].
pub fn parse_table(text: &str) -> Result<MeasurementTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != 4 {
            return Err(ProcessingError::InvalidFormat(format!(
                "row {} has {} values, expected 4",
                index,
                record.len()
            )));
        }

        let mut values = [0.0f64; 4];
        for (value, field) in values.iter_mut().zip(record.iter()) {
            *value = field.trim().parse().map_err(|_| {
                ProcessingError::InvalidFormat(format!("row {}: invalid number '{}'", index, field))
            })?;
        }
        let [temperature, pressure, wind_direction, wind_speed] = values;
        rows.push(HourReading::new(
            temperature,
            pressure,
            wind_direction,
            wind_speed,
        ));
    }

    Ok(MeasurementTable::new(rows))
}
