use crate::models::{CityMap, MeasurementTable};
use crate::utils::constants::{PASCALS_PER_ATMOSPHERE, PASCALS_PER_KILOPASCAL};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Native unit of the raw pressure column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnit {
    #[default]
    Kilopascal,
    Pascal,
}

impl PressureUnit {
    fn pascals_per_unit(self) -> f64 {
        match self {
            PressureUnit::Kilopascal => PASCALS_PER_KILOPASCAL,
            PressureUnit::Pascal => 1.0,
        }
    }

    /// Convert a raw reading to atmospheres: `raw * Pa-per-unit / 101325`.
    pub fn to_atm(self, raw: f64) -> f64 {
        (raw * self.pascals_per_unit()) / PASCALS_PER_ATMOSPHERE
    }
}

/// Rescales the pressure column to atmospheres. The input unit is trusted.
pub struct UnitConverter {
    unit: PressureUnit,
}

impl UnitConverter {
    pub fn new(unit: PressureUnit) -> Self {
        Self { unit }
    }

    pub fn convert_table(&self, table: &MeasurementTable) -> MeasurementTable {
        table.map_pressure(|raw| self.unit.to_atm(raw))
    }

    pub fn convert_all(&self, data: &CityMap<MeasurementTable>) -> CityMap<MeasurementTable> {
        data.iter()
            .map(|(city, files)| {
                let converted = files
                    .iter()
                    .map(|(name, table)| (name.clone(), self.convert_table(table)))
                    .collect();
                (city.clone(), converted)
            })
            .collect()
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(PressureUnit::default())
    }
}
