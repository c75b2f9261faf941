//! Weather sample rows

use serde::{Deserialize, Serialize};

use super::Schema;

/// One measured quantity of a weather sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Air temperature in °C
    Temperature,
    /// Pressure as measured by the sensor in hPa
    PressureRaw,
    /// Pressure corrected to sea level in hPa
    PressureSeaLevel,
    /// Relative humidity in %
    HumidityRel,
    /// Absolute humidity in g/m³
    HumidityAbs,
}

impl Quantity {
    /// All quantities in storage order
    pub const ALL: [Quantity; 5] = [
        Quantity::Temperature,
        Quantity::PressureRaw,
        Quantity::PressureSeaLevel,
        Quantity::HumidityRel,
        Quantity::HumidityAbs,
    ];

    /// Human readable name, also used for chart file names
    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::PressureRaw => "Raw Pressure",
            Self::PressureSeaLevel => "Sea Level Pressure",
            Self::HumidityRel => "Relative Humidity",
            Self::HumidityAbs => "Absolute Humidity",
        }
    }

    /// Unit suffix
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::PressureRaw | Self::PressureSeaLevel => "hPa",
            Self::HumidityRel => "%",
            Self::HumidityAbs => "g/m³",
        }
    }

    /// Column of the quantity in a log line (date and time come first)
    pub const fn column(self) -> usize {
        match self {
            Self::Temperature => 2,
            Self::PressureRaw => 3,
            Self::PressureSeaLevel => 4,
            Self::HumidityRel => 5,
            Self::HumidityAbs => 6,
        }
    }

    /// Decimal places stored in log files
    pub const fn precision(self) -> usize {
        match self {
            Self::Temperature | Self::HumidityRel => 1,
            Self::PressureRaw | Self::PressureSeaLevel | Self::HumidityAbs => 2,
        }
    }

    /// Axis label, e.g. `Temperature [°C]`
    pub fn axis_label(self) -> String {
        format!("{} [{}]", self.label(), self.unit())
    }
}

/// Numeric columns of a continuous or daily log line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// °C
    pub temperature: f64,
    /// hPa
    pub pressure_raw: f64,
    /// hPa
    pub pressure_sea_level: f64,
    /// %
    pub rel_humidity: f64,
    /// g/m³
    pub abs_humidity: f64,
}

impl Schema for Sample {
    type Field = Quantity;

    const PRECISION: &'static [usize] = &[
        Quantity::Temperature.precision(),
        Quantity::PressureRaw.precision(),
        Quantity::PressureSeaLevel.precision(),
        Quantity::HumidityRel.precision(),
        Quantity::HumidityAbs.precision(),
    ];

    fn from_columns(columns: &[f64]) -> Self {
        Self {
            temperature: columns[0],
            pressure_raw: columns[1],
            pressure_sea_level: columns[2],
            rel_humidity: columns[3],
            abs_humidity: columns[4],
        }
    }

    fn columns(&self) -> Vec<f64> {
        vec![
            self.temperature,
            self.pressure_raw,
            self.pressure_sea_level,
            self.rel_humidity,
            self.abs_humidity,
        ]
    }

    fn value(&self, field: Quantity) -> f64 {
        match field {
            Quantity::Temperature => self.temperature,
            Quantity::PressureRaw => self.pressure_raw,
            Quantity::PressureSeaLevel => self.pressure_sea_level,
            Quantity::HumidityRel => self.rel_humidity,
            Quantity::HumidityAbs => self.abs_humidity,
        }
    }
}
