//! Sensor acquisition interface
//!
//! A [`Sensor`] delivers the four measured quantities; absolute humidity is
//! derived here from temperature and relative humidity.

use std::io;

use thiserror::Error;

use crate::record::Sample;

/// Errors that can occur while measuring
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// The sensor program ran but reported failure
    #[error("Sensor command failed: {0}")]
    Command(String),

    /// The sensor output is not four numbers
    #[error("Unexpected sensor output '{0}'")]
    Parse(String),

    /// The sensor could not be reached
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Current readings of the station's sensors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// °C
    pub temperature: f64,
    /// hPa as measured
    pub pressure_raw: f64,
    /// hPa corrected to sea level
    pub pressure_sea_level: f64,
    /// %
    pub rel_humidity: f64,
}

impl Reading {
    /// Parse `temperature pressure_raw pressure_sea_level rel_humidity`,
    /// separated by any whitespace
    pub fn parse(text: &str) -> Result<Self, AcquisitionError> {
        let values = text
            .split_whitespace()
            .map(|v| v.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| AcquisitionError::Parse(text.trim().to_string()))?;

        match values.as_slice() {
            &[temperature, pressure_raw, pressure_sea_level, rel_humidity] => Ok(Self {
                temperature,
                pressure_raw,
                pressure_sea_level,
                rel_humidity,
            }),
            _ => Err(AcquisitionError::Parse(text.trim().to_string())),
        }
    }
}

/// Absolute humidity in g/m³ from temperature (°C) and relative humidity (%)
pub fn absolute_humidity(temperature: f64, rel_humidity: f64) -> f64 {
    let saturation_hpa = 6.112 * (17.67 * temperature / (temperature + 243.5)).exp();
    saturation_hpa * rel_humidity * 2.1674 / (273.15 + temperature)
}

impl From<Reading> for Sample {
    fn from(reading: Reading) -> Self {
        Sample {
            temperature: reading.temperature,
            pressure_raw: reading.pressure_raw,
            pressure_sea_level: reading.pressure_sea_level,
            rel_humidity: reading.rel_humidity,
            abs_humidity: absolute_humidity(reading.temperature, reading.rel_humidity),
        }
    }
}

/// Source of readings
pub trait Sensor {
    /// Take one reading of all sensors
    fn measure(&mut self) -> Result<Reading, AcquisitionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_humidity() {
        assert!((absolute_humidity(20.0, 50.0) - 8.6391).abs() < 1e-3);
        assert!((absolute_humidity(-5.0, 80.0) - 2.7287).abs() < 1e-3);
        assert_eq!(absolute_humidity(15.0, 0.0), 0.0);
    }

    #[test]
    fn test_parse_reading() {
        let reading = Reading::parse("21.5 990.12\t1016.3  55.0\n").unwrap();
        assert_eq!(reading.temperature, 21.5);
        assert_eq!(reading.pressure_raw, 990.12);
        assert_eq!(reading.pressure_sea_level, 1016.3);
        assert_eq!(reading.rel_humidity, 55.0);
    }

    #[test]
    fn test_parse_reading_rejects_garbage() {
        assert!(matches!(Reading::parse("21.5 990"), Err(AcquisitionError::Parse(_))));
        assert!(matches!(
            Reading::parse("21.5 990 1016 x"),
            Err(AcquisitionError::Parse(_))
        ));
        assert!(matches!(Reading::parse(""), Err(AcquisitionError::Parse(_))));
    }

    #[test]
    fn test_sample_from_reading() {
        let sample = Sample::from(Reading {
            temperature: 20.0,
            pressure_raw: 990.0,
            pressure_sea_level: 1015.0,
            rel_humidity: 50.0,
        });
        assert!((sample.abs_humidity - 8.6391).abs() < 1e-3);
        assert_eq!(sample.pressure_sea_level, 1015.0);
    }
}
