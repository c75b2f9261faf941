//! Sensors available from the command line
//!
//! [`CommandSensor`] runs an external program that prints one reading,
//! [`DemoSensor`] simulates a plausible day of weather for trying the station
//! without hardware.

use std::f64::consts::TAU;
use std::process::Command;

use chrono::{Local, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use weatherlog_core::acquisition::{AcquisitionError, Reading, Sensor};

/// Runs a program printing
/// `temperature pressure_raw pressure_sea_level rel_humidity`
pub struct CommandSensor {
    program: String,
    args: Vec<String>,
}

impl CommandSensor {
    /// Build from a command line; the first element is the program
    pub fn new(command: &[String]) -> Result<Self, AcquisitionError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| AcquisitionError::Command("no sensor command configured".into()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl Sensor for CommandSensor {
    fn measure(&mut self) -> Result<Reading, AcquisitionError> {
        let output = Command::new(&self.program).args(&self.args).output()?;
        if !output.status.success() {
            return Err(AcquisitionError::Command(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("Sensor output: {}", stdout.trim());
        Reading::parse(&stdout)
    }
}

/// Simulated sensor following a daily temperature cycle with some noise
pub struct DemoSensor {
    rng: StdRng,
    /// Pressure drifts slowly between calls
    pressure: f64,
    altitude_m: f64,
}

impl DemoSensor {
    pub fn new(altitude_m: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), altitude_m)
    }

    /// Deterministic sensor for tests
    pub fn seeded(seed: u64, altitude_m: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), altitude_m)
    }

    fn with_rng(rng: StdRng, altitude_m: f64) -> Self {
        Self {
            rng,
            pressure: 1013.25,
            altitude_m,
        }
    }

    /// Reading at `hour` (fractional local hour of day)
    fn reading_at(&mut self, hour: f64) -> Reading {
        // coldest around 04:00, warmest around 16:00
        let phase = (hour - 10.0) / 24.0 * TAU;
        let temperature = 12.0 + 6.0 * phase.sin() + self.rng.gen_range(-0.3..0.3);
        let rel_humidity = (65.0 - 15.0 * phase.sin() + self.rng.gen_range(-2.0..2.0))
            .clamp(5.0, 100.0);

        self.pressure = (self.pressure + self.rng.gen_range(-0.4..0.4)).clamp(980.0, 1045.0);
        // barometric formula, inverted for the sensor's raw value
        let pressure_raw = self.pressure * (1.0 - 0.0065 * self.altitude_m / 288.15).powf(5.255);

        Reading {
            temperature,
            pressure_raw,
            pressure_sea_level: self.pressure,
            rel_humidity,
        }
    }
}

impl Sensor for DemoSensor {
    fn measure(&mut self) -> Result<Reading, AcquisitionError> {
        let now = Local::now();
        let hour = f64::from(now.hour()) + f64::from(now.minute()) / 60.0;
        Ok(self.reading_at(hour))
    }
}
