//! Log records
//!
//! A record is one line of a time-series log: a local date, a local time of
//! day with minute resolution, and a fixed number of numeric columns whose
//! meaning is given by a [`Schema`]. Two schemas exist:
//!
//! - [`Sample`]: one weather reading (continuous and daily logs)
//! - [`SummaryRow`]: one daily min/avg/max row (summary logs)
//!
//! The timestamp of a record is never stored; it is derived from the date and
//! time columns in [`Record::new`], which both the writer and the decoder go
//! through.

mod codec;
mod error;
mod sample;
mod summary;

pub use codec::{decode, encode, encode_with_precision};
pub use error::DecodeError;
pub use sample::{Quantity, Sample};
pub use summary::{SummaryField, SummaryRow};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

use crate::clock::Zone;

/// Format of the date column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the time column
pub const TIME_FORMAT: &str = "%H:%M";

/// Numeric columns of a log row, following the date and time columns
pub trait Schema: Sized + Clone + fmt::Debug {
    /// Selector for one numeric column
    type Field: Copy + fmt::Debug + PartialEq + Eq;

    /// Decimal places of each numeric column, in storage order
    const PRECISION: &'static [usize];

    /// Build a row from its numeric columns in storage order.
    ///
    /// `columns` always has `PRECISION.len()` entries.
    fn from_columns(columns: &[f64]) -> Self;

    /// Numeric columns in storage order
    fn columns(&self) -> Vec<f64>;

    /// Value of a single field
    fn value(&self, field: Self::Field) -> f64;

    /// Number of numeric columns
    fn width() -> usize {
        Self::PRECISION.len()
    }
}

/// One immutable row of a time-series log
#[derive(Debug, Clone, PartialEq)]
pub struct Record<S> {
    wall_clock: NaiveDateTime,
    timestamp: i64,
    values: S,
}

impl<S: Schema> Record<S> {
    /// Create a record for a local wall-clock time.
    ///
    /// Seconds are dropped, since the time column only has minute resolution.
    pub fn new(wall_clock: NaiveDateTime, values: S, zone: Zone) -> Result<Self, DecodeError> {
        let wall_clock = truncate_to_minute(wall_clock);
        let timestamp = zone
            .timestamp(wall_clock)
            .ok_or_else(|| DecodeError::NonexistentTime(wall_clock.to_string()))?;
        Ok(Self {
            wall_clock,
            timestamp,
            values,
        })
    }

    /// Create a record for an instant, stamped with the zone's wall clock
    pub fn at(timestamp: i64, values: S, zone: Zone) -> Result<Self, DecodeError> {
        Self::new(zone.wall_clock(timestamp), values, zone)
    }

    /// Seconds since the Unix epoch derived from date and time
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Local wall-clock time of the record
    pub fn wall_clock(&self) -> NaiveDateTime {
        self.wall_clock
    }

    /// Local calendar date of the record
    pub fn date(&self) -> NaiveDate {
        self.wall_clock.date()
    }

    /// The numeric columns
    pub fn values(&self) -> &S {
        &self.values
    }

    /// Value of a single field
    pub fn value(&self, field: S::Field) -> f64 {
        self.values.value(field)
    }
}

fn truncate_to_minute(wall_clock: NaiveDateTime) -> NaiveDateTime {
    let time = wall_clock.time();
    let minute = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
    wall_clock.date().and_time(minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_drops_seconds() {
        let wall = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap();
        let record = Record::new(wall, SummaryRow::new(1.0, 2.0, 3.0), Zone::UTC).unwrap();
        assert_eq!(record.wall_clock().second(), 0);
        assert_eq!(record.timestamp() % 60, 0);
    }

    #[test]
    fn test_record_at_instant() {
        // 2024-03-01 12:30:45 UTC
        let ts = 1_709_296_245;
        let record = Record::at(ts, SummaryRow::new(1.0, 2.0, 3.0), Zone::UTC).unwrap();
        assert_eq!(record.timestamp(), ts - 45);
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
