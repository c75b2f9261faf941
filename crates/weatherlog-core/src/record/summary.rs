//! Daily min/avg/max rows

use serde::{Deserialize, Serialize};

use super::{Quantity, Schema};

/// Column of a summary row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryField {
    /// Daily minimum
    Min,
    /// Time-weighted daily mean
    Avg,
    /// Daily maximum
    Max,
}

impl SummaryField {
    /// All fields in storage order
    pub const ALL: [SummaryField; 3] = [SummaryField::Min, SummaryField::Avg, SummaryField::Max];

    /// Short name used as series name in charts
    pub const fn label(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Avg => "avg",
            Self::Max => "max",
        }
    }
}

/// Minimum, time-weighted average and maximum of one quantity over a day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    /// Smallest value of the day
    pub min: f64,
    /// Time-weighted mean of the day
    pub avg: f64,
    /// Largest value of the day
    pub max: f64,
}

impl SummaryRow {
    /// Create a row from its three statistics
    pub fn new(min: f64, avg: f64, max: f64) -> Self {
        Self { min, avg, max }
    }

    /// Column precision of a summary of `quantity`: its own decimal places
    /// for all three statistics
    pub const fn precision_for(quantity: Quantity) -> &'static [usize] {
        match quantity.precision() {
            1 => &[1, 1, 1],
            _ => &[2, 2, 2],
        }
    }
}

impl Schema for SummaryRow {
    type Field = SummaryField;

    const PRECISION: &'static [usize] = &[1, 1, 1];

    fn from_columns(columns: &[f64]) -> Self {
        Self::new(columns[0], columns[1], columns[2])
    }

    fn columns(&self) -> Vec<f64> {
        vec![self.min, self.avg, self.max]
    }

    fn value(&self, field: SummaryField) -> f64 {
        match field {
            SummaryField::Min => self.min,
            SummaryField::Avg => self.avg,
            SummaryField::Max => self.max,
        }
    }
}
