//! Record decoding errors

use thiserror::Error;

/// Errors produced while decoding one log line
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The line has the wrong number of columns
    #[error("Expected {expected} tab-separated fields, found {found}")]
    FieldCount {
        /// Columns of the schema, including date and time
        expected: usize,
        /// Columns in the line
        found: usize,
    },

    /// The date column does not parse
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The time column does not parse
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    /// A value column is not a finite number
    #[error("Invalid number '{value}' in column {column}")]
    InvalidNumber {
        /// 1-based column index
        column: usize,
        /// Text of the column
        value: String,
    },

    /// The wall-clock time falls into a daylight saving gap
    #[error("Wall-clock time {0} does not exist in the configured zone")]
    NonexistentTime(String),
}
