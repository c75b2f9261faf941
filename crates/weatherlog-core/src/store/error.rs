//! Time-series store errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::record::DecodeError;

/// Errors that can occur while appending to, trimming or reading a log
#[derive(Error, Debug)]
pub enum StoreError {
    /// A line of the log does not decode
    #[error("Malformed record in {} at line {line}: {source}", .path.display())]
    Decode {
        /// Log file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Why the line was rejected
        source: DecodeError,
    },

    /// No record is at or after the cutoff
    #[error("No records in {} at or after {}", .path.display(), cutoff_text(.cutoff))]
    EmptyWindow {
        /// Log file
        path: PathBuf,
        /// Earliest timestamp asked for, `None` for the whole log
        cutoff: Option<i64>,
    },

    /// The log file does not exist
    #[error("Log file not found: {}", .0.display())]
    MissingLog(PathBuf),

    /// The log file could not be read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

fn cutoff_text(cutoff: &Option<i64>) -> String {
    match cutoff {
        Some(t) => t.to_string(),
        None => "the beginning".to_string(),
    }
}

impl StoreError {
    /// Whether the error only means that no data falls into the window yet
    pub fn is_empty_window(&self) -> bool {
        matches!(self, StoreError::EmptyWindow { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::MissingLog(path)
        } else {
            StoreError::Io { path, source }
        }
    }
}
