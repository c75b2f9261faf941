//! Time-Series Store
//!
//! A [`TimeSeriesLog`] is an append-only text file of records of one schema.
//! Records are appended in real time, so the file is ordered by timestamp and
//! every query is a single forward scan:
//!
//! - [`TimeSeriesLog::append`] adds a line (creating the file on first use)
//! - [`TimeSeriesLog::append_trimmed`] adds a line and drops everything older
//!   than the retention horizon relative to that line
//! - [`TimeSeriesLog::read_window`] returns the suffix of records no older
//!   than a maximum age, projected onto the requested fields
//!
//! A line that fails to decode aborts the whole operation; skipping it would
//! silently break the ordering the window scan relies on.

mod error;
mod window;

pub use error::StoreError;
pub use window::{Series, Window};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::clock::Zone;
use crate::record::{self, Record, Schema};

/// A single log file holding records of schema `S`
#[derive(Debug, Clone)]
pub struct TimeSeriesLog<S> {
    path: PathBuf,
    zone: Zone,
    precision: &'static [usize],
    _schema: PhantomData<S>,
}

impl<S: Schema> TimeSeriesLog<S> {
    /// Open a log at `path`; the file does not need to exist yet
    pub fn new(path: impl Into<PathBuf>, zone: Zone) -> Self {
        Self {
            path: path.into(),
            zone,
            precision: S::PRECISION,
            _schema: PhantomData,
        }
    }

    /// Store values with `precision` decimal places per column instead of
    /// the schema's defaults
    pub fn with_precision(mut self, precision: &'static [usize]) -> Self {
        self.precision = precision;
        self
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the log file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Append one record, creating the file if needed
    pub fn append(&self, record: &Record<S>) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::Io {
                path: self.path.clone(),
                source: e,
            })?;
        writeln!(file, "{}", self.encode(record)).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Append one record and drop every line older than `retention` seconds
    /// relative to it.
    ///
    /// Lines are kept from the first one whose timestamp is at or after
    /// `record.timestamp() - retention`. Returns the number of dropped lines.
    /// A missing file is treated as an empty log.
    pub fn append_trimmed(&self, record: &Record<S>, retention: i64) -> Result<usize, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let lines: Vec<&str> = content.lines().collect();

        let cutoff = record.timestamp() - retention;
        let keep_from = self.first_at_or_after(&lines, cutoff)?.unwrap_or(lines.len());

        let mut output = String::with_capacity(content.len() + 64);
        for line in &lines[keep_from..] {
            output.push_str(line);
            output.push('\n');
        }
        output.push_str(&self.encode(record));
        output.push('\n');
        self.replace_contents(&output)?;

        debug!(
            "Appended to {} and trimmed {} of {} lines",
            self.path.display(),
            keep_from,
            lines.len()
        );
        Ok(keep_from)
    }

    /// Drop every line older than `retention` seconds relative to the newest
    /// record. Returns the number of dropped lines.
    pub fn trim(&self, retention: i64) -> Result<usize, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let lines: Vec<&str> = content.lines().collect();
        let Some(last) = lines.last() else {
            return Ok(0);
        };

        let newest = self.decode_line(last, lines.len())?.timestamp();
        let keep_from = self
            .first_at_or_after(&lines, newest - retention)?
            .unwrap_or(lines.len());
        if keep_from == 0 {
            return Ok(0);
        }

        let mut output = String::with_capacity(content.len());
        for line in &lines[keep_from..] {
            output.push_str(line);
            output.push('\n');
        }
        self.replace_contents(&output)?;
        Ok(keep_from)
    }

    /// Read the records no older than `max_age` seconds relative to `now`,
    /// projected onto `fields`.
    ///
    /// With `max_age` of `None` the whole log is returned. A log without any
    /// record in range yields [`StoreError::EmptyWindow`].
    pub fn read_window(
        &self,
        fields: &[S::Field],
        max_age: Option<i64>,
        now: i64,
    ) -> Result<Window<S::Field>, StoreError> {
        self.read_since(fields, max_age.map(|age| now - age))
    }

    /// Read the records with a timestamp at or after `cutoff` (all records
    /// when `None`), projected onto `fields`
    pub fn read_since(
        &self,
        fields: &[S::Field],
        cutoff: Option<i64>,
    ) -> Result<Window<S::Field>, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let lines: Vec<&str> = content.lines().collect();

        let start = match cutoff {
            Some(cutoff) => self.first_at_or_after(&lines, cutoff)?,
            None => (!lines.is_empty()).then_some(0),
        };
        let Some(start) = start else {
            return Err(StoreError::EmptyWindow {
                path: self.path.clone(),
                cutoff,
            });
        };

        let mut window = Window::with_fields(fields, lines.len() - start);
        for (index, line) in lines.iter().enumerate().skip(start) {
            let record = self.decode_line(line, index + 1)?;
            window.timestamps.push(record.timestamp());
            for series in &mut window.series {
                series.values.push(record.value(series.field));
            }
        }

        debug!(
            "Read {} records from {} (cutoff {:?})",
            window.len(),
            self.path.display(),
            cutoff
        );
        Ok(window)
    }

    /// Read every record of the log
    pub fn records(&self) -> Result<Vec<Record<S>>, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        content
            .lines()
            .enumerate()
            .map(|(index, line)| self.decode_line(line, index + 1))
            .collect()
    }

    /// The record as it reads back after being appended to this log
    pub fn as_stored(&self, record: &Record<S>) -> Result<Record<S>, StoreError> {
        self.decode_line(&self.encode(record), 1)
    }

    fn encode(&self, record: &Record<S>) -> String {
        record::encode_with_precision(record, self.precision)
    }

    /// Index of the first line with a timestamp at or after `cutoff`
    fn first_at_or_after(&self, lines: &[&str], cutoff: i64) -> Result<Option<usize>, StoreError> {
        for (index, line) in lines.iter().enumerate() {
            if self.decode_line(line, index + 1)?.timestamp() >= cutoff {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    fn decode_line(&self, line: &str, line_number: usize) -> Result<Record<S>, StoreError> {
        record::decode(line, self.zone).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            line: line_number,
            source,
        })
    }

    /// Replace the file through a sibling temporary file and a rename
    fn replace_contents(&self, contents: &str) -> Result<(), StoreError> {
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, contents).map_err(|e| StoreError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SummaryField, SummaryRow};
    use tempfile::TempDir;

    fn row(ts: i64, avg: f64) -> Record<SummaryRow> {
        Record::at(ts, SummaryRow::new(avg - 1.0, avg, avg + 1.0), Zone::UTC).unwrap()
    }

    #[test]
    fn test_append_creates_file() {
        let dir = TempDir::new().unwrap();
        let log = TimeSeriesLog::new(dir.path().join("summary.txt"), Zone::UTC);
        assert!(!log.exists());

        log.append(&row(86_400, 5.0)).unwrap();
        log.append(&row(2 * 86_400, 6.0)).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "1970-01-02\t00:00\t4.0\t5.0\t6.0\n1970-01-03\t00:00\t5.0\t6.0\t7.0\n"
        );
    }

    #[test]
    fn test_read_missing_log() {
        let dir = TempDir::new().unwrap();
        let log: TimeSeriesLog<SummaryRow> = TimeSeriesLog::new(dir.path().join("nope.txt"), Zone::UTC);
        let err = log.read_window(&[SummaryField::Avg], None, 0).unwrap_err();
        assert!(matches!(err, StoreError::MissingLog(_)));
        assert!(matches!(log.trim(60), Err(StoreError::MissingLog(_))));
    }

    #[test]
    fn test_trim_empty_and_single_line_log() {
        let dir = TempDir::new().unwrap();
        let log = TimeSeriesLog::new(dir.path().join("c.txt"), Zone::UTC);
        fs::write(log.path(), "").unwrap();
        assert_eq!(log.trim(60).unwrap(), 0);

        log.append(&row(600, 1.0)).unwrap();
        assert_eq!(log.trim(60).unwrap(), 0);
        assert_eq!(log.records().unwrap().len(), 1);
    }

    #[test]
    fn test_trim_relative_to_newest() {
        let dir = TempDir::new().unwrap();
        let log = TimeSeriesLog::new(dir.path().join("c.txt"), Zone::UTC);
        for i in 0..10 {
            log.append(&row(i * 60, i as f64)).unwrap();
        }
        // newest is 540; horizon 180 keeps 360..=540
        assert_eq!(log.trim(180).unwrap(), 6);
        let stamps: Vec<i64> = log.records().unwrap().iter().map(|r| r.timestamp()).collect();
        assert_eq!(stamps, vec![360, 420, 480, 540]);
    }

    #[test]
    fn test_read_projection_order() {
        let dir = TempDir::new().unwrap();
        let log = TimeSeriesLog::new(dir.path().join("s.txt"), Zone::UTC);
        log.append(&row(0, 10.0)).unwrap();
        log.append(&row(60, 20.0)).unwrap();

        let window = log
            .read_window(&[SummaryField::Max, SummaryField::Min], None, 0)
            .unwrap();
        assert_eq!(window.timestamps, vec![0, 60]);
        assert_eq!(window.series[0].field, SummaryField::Max);
        assert_eq!(window.series[0].values, vec![11.0, 21.0]);
        assert_eq!(window.series[1].values, vec![9.0, 19.0]);
        assert!(window.values(SummaryField::Avg).is_empty());
    }

    #[test]
    fn test_custom_precision_is_stored() {
        let dir = TempDir::new().unwrap();
        let log: TimeSeriesLog<SummaryRow> =
            TimeSeriesLog::new(dir.path().join("p.txt"), Zone::UTC).with_precision(&[2, 2, 2]);
        let record = Record::at(120, SummaryRow::new(1012.5, 1014.1, 1016.25), Zone::UTC).unwrap();
        log.append(&record).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "1970-01-01\t00:02\t1012.50\t1014.10\t1016.25\n");

        let stored = log.as_stored(&record).unwrap();
        assert_eq!(log.records().unwrap(), vec![stored.clone()]);
        assert_eq!(stored.values().max, 1016.25);
    }

    #[test]
    fn test_decode_error_aborts_read() {
        let dir = TempDir::new().unwrap();
        let log: TimeSeriesLog<SummaryRow> = TimeSeriesLog::new(dir.path().join("s.txt"), Zone::UTC);
        fs::write(
            log.path(),
            "1970-01-01\t00:00\t1.0\t2.0\t3.0\n1970-01-01\t00:01\t1.0\t2.0\n1970-01-01\t00:02\t1.0\t2.0\t3.0\n",
        )
        .unwrap();

        match log.read_window(&[SummaryField::Avg], None, 0) {
            Err(StoreError::Decode { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected decode error, got {:?}", other),
        }
    }
}
