//! Status page update
//!
//! The web page served next to the charts carries one line with the latest
//! reading. That line is found by its `Last Update` marker and replaced.

use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

use crate::record::{Record, Sample, DATE_FORMAT, TIME_FORMAT};

/// Marker identifying the status line
pub const STATUS_MARKER: &str = "Last Update";

/// HTML table with the latest reading, as one line
pub fn status_line(record: &Record<Sample>, altitude_m: f64) -> String {
    let wall_clock = record.wall_clock();
    let s = record.values();
    format!(
        "<table><tr><td>{}: </td><td>{}, {}</td></tr>\
         <tr><td>Temperature: </td><td>{:.1} &#8451;</td></tr>\
         <tr><td>Raw pressure: </td><td>{:.2} hPa</td></tr>\
         <tr><td>Sea level pressure: </td><td>{:.2} hPa</td></tr>\
         <tr><td>Relative Humidity: </td><td>{:.1} %</td></tr>\
         <tr><td>Absolute Humidity: </td><td>{:.2} g/m&sup3;</td></tr>\
         <tr><td>Altitude: </td><td>{:.1} m</td></tr></table>",
        STATUS_MARKER,
        wall_clock.format(DATE_FORMAT),
        wall_clock.format(TIME_FORMAT),
        s.temperature,
        s.pressure_raw,
        s.pressure_sea_level,
        s.rel_humidity,
        s.abs_humidity,
        altitude_m
    )
}

/// Replace the status line of the page at `path`.
///
/// Returns `false` and leaves the file untouched when no line carries the
/// marker.
pub fn update_status_page(path: &Path, record: &Record<Sample>, altitude_m: f64) -> io::Result<bool> {
    let content = fs::read_to_string(path)?;
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    let Some(index) = lines.iter().position(|l| l.contains(STATUS_MARKER)) else {
        warn!("No '{}' line in {}", STATUS_MARKER, path.display());
        return Ok(false);
    };
    lines[index] = status_line(record, altitude_m);

    let mut output = lines.join("\n");
    output.push('\n');
    fs::write(path, output)?;
    Ok(true)
}
