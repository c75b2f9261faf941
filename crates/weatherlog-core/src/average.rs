//! Time-Weighted Averager
//!
//! Samples arrive at a nominal cadence but gaps and jitter are normal, so a
//! plain arithmetic mean over-weights dense stretches. The average here is the
//! trapezoidal integral of the values over time divided by the elapsed span.
//! The same routine yields a representative timestamp by averaging the
//! timestamps themselves.

use thiserror::Error;

/// Errors from the averager
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AverageError {
    /// Fewer than two samples
    #[error("Time-weighted average needs at least 2 samples, got {found}")]
    InsufficientSamples {
        /// Number of samples given
        found: usize,
    },

    /// Timestamps and values differ in length
    #[error("Got {times} timestamps but {values} values")]
    LengthMismatch {
        /// Number of timestamps
        times: usize,
        /// Number of values
        values: usize,
    },

    /// First and last timestamp are equal
    #[error("Samples span zero seconds")]
    ZeroSpan,
}

/// Trapezoidal time-weighted average of `values` sampled at `times`.
///
/// `times` must be strictly increasing.
pub fn time_weighted_average(times: &[i64], values: &[f64]) -> Result<f64, AverageError> {
    if times.len() != values.len() {
        return Err(AverageError::LengthMismatch {
            times: times.len(),
            values: values.len(),
        });
    }
    if times.len() < 2 {
        return Err(AverageError::InsufficientSamples { found: times.len() });
    }

    let span = (times[times.len() - 1] - times[0]) as f64;
    if span == 0.0 {
        return Err(AverageError::ZeroSpan);
    }

    let integral: f64 = times
        .windows(2)
        .zip(values.windows(2))
        .map(|(t, v)| (t[1] - t[0]) as f64 * 0.5 * (v[0] + v[1]))
        .sum();

    Ok(integral / span)
}

/// Time-weighted mean of the timestamps themselves, rounded to a second
pub fn average_timestamp(times: &[i64]) -> Result<i64, AverageError> {
    let as_values: Vec<f64> = times.iter().map(|&t| t as f64).collect();
    time_weighted_average(times, &as_values).map(|t| t.round() as i64)
}
