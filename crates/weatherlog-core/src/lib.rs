//! # weatherlog Core Library
//!
//! Core functionality for a small weather station logger.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//!
//! This library provides:
//! - Tab-separated record format with local wall-clock timestamps
//! - Append-only time-series logs with retention trimming and windowed reads
//! - Time-weighted averaging of irregularly sampled series
//! - Calendar-aligned axis tick planning for day to year charts
//! - Orchestration of the continuous and daily station runs
//!
//! Measuring, drawing and mailing are behind the [`acquisition::Sensor`],
//! [`render::Renderer`] and [`mail::Mailer`] traits.
//!
//! ## Example
//!
//! ```rust,ignore
//! use weatherlog_core::prelude::*;
//!
//! let config = StationConfig::load(Path::new("weatherlog.json"))?;
//! let log = TimeSeriesLog::<Sample>::new(config.continuous_log_path(), config.zone);
//!
//! // Last 24 hours of temperature
//! let window = log.read_window(&[Quantity::Temperature], Some(DAY), SystemClock.now())?;
//! let mean = time_weighted_average(&window.timestamps, window.values(Quantity::Temperature))?;
//! println!("Mean temperature: {mean:.1} °C");
//! ```

pub mod acquisition;
pub mod average;
pub mod axis;
pub mod clock;
pub mod config;
pub mod mail;
pub mod record;
pub mod render;
pub mod station;
pub mod status;
pub mod store;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::acquisition::{Reading, Sensor};
    pub use crate::average::{average_timestamp, time_weighted_average};
    pub use crate::axis::{SpanKind, TickPlan, TickPlanner, DAY, HOUR, MONTH, WEEK, YEAR};
    pub use crate::clock::{Clock, FixedClock, SystemClock, Zone};
    pub use crate::config::StationConfig;
    pub use crate::mail::{MailMessage, Mailer};
    pub use crate::record::{Quantity, Record, Sample, SummaryField, SummaryRow};
    pub use crate::render::{Chart, ImageFormat, Renderer};
    pub use crate::station::{DailyReport, Station, StationError};
    pub use crate::store::{StoreError, TimeSeriesLog, Window};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
