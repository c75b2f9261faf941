//! Series Query Orchestrator
//!
//! Ties the pieces together for the two scheduled runs of the station:
//!
//! - **continuous** (every sample interval): measure, append to the daily and
//!   continuous logs, refresh the status page, redraw the web charts
//! - **daily** (shortly after midnight): condense the last day into one
//!   summary row, redraw the average charts, draw yesterday's charts for the
//!   mail, and send them
//!
//! Errors from the store, averager and collaborators are passed through
//! unchanged; an error aborts the rest of the run while earlier appends stay.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::acquisition::{AcquisitionError, Reading, Sensor};
use crate::average::{average_timestamp, time_weighted_average, AverageError};
use crate::axis::{SpanKind, TickPlanner};
use crate::clock::{Clock, SystemClock};
use crate::config::StationConfig;
use crate::mail::{select_attachments, MailError, MailMessage, Mailer};
use crate::record::{DecodeError, Quantity, Record, Sample, SummaryField, SummaryRow, DATE_FORMAT};
use crate::render::{chart_file_name, Chart, ChartSeries, ImageFormat, RenderError, Renderer};
use crate::status;
use crate::store::{StoreError, TimeSeriesLog, Window};

/// Logged after the average charts of a daily run are drawn
pub const LOG_SUCCESS_AVERAGE_PLOTS: &str = "Successfully created average plots.";
/// Logged after the charts of a log's samples are drawn
pub const LOG_SUCCESS_RAW_DATA_PLOTS: &str = "Successfully created raw data plots.";
/// Logged after the daily mail went out
pub const LOG_SUCCESS_E_MAILS: &str = "Successfully sent e-mails.";

/// Errors of a station run
#[derive(Error, Debug)]
pub enum StationError {
    /// Reading or writing a log failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The summary window could not be averaged
    #[error(transparent)]
    Average(#[from] AverageError),

    /// An instant could not be turned into a record
    #[error(transparent)]
    Record(#[from] DecodeError),

    /// The sensor failed
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// A chart could not be drawn
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Attachments could not be collected or the mail not sent
    #[error(transparent)]
    Mail(#[from] MailError),

    /// The run's date has no calendar predecessor
    #[error("No day before {0}")]
    NoPreviousDay(NaiveDate),

    /// A directory or the status page could not be written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

/// Outcome of a daily run
#[derive(Debug, Clone)]
pub struct DailyReport {
    /// The day that was summarised and mailed
    pub date: NaiveDate,
    /// Row appended to the summary log
    pub summary: Record<SummaryRow>,
    /// Number of charts written
    pub charts: usize,
    /// Files handed to the mailer
    pub attachments: Vec<PathBuf>,
    /// Whether a mail was sent
    pub mailed: bool,
}

/// A weather station with its configuration and collaborators
pub struct Station {
    config: StationConfig,
    clock: Box<dyn Clock>,
    renderer: Box<dyn Renderer>,
    mailer: Option<Box<dyn Mailer>>,
}

impl Station {
    /// Create a station using the system clock and no mailer
    pub fn new(config: StationConfig, renderer: impl Renderer + 'static) -> Self {
        Self {
            config,
            clock: Box::new(SystemClock),
            renderer: Box::new(renderer),
            mailer: None,
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Set the mailer used by the daily run
    pub fn with_mailer(mut self, mailer: impl Mailer + 'static) -> Self {
        self.mailer = Some(Box::new(mailer));
        self
    }

    /// The station's configuration
    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// The rolling, retention-bounded log
    pub fn continuous_log(&self) -> TimeSeriesLog<Sample> {
        TimeSeriesLog::new(self.config.continuous_log_path(), self.config.zone)
    }

    /// The log of daily min/avg/max rows of `quantity`, stored with the
    /// quantity's own precision
    pub fn summary_log(&self, quantity: Quantity) -> TimeSeriesLog<SummaryRow> {
        TimeSeriesLog::new(self.config.summary_log_path(quantity), self.config.zone)
            .with_precision(SummaryRow::precision_for(quantity))
    }

    /// The log holding one calendar day's samples
    pub fn daily_log(&self, date: NaiveDate) -> TimeSeriesLog<Sample> {
        TimeSeriesLog::new(self.config.daily_log_path(date), self.config.zone)
    }

    /// Measure, store, and redraw the web charts
    pub fn continuous(&self, sensor: &mut dyn Sensor) -> Result<Record<Sample>, StationError> {
        let reading = sensor.measure()?;
        let now = self.clock.now();
        let record = self.store_reading(reading, now)?;
        self.render_continuous_charts_at(now)?;
        info!("{}", LOG_SUCCESS_RAW_DATA_PLOTS);
        Ok(record)
    }

    /// Append a reading to the daily and continuous logs and update the
    /// status page. Returns the record as it was stored.
    pub fn record_reading(&self, reading: Reading) -> Result<Record<Sample>, StationError> {
        self.store_reading(reading, self.clock.now())
    }

    fn store_reading(&self, reading: Reading, now: i64) -> Result<Record<Sample>, StationError> {
        let record = Record::at(now, Sample::from(reading), self.config.zone)?;
        ensure_dir(&self.config.paths.data_dir)?;

        let continuous = self.continuous_log();
        let record = continuous.as_stored(&record)?;
        self.daily_log(record.date()).append(&record)?;
        let dropped = continuous.append_trimmed(&record, self.config.retention_secs)?;
        debug!("Continuous log: dropped {} expired records", dropped);

        if let Some(page) = &self.config.paths.status_page {
            status::update_status_page(page, &record, self.config.altitude_m).map_err(|e| {
                StationError::Io {
                    path: page.clone(),
                    source: e,
                }
            })?;
        }
        Ok(record)
    }

    /// Redraw every configured chart of the continuous log
    pub fn render_continuous_charts(&self) -> Result<usize, StationError> {
        self.render_continuous_charts_at(self.clock.now())
    }

    fn render_continuous_charts_at(&self, now: i64) -> Result<usize, StationError> {
        let dir = &self.config.paths.images_web_dir;
        ensure_dir(dir)?;

        let log = self.continuous_log();
        let mut count = 0;
        for set in &self.config.charts.continuous {
            let window = log.read_window(&set.quantities, Some(set.span.span()), now)?;
            count += self.render_quantities(
                &window,
                set.span,
                now,
                dir,
                &set.prefix,
                self.config.formats.web,
            )?;
        }
        Ok(count)
    }

    /// Summarise the last day of `quantity` into one row of the summary log.
    ///
    /// The row is stamped with the time-weighted mean of the sample times.
    /// Returns the row as it was stored.
    pub fn write_summary(&self, quantity: Quantity) -> Result<Record<SummaryRow>, StationError> {
        self.write_summary_at(quantity, self.clock.now())
    }

    fn write_summary_at(
        &self,
        quantity: Quantity,
        now: i64,
    ) -> Result<Record<SummaryRow>, StationError> {
        let window = self.continuous_log().read_window(
            &[quantity],
            Some(self.config.summary_window_secs()),
            now,
        )?;
        let values = window.values(quantity);

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = time_weighted_average(&window.timestamps, values)?;
        let at = average_timestamp(&window.timestamps)?;

        let log = self.summary_log(quantity);
        let record = Record::at(at, SummaryRow::new(min, avg, max), self.config.zone)?;
        log.append(&record)?;
        let record = log.as_stored(&record)?;
        debug!(
            "Summary of {} over {} samples: {:?}",
            quantity.label(),
            window.len(),
            record.values()
        );
        Ok(record)
    }

    /// Redraw the min/avg/max charts from the summary log
    pub fn render_average_charts(&self) -> Result<usize, StationError> {
        self.render_average_charts_at(self.clock.now())
    }

    fn render_average_charts_at(&self, now: i64) -> Result<usize, StationError> {
        let dir = &self.config.paths.images_web_dir;
        ensure_dir(dir)?;

        let quantity = self.config.charts.summary_quantity;
        let style = self.config.styles.for_quantity(quantity);
        let line_style = |field| match field {
            SummaryField::Min => self.config.styles.min,
            SummaryField::Avg => self.config.styles.avg,
            SummaryField::Max => self.config.styles.max,
        };
        let planner = TickPlanner::for_zone(self.config.zone, now);
        let format = self.config.formats.web;

        let log = self.summary_log(quantity);
        let mut count = 0;
        for average in &self.config.charts.averages {
            let window = log.read_since(&SummaryField::ALL, Some(now - average.span.span()))?;
            let plan = planner.plan(&window.timestamps, average.span);
            let chart = Chart {
                timestamps: &window.timestamps,
                series: window
                    .series
                    .iter()
                    .map(|s| ChartSeries {
                        name: s.field.label(),
                        values: &s.values,
                        line_style: line_style(s.field),
                    })
                    .collect(),
                ticks: &plan,
                x_label: average.span.x_label(),
                y_label: quantity.axis_label(),
                color: &style.color,
                format,
            };
            let path = dir.join(chart_file_name(&average.prefix, quantity.label(), format));
            self.renderer.render(&chart, &path)?;
            count += 1;
        }
        Ok(count)
    }

    /// Draw the charts of one day's log into the mail image directory,
    /// prefixed with the date
    pub fn render_daily_charts(&self, date: NaiveDate) -> Result<usize, StationError> {
        self.render_daily_charts_at(date, self.clock.now())
    }

    fn render_daily_charts_at(&self, date: NaiveDate, now: i64) -> Result<usize, StationError> {
        let dir = &self.config.paths.images_mail_dir;
        ensure_dir(dir)?;

        let window = self
            .daily_log(date)
            .read_window(&self.config.charts.daily, None, now)?;
        let prefix = date.format(DATE_FORMAT).to_string();
        self.render_quantities(
            &window,
            SpanKind::Day,
            now,
            dir,
            &prefix,
            self.config.formats.mail,
        )
    }

    /// Mail every chart and log of `date`; returns the attachments and whether
    /// a mail went out
    pub fn mail_day(&self, date: NaiveDate) -> Result<(Vec<PathBuf>, bool), StationError> {
        let prefix = date.format(DATE_FORMAT).to_string();
        let attachments = select_attachments(
            &[
                self.config.paths.images_mail_dir.as_path(),
                self.config.paths.data_dir.as_path(),
            ],
            &prefix,
        )?;

        let mail = &self.config.mail;
        let Some(mailer) = self.mailer.as_ref().filter(|_| mail.is_enabled()) else {
            debug!("Mail disabled, {} attachments not sent", attachments.len());
            return Ok((attachments, false));
        };

        let message = MailMessage {
            sender: mail.sender.clone(),
            recipients: mail.recipients.clone(),
            subject: format!("{}{}", mail.subject_prefix, prefix),
            body: mail.body.clone(),
            attachments: attachments.clone(),
            bcc: mail.bcc,
        };
        mailer.send(&message)?;
        info!("{}", LOG_SUCCESS_E_MAILS);
        Ok((attachments, true))
    }

    /// The once-a-day run. "Yesterday" is the calendar day before the local
    /// date of the run, whatever its length.
    pub fn daily(&self) -> Result<DailyReport, StationError> {
        let now = self.clock.now();
        let today = self.config.zone.wall_clock(now).date();
        let date = today.pred_opt().ok_or(StationError::NoPreviousDay(today))?;

        let summary = self.write_summary_at(self.config.charts.summary_quantity, now)?;
        let mut charts = self.render_average_charts_at(now)?;
        info!("{}", LOG_SUCCESS_AVERAGE_PLOTS);

        charts += self.render_daily_charts_at(date, now)?;
        info!("{}", LOG_SUCCESS_RAW_DATA_PLOTS);

        let (attachments, mailed) = self.mail_day(date)?;

        Ok(DailyReport {
            date,
            summary,
            charts,
            attachments,
            mailed,
        })
    }

    /// One chart per series of `window`, named `<prefix>_<Label>.<ext>`
    fn render_quantities(
        &self,
        window: &Window<Quantity>,
        span: SpanKind,
        now: i64,
        dir: &Path,
        prefix: &str,
        format: ImageFormat,
    ) -> Result<usize, StationError> {
        let plan = TickPlanner::for_zone(self.config.zone, now).plan(&window.timestamps, span);
        for series in &window.series {
            let quantity = series.field;
            let style = self.config.styles.for_quantity(quantity);
            let chart = Chart {
                timestamps: &window.timestamps,
                series: vec![ChartSeries {
                    name: quantity.label(),
                    values: &series.values,
                    line_style: style.line_style,
                }],
                ticks: &plan,
                x_label: span.x_label(),
                y_label: quantity.axis_label(),
                color: &style.color,
                format,
            };
            let path = dir.join(chart_file_name(prefix, quantity.label(), format));
            self.renderer.render(&chart, &path)?;
        }
        Ok(window.series.len())
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StationError> {
    fs::create_dir_all(dir).map_err(|e| StationError::Io {
        path: dir.to_path_buf(),
        source: e,
    })
}
