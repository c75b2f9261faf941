//! Station configuration
//!
//! Stored as JSON. Every field has a default, so an absent file or a partial
//! one is fine; the values here reproduce the station's historical setup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::axis::{SpanKind, DAY, MINUTE, YEAR};
use crate::clock::Zone;
use crate::record::{Quantity, DATE_FORMAT};
use crate::render::{ImageFormat, LineStyle};

/// Errors that can occur while loading or saving the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Configuration file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The file is not valid configuration JSON
    #[error("Invalid configuration file {}: {source}", .path.display())]
    Parse {
        /// Configuration file
        path: PathBuf,
        /// Position and cause reported by the parser
        source: serde_json::Error,
    },

    /// The configuration could not be turned into JSON
    #[error("Could not serialize configuration for {}: {source}", .path.display())]
    Serialize {
        /// Destination file
        path: PathBuf,
        /// Cause reported by the serializer
        source: serde_json::Error,
    },

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete station configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Directories and pages
    pub paths: PathsConfig,

    /// Log file names
    pub files: FilesConfig,

    /// Zone used to interpret the wall-clock columns of the logs
    pub zone: Zone,

    /// Station altitude in meters
    pub altitude_m: f64,

    /// Nominal seconds between two samples
    pub sample_interval_secs: i64,

    /// Seconds of history kept in the continuous log
    pub retention_secs: i64,

    /// Image formats for web and mail charts
    pub formats: FormatsConfig,

    /// Colours and line styles
    pub styles: StylesConfig,

    /// Which charts are drawn
    pub charts: ChartsConfig,

    /// Daily mail settings
    pub mail: MailConfig,

    /// Program and arguments printing one reading
    pub sensor_command: Vec<String>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            files: FilesConfig::default(),
            zone: Zone::Local,
            altitude_m: 217.0,
            sample_interval_secs: 15 * MINUTE,
            retention_secs: YEAR,
            formats: FormatsConfig::default(),
            styles: StylesConfig::default(),
            charts: ChartsConfig::default(),
            mail: MailConfig::default(),
            sensor_command: Vec::new(),
        }
    }
}

impl StationConfig {
    /// Load the configuration, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Reject values the components cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.zone.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "zone offset out of range: {:?}",
                self.zone
            )));
        }
        if self.sample_interval_secs <= 0 {
            return Err(ConfigError::Invalid(
                "sample_interval_secs must be positive".to_string(),
            ));
        }
        if self.retention_secs <= 0 {
            return Err(ConfigError::Invalid(
                "retention_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the rolling continuous log
    pub fn continuous_log_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.files.continuous)
    }

    /// Path of the daily summary log of `quantity`.
    ///
    /// The configured summary quantity uses `files.summary`; any other
    /// quantity gets its own `<Label>_min_avg_max.txt`.
    pub fn summary_log_path(&self, quantity: Quantity) -> PathBuf {
        if quantity == self.charts.summary_quantity {
            self.paths.data_dir.join(&self.files.summary)
        } else {
            self.paths
                .data_dir
                .join(format!("{}_min_avg_max.txt", quantity.label().replace(' ', "_")))
        }
    }

    /// Path of the log holding one day's samples
    pub fn daily_log_path(&self, date: NaiveDate) -> PathBuf {
        self.paths.data_dir.join(format!(
            "{}{}",
            date.format(DATE_FORMAT),
            self.files.daily_suffix
        ))
    }

    /// Window read for the daily summary: one day plus one sample interval
    pub fn summary_window_secs(&self) -> i64 {
        DAY + self.sample_interval_secs
    }
}

/// Directories and pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Log files
    pub data_dir: PathBuf,
    /// Application log (`weather.log`)
    pub log_dir: PathBuf,
    /// Charts served on the web page
    pub images_web_dir: PathBuf,
    /// Charts attached to the daily mail
    pub images_mail_dir: PathBuf,
    /// HTML page with the latest reading, if any
    pub status_page: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let base = home.join("weather");
        let html = PathBuf::from("/var/www/html");
        Self {
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
            images_web_dir: html.join("images"),
            images_mail_dir: base.join("images"),
            status_page: Some(html.join("index.html")),
        }
    }
}

/// Log file names inside the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Rolling log trimmed to the retention horizon
    pub continuous: String,
    /// Summary log of the configured summary quantity
    pub summary: String,
    /// Appended to the date for daily logs
    pub daily_suffix: String,
    /// Application log inside the log directory
    pub app_log: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            continuous: "continuous_weather.txt".to_string(),
            summary: "T_min_avg_max.txt".to_string(),
            daily_suffix: "_weather.txt".to_string(),
            app_log: "weather.log".to_string(),
        }
    }
}

/// Image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatsConfig {
    /// Charts for the web page
    pub web: ImageFormat,
    /// Charts attached to the daily mail
    pub mail: ImageFormat,
}

/// Colour and stroke of one quantity's curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityStyle {
    /// `#rrggbb`
    pub color: String,
    /// Stroke of the curve
    #[serde(default)]
    pub line_style: LineStyle,
}

impl QuantityStyle {
    fn solid(color: &str) -> Self {
        Self {
            color: color.to_string(),
            line_style: LineStyle::Solid,
        }
    }
}

/// Chart styles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Temperature curve
    pub temperature: QuantityStyle,
    /// Raw pressure curve
    pub pressure_raw: QuantityStyle,
    /// Sea level pressure curve
    pub pressure_sea_level: QuantityStyle,
    /// Relative humidity curve
    pub humidity_rel: QuantityStyle,
    /// Absolute humidity curve
    pub humidity_abs: QuantityStyle,
    /// Stroke of the summary minimum curve
    pub min: LineStyle,
    /// Stroke of the summary average curve
    pub avg: LineStyle,
    /// Stroke of the summary maximum curve
    pub max: LineStyle,
}

impl StylesConfig {
    /// Style of a quantity's curve
    pub fn for_quantity(&self, quantity: Quantity) -> &QuantityStyle {
        match quantity {
            Quantity::Temperature => &self.temperature,
            Quantity::PressureRaw => &self.pressure_raw,
            Quantity::PressureSeaLevel => &self.pressure_sea_level,
            Quantity::HumidityRel => &self.humidity_rel,
            Quantity::HumidityAbs => &self.humidity_abs,
        }
    }
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            temperature: QuantityStyle::solid("#b8860b"),
            pressure_raw: QuantityStyle::solid("#2f4f4f"),
            pressure_sea_level: QuantityStyle::solid("#b22222"),
            humidity_rel: QuantityStyle::solid("#0000cd"),
            humidity_abs: QuantityStyle::solid("#00008b"),
            min: LineStyle::DenselyDashDotted,
            avg: LineStyle::Solid,
            max: LineStyle::DenselyDotted,
        }
    }
}

/// Raw-data charts drawn over one horizon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSet {
    /// File name prefix, e.g. `24h`
    pub prefix: String,
    /// Horizon of the charts
    pub span: SpanKind,
    /// One chart per quantity
    pub quantities: Vec<Quantity>,
}

/// Min/avg/max chart drawn from the summary log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageChart {
    /// File name prefix, e.g. `31d_AVG`
    pub prefix: String,
    /// Horizon of the chart
    pub span: SpanKind,
}

/// Which charts are drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Drawn from the continuous log after every sample
    pub continuous: Vec<ChartSet>,
    /// Quantities drawn from yesterday's daily log for the mail
    pub daily: Vec<Quantity>,
    /// Quantity condensed into the summary log
    pub summary_quantity: Quantity,
    /// Drawn from the summary log once a day
    pub averages: Vec<AverageChart>,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        let common = vec![
            Quantity::Temperature,
            Quantity::PressureSeaLevel,
            Quantity::HumidityRel,
        ];
        let chart_set = |prefix: &str, span, quantities: &[Quantity]| ChartSet {
            prefix: prefix.to_string(),
            span,
            quantities: quantities.to_vec(),
        };
        Self {
            continuous: vec![
                chart_set("24h", SpanKind::Day, &common),
                chart_set("7d", SpanKind::Week, &common),
                chart_set("31d", SpanKind::Month, &[Quantity::PressureSeaLevel]),
                chart_set("365d", SpanKind::Year, &[Quantity::PressureSeaLevel]),
            ],
            daily: common.clone(),
            summary_quantity: Quantity::Temperature,
            averages: vec![
                AverageChart {
                    prefix: "31d_AVG".to_string(),
                    span: SpanKind::Month,
                },
                AverageChart {
                    prefix: "365d_AVG".to_string(),
                    span: SpanKind::Year,
                },
            ],
        }
    }
}

/// Daily mail settings; mail is off while `recipients` is empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// `From` address
    pub sender: String,
    /// Addresses the daily mail goes to
    pub recipients: Vec<String>,
    /// Followed by the date of the mailed day
    pub subject_prefix: String,
    /// HTML body of the mail
    pub body: String,
    /// Send to the recipients as blind copies
    pub bcc: bool,
    /// `sendmail`-compatible program reading the message from stdin
    pub sendmail: PathBuf,
}

impl MailConfig {
    /// Whether there is anyone to mail
    pub fn is_enabled(&self) -> bool {
        !self.recipients.is_empty()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: String::new(),
            recipients: Vec::new(),
            subject_prefix: "Weather from ".to_string(),
            body: String::new(),
            bcc: true,
            sendmail: PathBuf::from("/usr/sbin/sendmail"),
        }
    }
}
