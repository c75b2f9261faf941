//! Chart rendering interface
//!
//! The core decides what goes on a chart (window, series, tick plan, labels);
//! drawing it into an image file is left to a [`Renderer`].

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::axis::TickPlan;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Scalable vector graphics
    #[default]
    Svg,
    /// Portable network graphics
    Png,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "svg" => Some(ImageFormat::Svg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

/// Stroke pattern of a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    /// Continuous line
    #[default]
    Solid,
    /// Short dashes and dots
    DenselyDashDotted,
    /// Closely spaced dots
    DenselyDotted,
}

/// One curve of a chart
#[derive(Debug, Clone)]
pub struct ChartSeries<'a> {
    /// Legend entry
    pub name: &'a str,
    /// Values parallel to [`Chart::timestamps`]
    pub values: &'a [f64],
    /// Stroke pattern
    pub line_style: LineStyle,
}

/// Everything a renderer needs to draw one chart
#[derive(Debug, Clone)]
pub struct Chart<'a> {
    /// Sample times shared by all series
    pub timestamps: &'a [i64],
    /// Curves to draw
    pub series: Vec<ChartSeries<'a>>,
    /// Time axis ticks and labels
    pub ticks: &'a TickPlan,
    /// Caption of the time axis
    pub x_label: &'a str,
    /// Caption of the value axis
    pub y_label: String,
    /// Curve colour as `#rrggbb`
    pub color: &'a str,
    /// Output file format
    pub format: ImageFormat,
}

/// Errors reported by renderers
#[derive(Error, Debug)]
pub enum RenderError {
    /// The chart has no samples to draw
    #[error("Chart for {} has no data", .0.display())]
    NoData(PathBuf),

    /// The drawing backend failed
    #[error("Rendering {} failed: {message}", .path.display())]
    Backend {
        /// Image being drawn
        path: PathBuf,
        /// Backend's description of the failure
        message: String,
    },

    /// The image file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Draws charts into image files
pub trait Renderer {
    /// Draw `chart` into the image file at `path`, replacing it
    fn render(&self, chart: &Chart<'_>, path: &Path) -> Result<(), RenderError>;
}

/// File name of a chart, e.g. `24h_Sea_Level_Pressure.svg`
pub fn chart_file_name(prefix: &str, label: &str, format: ImageFormat) -> String {
    format!("{}_{}.{}", prefix, label.replace(' ', "_"), format.extension())
}
