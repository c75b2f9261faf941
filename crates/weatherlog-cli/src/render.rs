//! Chart rendering with plotters
//!
//! The time axis is drawn by hand from the [`TickPlan`]: plotters' own key
//! points know nothing about local midnight or Monday, so the mesh only
//! supplies the value axis.

use std::path::Path;

use plotters::coord::types::{RangedCoordf64, RangedCoordi64};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;
use weatherlog_core::axis::TickPlan;
use weatherlog_core::render::{Chart, ImageFormat, LineStyle, RenderError, Renderer};

const MAJOR_TICK_PX: i32 = 6;
const MINOR_TICK_PX: i32 = 3;
const LABEL_LINE_PX: i32 = 16;
const FONT: &str = "sans-serif";

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Draws charts as SVG or PNG files
#[derive(Debug, Clone, Copy)]
pub struct PlotRenderer {
    width: u32,
    height: u32,
}

impl Default for PlotRenderer {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 450,
        }
    }
}

impl PlotRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Renderer for PlotRenderer {
    fn render(&self, chart: &Chart<'_>, path: &Path) -> Result<(), RenderError> {
        let Some(y_range) = value_range(chart) else {
            return Err(RenderError::NoData(path.to_path_buf()));
        };
        let size = (self.width, self.height);

        let result = match chart.format {
            ImageFormat::Svg => {
                draw(SVGBackend::new(path, size).into_drawing_area(), chart, y_range)
                    .map_err(|e| e.to_string())
            }
            ImageFormat::Png => {
                draw(BitMapBackend::new(path, size).into_drawing_area(), chart, y_range)
                    .map_err(|e| e.to_string())
            }
        };
        result.map_err(|message| RenderError::Backend {
            path: path.to_path_buf(),
            message,
        })?;

        debug!("Rendered {}", path.display());
        Ok(())
    }
}

/// Padded range of all finite values, `None` if there are none
fn value_range(chart: &Chart<'_>) -> Option<(f64, f64)> {
    if chart.timestamps.is_empty() {
        return None;
    }
    let (lo, hi) = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return None;
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    Some((lo - pad, hi + pad))
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    chart: &Chart<'_>,
    (lo, hi): (f64, f64),
) -> DrawResult<DB> {
    let color = parse_hex_color(chart.color).unwrap_or(BLACK);
    let first = chart.timestamps[0];
    let last = chart.timestamps[chart.timestamps.len() - 1].max(first + 1);

    root.fill(&WHITE)?;
    let mut cc = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(first..last, lo..hi)?;

    cc.configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_desc(chart.y_label.as_str())
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()?;

    let grid = RGBColor(190, 190, 190);
    cc.draw_series(chart.ticks.ticks().iter().map(|tick| {
        PathElement::new(
            vec![(tick.timestamp, lo), (tick.timestamp, hi)],
            grid.stroke_width(1),
        )
    }))?;

    for series in &chart.series {
        let points: Vec<(i64, f64)> = chart
            .timestamps
            .iter()
            .copied()
            .zip(series.values.iter().copied())
            .filter(|(_, v)| v.is_finite())
            .collect();

        let anno = match series.line_style {
            LineStyle::Solid => {
                cc.draw_series(LineSeries::new(points, color.stroke_width(2)))?
            }
            LineStyle::DenselyDotted => cc.draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, 1, color.filled())),
            )?,
            LineStyle::DenselyDashDotted => {
                cc.draw_series(LineSeries::new(points.clone(), color.mix(0.5).stroke_width(1)))?;
                cc.draw_series(
                    points
                        .into_iter()
                        .map(|p| Circle::new(p, 2, color.filled())),
                )?
            }
        };
        anno.label(series.name).legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
        });
    }

    if chart.series.len() > 1 {
        cc.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    // time axis
    let axis_start = cc.backend_coord(&(first, lo));
    let axis_end = cc.backend_coord(&(last, lo));
    let axis_y = axis_start.1;
    root.draw(&PathElement::new(vec![axis_start, axis_end], BLACK))?;

    for &position in chart.ticks.minor_ticks() {
        let (x, _) = cc.backend_coord(&(position, lo));
        root.draw(&PathElement::new(
            vec![(x, axis_y), (x, axis_y + MINOR_TICK_PX)],
            BLACK,
        ))?;
    }
    for tick in chart.ticks.ticks() {
        let (x, _) = cc.backend_coord(&(tick.timestamp, lo));
        root.draw(&PathElement::new(
            vec![(x, axis_y), (x, axis_y + MAJOR_TICK_PX)],
            BLACK,
        ))?;
    }

    let label_style =
        TextStyle::from((FONT, 14.0).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    let label_lines = draw_tick_labels(&root, &cc, chart.ticks, lo, axis_y, &label_style)?;

    if !chart.x_label.is_empty() {
        let center = (axis_start.0 + axis_end.0) / 2;
        let y = axis_y + MAJOR_TICK_PX + 4 + label_lines * LABEL_LINE_PX + 4;
        root.draw(&Text::new(chart.x_label, (center, y), label_style))?;
    }

    root.present()?;
    Ok(())
}

/// Draw labels below their ticks, one text element per line; returns the
/// largest number of lines of a label
fn draw_tick_labels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    cc: &ChartContext<'_, DB, Cartesian2d<RangedCoordi64, RangedCoordf64>>,
    plan: &TickPlan,
    lo: f64,
    axis_y: i32,
    style: &TextStyle<'_>,
) -> Result<i32, DrawingAreaErrorKind<DB::ErrorType>> {
    let mut max_lines = 0;
    for (timestamp, label) in plan.labelled() {
        let (x, _) = cc.backend_coord(&(timestamp, lo));
        let mut y = axis_y + MAJOR_TICK_PX + 4;
        let mut lines = 0;
        for line in label.lines() {
            root.draw(&Text::new(line, (x, y), style.clone()))?;
            y += LABEL_LINE_PX;
            lines += 1;
        }
        max_lines = max_lines.max(lines);
    }
    Ok(max_lines)
}

/// `#rrggbb` to a colour
pub fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
