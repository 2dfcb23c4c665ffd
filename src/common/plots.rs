//! Plotting infrastructure for depth/gas scaling charts
//!
//! Chart construction is split in two:
//! - [`linear_chart_spec`] and [`log_log_chart_spec`] turn a [`SampleSet`] into a
//!   [`ChartSpec`], a plain description of what to draw and where to save it
//! - A [`ChartRenderer`] draws a [`ChartSpec`]; [`BitmapRenderer`] does so with the
//!   [`plotters`] crate and saves PNG files
//!
//! Specs are cheap to build and validate, so both charts can be checked before either
//! file is written.

use crate::common::data_structures::SampleSet;
use crate::config::AnalyzerConfig;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(
        "None of the {excluded} samples can be drawn on a log scale (depth and gas must both be positive)"
    )]
    NonPositiveValueForLogScale { excluded: usize },
}

type Result<T> = core::result::Result<T, PlotError>;

/// Chart title of the linear-scale figure
pub const LINEAR_TITLE: &str = "Scalability of ChainBook order matching";
/// X-axis label of the linear-scale figure
pub const LINEAR_X_LABEL: &str = "Orderbook Depth N (Pending Orders)";
/// Y-axis label of the linear-scale figure
pub const LINEAR_Y_LABEL: &str = "Gas used for placeLimit BUY (market-like)";

/// Chart title of the log-log figure
pub const LOG_LOG_TITLE: &str = "Scalability of ChainBook (log-log plot)";
/// X-axis label of the log-log figure
pub const LOG_LOG_X_LABEL: &str = "Orderbook depth N (log scale)";
/// Y-axis label of the log-log figure
pub const LOG_LOG_Y_LABEL: &str = "Gas used (log scale)";

/// Scale applied to both axes of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

/// Which gridlines are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLines {
    Major,
    MajorAndMinor,
}

/// Everything needed to draw and save one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub scale: AxisScale,
    pub grid: GridLines,
    /// Points in draw order; consecutive points are joined by a line
    pub points: Vec<(f64, f64)>,
    pub output_path: PathBuf,
    /// Canvas size in pixels
    pub canvas: (u32, u32),
    /// Resolution the canvas was derived from; scales fonts and markers
    pub dpi: u32,
}

/// A log-log chart together with the number of samples left out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLogChart {
    pub spec: ChartSpec,
    /// Samples with a zero depth or zero gas
    pub excluded: usize,
}

/// Draw-and-save contract for chart backends.
pub trait ChartRenderer {
    /// Draws `spec` and saves it to [`ChartSpec::output_path`], replacing any existing file.
    fn render(&mut self, spec: &ChartSpec) -> Result<()>;
}

/// Builds the linear-scale chart: every sample, in order.
pub fn linear_chart_spec(samples: &SampleSet, config: &AnalyzerConfig) -> ChartSpec {
    let points = samples
        .iter()
        .map(|sample| (sample.depth() as f64, sample.cost() as f64))
        .collect();

    ChartSpec {
        title: LINEAR_TITLE.to_string(),
        x_label: LINEAR_X_LABEL.to_string(),
        y_label: LINEAR_Y_LABEL.to_string(),
        scale: AxisScale::Linear,
        grid: GridLines::Major,
        points,
        output_path: config.linear_output.clone(),
        canvas: config.canvas_size(),
        dpi: config.dpi,
    }
}

/// Builds the log-log chart.
///
/// Samples with a zero depth or zero gas have no position on a logarithmic axis and
/// are left out of this chart only; the linear chart still shows them.
///
/// # Returns
/// * `Ok(LogLogChart)` - The chart and the number of samples left out
/// * `Err(PlotError::NonPositiveValueForLogScale)` - If no sample could be kept
pub fn log_log_chart_spec(samples: &SampleSet, config: &AnalyzerConfig) -> Result<LogLogChart> {
    let points: Vec<(f64, f64)> = samples
        .iter()
        .filter(|sample| sample.is_log_plottable())
        .map(|sample| (sample.depth() as f64, sample.cost() as f64))
        .collect();

    let excluded = samples.as_slice().len() - points.len();
    if points.is_empty() {
        return Err(PlotError::NonPositiveValueForLogScale { excluded });
    }

    Ok(LogLogChart {
        spec: ChartSpec {
            title: LOG_LOG_TITLE.to_string(),
            x_label: LOG_LOG_X_LABEL.to_string(),
            y_label: LOG_LOG_Y_LABEL.to_string(),
            scale: AxisScale::Log,
            grid: GridLines::MajorAndMinor,
            points,
            output_path: config.loglog_output.clone(),
            canvas: config.canvas_size(),
            dpi: config.dpi,
        },
        excluded,
    })
}

/// Computes a padded linear axis range covering `values`.
///
/// Pads 5% of the span on either side; a zero span is widened around the value.
fn linear_axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = min_max(values);
    let span = max - min;
    let padding = if span > 0.0 {
        span * 0.05
    } else {
        (min.abs() * 0.05).max(1.0)
    };
    (min - padding)..(max + padding)
}

/// Computes a padded logarithmic axis range covering strictly positive `values`.
///
/// Pads 5% of the span in decades on either side; a single value gets half a decade
/// on either side.
fn log_axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = min_max(values);
    let decades = (max / min).log10();
    let padding = if decades > 0.0 { decades * 0.05 } else { 0.5 };
    let factor = 10f64.powf(padding);
    (min / factor)..(max * factor)
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
        (min.min(value), max.max(value))
    })
}

/// Converts a size in typographic points to pixels at the given resolution.
fn points_to_pixels(points: f64, dpi: u32) -> u32 {
    ((points * dpi as f64) / 72.0).round().max(1.0) as u32
}

/// Tick labels requested on each axis.
const MAX_TICK_LABELS: usize = 10;

/// Decimal places needed to tell apart ticks spread over `range`.
///
/// Ticks are never closer than `span / max_labels`, so that step's leading digit
/// sets the precision. Wide axes get whole numbers.
fn tick_decimals(range: &Range<f64>, max_labels: usize) -> usize {
    let step = (range.end - range.start) / max_labels.max(1) as f64;
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    (-step.log10()).ceil().clamp(0.0, 6.0) as usize
}

/// Formats a tick value with at most `decimals` places, dropping trailing zeros.
fn format_tick(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };

    match text {
        "-0" => "0".to_string(),
        _ => text.to_string(),
    }
}

/// Renders charts as PNG files using the [`plotters`] bitmap backend.
///
/// # Headless Compatibility
/// Text is drawn through the backend's `ttf` support, which needs a system
/// sans-serif font to be available.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapRenderer;

impl BitmapRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for BitmapRenderer {
    fn render(&mut self, spec: &ChartSpec) -> Result<()> {
        if spec.points.is_empty() {
            return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
        }
        if spec.points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(PlotError::InvalidData(
                "Chart points must be finite".to_string(),
            ));
        }
        if spec.scale == AxisScale::Log && spec.points.iter().any(|(x, y)| *x <= 0.0 || *y <= 0.0) {
            return Err(PlotError::InvalidData(
                "Log-scale charts need strictly positive points".to_string(),
            ));
        }

        ensure_parent_dir(&spec.output_path)?;
        debug!(
            "Rendering '{}' ({}x{}) to {}",
            spec.title,
            spec.canvas.0,
            spec.canvas.1,
            spec.output_path.display()
        );

        let root = BitMapBackend::new(&spec.output_path, spec.canvas).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

        match spec.scale {
            AxisScale::Linear => draw_linear_chart(&root, spec)?,
            AxisScale::Log => draw_log_log_chart(&root, spec)?,
        }

        // Ensure everything is properly rendered and saved
        root.present()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Pixel sizes derived from the chart resolution
struct ChartMetrics {
    caption: u32,
    label: u32,
    tick: u32,
    margin: u32,
    x_label_area: u32,
    y_label_area: u32,
    marker: u32,
    stroke: u32,
}

impl ChartMetrics {
    fn for_dpi(dpi: u32) -> Self {
        Self {
            caption: points_to_pixels(12.0, dpi),
            label: points_to_pixels(10.0, dpi),
            tick: points_to_pixels(9.0, dpi),
            margin: points_to_pixels(8.0, dpi),
            x_label_area: points_to_pixels(30.0, dpi),
            y_label_area: points_to_pixels(58.0, dpi),
            marker: points_to_pixels(3.0, dpi),
            stroke: points_to_pixels(1.5, dpi),
        }
    }
}

fn draw_linear_chart(root: &DrawingArea<BitMapBackend<'_>, Shift>, spec: &ChartSpec) -> Result<()> {
    let metrics = ChartMetrics::for_dpi(spec.dpi);
    let x_range = linear_axis_range(spec.points.iter().map(|(x, _)| *x));
    let y_range = linear_axis_range(spec.points.iter().map(|(_, y)| *y));
    let x_decimals = tick_decimals(&x_range, MAX_TICK_LABELS);
    let y_decimals = tick_decimals(&y_range, MAX_TICK_LABELS);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", metrics.caption))
        .margin(metrics.margin)
        .x_label_area_size(metrics.x_label_area)
        .y_label_area_size(metrics.y_label_area)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .axis_desc_style(("sans-serif", metrics.label))
        .label_style(("sans-serif", metrics.tick))
        .x_labels(MAX_TICK_LABELS)
        .y_labels(MAX_TICK_LABELS)
        .x_label_formatter(&|x: &f64| format_tick(*x, x_decimals))
        .y_label_formatter(&|y: &f64| format_tick(*y, y_decimals))
        .bold_line_style(BLACK.mix(0.2))
        .light_line_style(minor_grid_style(spec.grid))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    draw_connected_markers(&mut chart, &spec.points, &metrics)
}

fn draw_log_log_chart(root: &DrawingArea<BitMapBackend<'_>, Shift>, spec: &ChartSpec) -> Result<()> {
    let metrics = ChartMetrics::for_dpi(spec.dpi);
    let x_range = log_axis_range(spec.points.iter().map(|(x, _)| *x));
    let y_range = log_axis_range(spec.points.iter().map(|(_, y)| *y));
    // Log ticks bunch up towards the low end of each decade.
    let x_decimals = tick_decimals(&x_range, MAX_TICK_LABELS * 10);
    let y_decimals = tick_decimals(&y_range, MAX_TICK_LABELS * 10);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", metrics.caption))
        .margin(metrics.margin)
        .x_label_area_size(metrics.x_label_area)
        .y_label_area_size(metrics.y_label_area)
        .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .axis_desc_style(("sans-serif", metrics.label))
        .label_style(("sans-serif", metrics.tick))
        .x_labels(MAX_TICK_LABELS)
        .y_labels(MAX_TICK_LABELS)
        .x_label_formatter(&|x: &f64| format_tick(*x, x_decimals))
        .y_label_formatter(&|y: &f64| format_tick(*y, y_decimals))
        .bold_line_style(BLACK.mix(0.2))
        .light_line_style(minor_grid_style(spec.grid))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    draw_connected_markers(&mut chart, &spec.points, &metrics)
}

fn minor_grid_style(grid: GridLines) -> RGBAColor {
    match grid {
        GridLines::Major => TRANSPARENT,
        GridLines::MajorAndMinor => BLACK.mix(0.08),
    }
}

/// Joins the points with a line and marks each one with a filled circle.
fn draw_connected_markers<X, Y>(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<X, Y>>,
    points: &[(f64, f64)],
    metrics: &ChartMetrics,
) -> Result<()>
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            BLUE.stroke_width(metrics.stroke),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, metrics.marker, BLUE.filled())),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}
