//! End-to-end analysis run
//!
//! Threads one [`AnalyzerConfig`] through every stage:
//! log lines → samples → ordered samples → {console report, two charts}.

use crate::analysis::{
    collect_samples, estimate_power_law, format_fit_line, order_by_depth, write_sample_listing,
    PowerLawFit,
};
use crate::common::plots::{linear_chart_spec, log_log_chart_spec, ChartRenderer};
use crate::common::table::format_sample_table;
use crate::common::{PlotError, SampleSet, ScanStats};
use crate::config::{AnalyzerConfig, ConfigError};
use crate::parsing::{open_log, ParsingError, SampleScanner};
use log::{debug, info, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can end an analysis run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Parsing error: {0}")]
    Parsing(#[from] ParsingError),

    #[error(
        "No valid JSON lines with '{depth_field}' and '{cost_field}' found in {}",
        .input.display()
    )]
    EmptyDataset {
        input: PathBuf,
        depth_field: String,
        cost_field: String,
    },

    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),

    #[error("Failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

type Result<T> = core::result::Result<T, PipelineError>;

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    /// Samples ordered by depth, as listed and plotted
    pub samples: SampleSet,
    /// Line tallies from the scan
    pub stats: ScanStats,
    /// Power-law estimate, if enough positive samples were available
    pub fit: Option<PowerLawFit>,
    /// Samples left out of the log-log chart
    pub log_log_excluded: usize,
}

/// Runs the full analysis on the log file named in `config`.
///
/// # Arguments
/// * `config` - Paths, field names and rendering settings
/// * `renderer` - Backend that draws and saves the two charts
/// * `out` - Destination of the console report
///
/// # Returns
/// * `Ok(AnalysisSummary)` - Both charts were rendered
/// * `Err(PipelineError)` - Nothing usable was found, or a stage failed.
///   No chart is rendered when the log holds no samples.
pub fn run_analysis<R, W>(
    config: &AnalyzerConfig,
    renderer: &mut R,
    out: &mut W,
) -> Result<AnalysisSummary>
where
    R: ChartRenderer + ?Sized,
    W: Write,
{
    config.validate()?;
    info!("Reading samples from {}", config.input_path.display());
    let scanner = open_log(&config.input_path, &config.fields)?;
    analyze_scanner(scanner, config, renderer, out)
}

/// Same as [`run_analysis`], but reads log lines from `reader` instead of
/// [`AnalyzerConfig::input_path`]. The input path is still used in messages.
pub fn analyze_reader<B, R, W>(
    reader: B,
    config: &AnalyzerConfig,
    renderer: &mut R,
    out: &mut W,
) -> Result<AnalysisSummary>
where
    B: BufRead,
    R: ChartRenderer + ?Sized,
    W: Write,
{
    config.validate()?;
    analyze_scanner(SampleScanner::new(reader, &config.fields), config, renderer, out)
}

fn analyze_scanner<B, R, W>(
    mut scanner: SampleScanner<'_, B>,
    config: &AnalyzerConfig,
    renderer: &mut R,
    out: &mut W,
) -> Result<AnalysisSummary>
where
    B: BufRead,
    R: ChartRenderer + ?Sized,
    W: Write,
{
    let collected = collect_samples(scanner.by_ref(), config.duplicates);

    // Read errors take precedence over an empty result.
    let stats = scanner.finish()?;
    info!(
        "Scanned {} lines: {} samples, {} malformed, {} incomplete",
        stats.lines_read, stats.accepted, stats.malformed, stats.incomplete
    );

    let collected = collected.map_err(|_| PipelineError::EmptyDataset {
        input: config.input_path.clone(),
        depth_field: config.fields.depth.clone(),
        cost_field: config.fields.cost.clone(),
    })?;

    let samples = order_by_depth(&collected);
    debug!("Ordered {} samples by depth", samples.as_slice().len());

    // Build both charts before anything is written.
    let linear = linear_chart_spec(&samples, config);
    let log_log = log_log_chart_spec(&samples, config)?;
    if log_log.excluded > 0 {
        warn!(
            "{} samples with zero depth or gas left out of the log-log chart",
            log_log.excluded
        );
    }

    let fit = estimate_power_law(&samples);

    write_sample_listing(&samples, out)?;
    if config.print_table {
        writeln!(out, "{}", format_sample_table(&samples, Some("Samples")))?;
    }
    writeln!(out, "{}", format_fit_line(fit.as_ref()))?;

    renderer.render(&linear)?;
    renderer.render(&log_log.spec)?;

    writeln!(
        out,
        "Saved figures: {}, {}",
        linear.output_path.display(),
        log_log.spec.output_path.display()
    )?;
    out.flush()?;

    Ok(AnalysisSummary {
        samples,
        stats,
        fit,
        log_log_excluded: log_log.excluded,
    })
}
