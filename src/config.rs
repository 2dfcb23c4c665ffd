//! Analyzer configuration
//!
//! Every setting the pipeline needs is carried in [`AnalyzerConfig`]; nothing is read
//! from ambient state. The defaults reproduce the layout written by the depth benchmark
//! (`logs/depth_gas.log` in, two PNG figures next to it out).

use crate::analysis::collector::DuplicatePolicy;
use std::path::PathBuf;
use thiserror::Error;

/// Log file written by the depth benchmark
pub const DEFAULT_INPUT_PATH: &str = "logs/depth_gas.log";

/// Linear-scale figure
pub const DEFAULT_LINEAR_OUTPUT: &str = "logs/scalability_depth.png";

/// Log-log figure
pub const DEFAULT_LOGLOG_OUTPUT: &str = "logs/scalability_depth_loglog.png";

/// JSON key holding the orderbook depth
pub const DEFAULT_DEPTH_FIELD: &str = "depth";

/// JSON key holding the gas used by the market-like limit buy
pub const DEFAULT_COST_FIELD: &str = "gas_placeLimitBuy_market_like";

/// Output resolution in dots per inch
pub const DEFAULT_DPI: u32 = 300;

/// Figure size in inches (width, height)
pub const DEFAULT_FIGURE_SIZE_INCHES: (f64, f64) = (6.4, 4.8);

/// Highest accepted resolution
pub const MAX_DPI: u32 = 1200;

/// Errors raised when a configuration cannot drive the pipeline
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("DPI must be between 1 and 1200, got {0}")]
    InvalidDpi(u32),

    #[error("Figure size must be positive, got {0}x{1} inches")]
    InvalidFigureSize(f64, f64),

    #[error("The {0} field name cannot be empty")]
    EmptyFieldName(&'static str),

    #[error("Linear and log-log charts must be written to different files: {}", .0.display())]
    SameOutputPath(PathBuf),
}

/// Names of the JSON keys a record must carry to become a sample.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub depth: String,
    pub cost: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH_FIELD.to_string(),
            cost: DEFAULT_COST_FIELD.to_string(),
        }
    }
}

/// Complete configuration for one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Benchmark log to scan
    pub input_path: PathBuf,
    /// Destination of the linear-scale chart
    pub linear_output: PathBuf,
    /// Destination of the log-log chart
    pub loglog_output: PathBuf,
    /// Keys identifying depth and gas in each record
    pub fields: FieldNames,
    /// Output resolution
    pub dpi: u32,
    /// Figure size in inches, multiplied by [`Self::dpi`] to get pixels
    pub figure_size_inches: (f64, f64),
    /// What to do with samples sharing a depth
    pub duplicates: DuplicatePolicy,
    /// Print an ASCII table of the samples in addition to the plain listing
    pub print_table: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            linear_output: PathBuf::from(DEFAULT_LINEAR_OUTPUT),
            loglog_output: PathBuf::from(DEFAULT_LOGLOG_OUTPUT),
            fields: FieldNames::default(),
            dpi: DEFAULT_DPI,
            figure_size_inches: DEFAULT_FIGURE_SIZE_INCHES,
            duplicates: DuplicatePolicy::default(),
            print_table: false,
        }
    }
}

impl AnalyzerConfig {
    /// Pixel dimensions of each chart.
    pub fn canvas_size(&self) -> (u32, u32) {
        let (width, height) = self.figure_size_inches;
        let dpi = self.dpi as f64;
        ((width * dpi).round() as u32, (height * dpi).round() as u32)
    }

    /// Checks the settings before any file is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dpi == 0 || self.dpi > MAX_DPI {
            return Err(ConfigError::InvalidDpi(self.dpi));
        }

        let (width, height) = self.figure_size_inches;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfigError::InvalidFigureSize(width, height));
        }

        if self.fields.depth.is_empty() {
            return Err(ConfigError::EmptyFieldName("depth"));
        }
        if self.fields.cost.is_empty() {
            return Err(ConfigError::EmptyFieldName("cost"));
        }

        if self.linear_output == self.loglog_output {
            return Err(ConfigError::SameOutputPath(self.linear_output.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(AnalyzerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_canvas_matches_300_dpi_figure() {
        assert_eq!(AnalyzerConfig::default().canvas_size(), (1920, 1440));
    }

    #[test]
    fn rejects_out_of_range_dpi() {
        let config = AnalyzerConfig {
            dpi: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidDpi(0)));

        let config = AnalyzerConfig {
            dpi: MAX_DPI + 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidDpi(MAX_DPI + 1)));
    }

    #[test]
    fn rejects_shared_output_path() {
        let config = AnalyzerConfig {
            loglog_output: PathBuf::from(DEFAULT_LINEAR_OUTPUT),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SameOutputPath(_))
        ));
    }

    #[test]
    fn rejects_empty_field_names() {
        let mut config = AnalyzerConfig::default();
        config.fields.cost.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyFieldName("cost")));
    }
}
