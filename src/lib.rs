//! # depth-gas-scaling
//! Extracts (orderbook depth, gas) samples from the depth benchmark's mixed-format log,
//! reports them, estimates the scaling exponent `k` in `gas ≈ C · N^k`, and renders
//! linear and log-log charts.
//!
//! The entry point is [`pipeline::run_analysis`].

pub mod config;
pub mod parsing;
pub mod pipeline;

pub mod analysis;
pub mod common;

pub use common::{Sample, SampleSet};
pub use config::AnalyzerConfig;
pub use pipeline::{run_analysis, AnalysisSummary, PipelineError};
