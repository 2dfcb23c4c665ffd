//! Common infrastructure modules shared across analysis phases
//!
//! This module provides reusable infrastructure for:
//! - Sample data structures
//! - ASCII table formatting of samples
//! - Building and rendering the scaling charts

pub mod data_structures;
pub mod plots;
pub mod table;

// Re-export commonly used items
pub use data_structures::{Sample, SampleSet, ScanStats};
pub use plots::PlotError;
