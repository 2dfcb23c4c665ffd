//! ASCII table formatting for collected samples
//!
//! Provides a [`SampleRow`] view of each [`Sample`] and renders the whole set
//! with the [`tabled`] crate.

use crate::common::data_structures::{Sample, SampleSet};
use tabled::{Table, Tabled};

/// Represents a single sample as a table row
#[derive(Debug, Clone, Tabled)]
pub struct SampleRow {
    /// Orderbook depth
    #[tabled(rename = "Depth (N)")]
    pub depth: u64,
    /// Gas used at this depth
    #[tabled(rename = "Gas")]
    pub gas: u64,
    /// Gas per pending order, or `-` at depth zero
    #[tabled(rename = "Gas / N")]
    pub gas_per_order: String,
}

impl SampleRow {
    pub fn new(sample: &Sample) -> Self {
        let gas_per_order = if sample.depth() == 0 {
            "-".to_string()
        } else {
            format!("{:.2}", sample.cost() as f64 / sample.depth() as f64)
        };

        Self {
            depth: sample.depth(),
            gas: sample.cost(),
            gas_per_order,
        }
    }
}

/// Formats samples as an ASCII table using the [`tabled`] crate
///
/// # Arguments
/// * `samples` - The samples to format, in display order
/// * `title` - Optional title for the table
///
/// # Returns
/// A formatted ASCII table as a [`String`]
pub fn format_sample_table(samples: &SampleSet, title: Option<&str>) -> String {
    let rows: Vec<SampleRow> = samples.iter().map(SampleRow::new).collect();
    let table = Table::new(rows).to_string();

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.chars().count()), table)
    } else {
        table
    }
}
