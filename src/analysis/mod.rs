//! Sample reduction stages
//!
//! This module contains the steps between parsed records and output:
//! - Collecting parser output into a sample set
//! - Ordering samples by depth
//! - Reporting samples and estimating the scaling exponent

pub mod collector;
pub mod ordering;
pub mod scaling;

// Re-export analysis functions for convenience
pub use collector::{collect_samples, CollectError, DuplicatePolicy};
pub use ordering::order_by_depth;
pub use scaling::{estimate_power_law, format_fit_line, write_sample_listing, PowerLawFit};
