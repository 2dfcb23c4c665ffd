//! Scaling-law reporting
//!
//! This module produces the textual side of the analysis:
//! - The `N=<depth>, gas=<cost>` listing of every ordered sample
//! - A power-law fit `gas ≈ C · N^k` estimated by least squares in log-log space

use crate::common::data_structures::{Sample, SampleSet};
use std::io::Write;

/// Formats a single sample as `N=<depth>, gas=<cost>`.
pub fn format_sample_line(sample: &Sample) -> String {
    format!("N={}, gas={}", sample.depth(), sample.cost())
}

/// Formats every sample, in sequence order.
pub fn sample_lines(samples: &SampleSet) -> Vec<String> {
    samples.iter().map(format_sample_line).collect()
}

/// Writes the `Data:` header followed by one line per sample.
pub fn write_sample_listing<W: Write>(samples: &SampleSet, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Data:")?;
    for line in sample_lines(samples) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Result of fitting `gas ≈ C · N^k` to the samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawFit {
    /// Estimated exponent `k` (slope in log-log space)
    pub exponent: f64,
    /// Estimated constant `C` (`e^intercept`)
    pub constant: f64,
    /// Coefficient of determination of the log-log fit
    pub r_squared: f64,
    /// Number of samples that took part in the fit
    pub points_used: usize,
}

/// Estimates the power-law exponent by ordinary least squares on `(ln N, ln gas)`.
///
/// Samples with a zero depth or zero gas are excluded, since their logarithm is
/// undefined.
///
/// # Returns
/// * `Some(PowerLawFit)` - At least two qualifying samples with distinct depths
/// * `None` - Too few points (or a single depth) to define a slope
pub fn estimate_power_law(samples: &SampleSet) -> Option<PowerLawFit> {
    let qualifying: Vec<&Sample> = samples
        .iter()
        .filter(|sample| sample.is_log_plottable())
        .collect();

    let first_depth = qualifying.first()?.depth();
    if qualifying.len() < 2 || qualifying.iter().all(|s| s.depth() == first_depth) {
        return None;
    }

    let points: Vec<(f64, f64)> = qualifying
        .iter()
        .map(|s| ((s.depth() as f64).ln(), (s.cost() as f64).ln()))
        .collect();

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    // Constant gas (up to rounding) is a perfect horizontal fit.
    let r_squared = if syy < f64::EPSILON {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    Some(PowerLawFit {
        exponent: slope,
        constant: intercept.exp(),
        r_squared,
        points_used: points.len(),
    })
}

/// Formats the fit (or its absence) as a single console line.
pub fn format_fit_line(fit: Option<&PowerLawFit>) -> String {
    match fit {
        Some(fit) => format!(
            "Estimated exponent k = {:.4}, C = {:.4e} (R² = {:.4}, n = {})",
            fit.exponent, fit.constant, fit.r_squared, fit.points_used
        ),
        None => "Estimated exponent k unavailable (need at least two positive samples with distinct depths)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(samples: &[(u64, u64)]) -> SampleSet {
        SampleSet::new(
            samples
                .iter()
                .map(|&(depth, cost)| Sample::new(depth, cost))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn formats_sample_line() {
        assert_eq!(format_sample_line(&Sample::new(50, 123456)), "N=50, gas=123456");
    }

    #[test]
    fn writes_listing_in_sequence_order() {
        let mut out = Vec::new();
        write_sample_listing(&set(&[(5, 15000), (10, 21000)]), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Data:\nN=5, gas=15000\nN=10, gas=21000\n"
        );
    }

    #[test]
    fn recovers_exponent_of_exact_power_law() {
        let samples: Vec<(u64, u64)> = [10u64, 100, 1000]
            .iter()
            .map(|&depth| (depth, (1000.0 * (depth as f64).powf(1.5)).round() as u64))
            .collect();

        let fit = estimate_power_law(&set(&samples)).unwrap();
        assert!((fit.exponent - 1.5).abs() < 0.01, "exponent {}", fit.exponent);
        assert!((fit.constant / 1000.0 - 1.0).abs() < 0.01, "constant {}", fit.constant);
        assert!(fit.r_squared > 0.9999);
        assert_eq!(fit.points_used, 3);
    }

    #[test]
    fn linear_growth_has_unit_exponent() {
        let fit = estimate_power_law(&set(&[(1, 7), (2, 14), (4, 28), (8, 56)])).unwrap();
        assert!((fit.exponent - 1.0).abs() < 1e-9);
        assert!((fit.constant - 7.0).abs() < 1e-9);
    }

    #[test]
    fn constant_cost_has_zero_exponent() {
        let fit = estimate_power_law(&set(&[(10, 500), (100, 500), (1000, 500)])).unwrap();
        assert!(fit.exponent.abs() < 1e-12);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn excludes_non_positive_samples() {
        let fit = estimate_power_law(&set(&[(0, 5), (10, 0), (1, 3), (3, 9)])).unwrap();
        assert_eq!(fit.points_used, 2);
        assert!((fit.exponent - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unavailable_with_fewer_than_two_points() {
        assert!(estimate_power_law(&set(&[(10, 100)])).is_none());
        assert!(estimate_power_law(&set(&[(0, 100), (10, 0), (20, 5)])).is_none());
        assert!(estimate_power_law(&set(&[(0, 0)])).is_none());
    }

    #[test]
    fn unavailable_with_single_distinct_depth() {
        assert!(estimate_power_law(&set(&[(10, 100), (10, 200)])).is_none());
    }

    #[test]
    fn formats_fit_line() {
        let fit = PowerLawFit {
            exponent: 1.5,
            constant: 1000.0,
            r_squared: 1.0,
            points_used: 3,
        };
        assert_eq!(
            format_fit_line(Some(&fit)),
            "Estimated exponent k = 1.5000, C = 1.0000e3 (R² = 1.0000, n = 3)"
        );
        assert!(format_fit_line(None).contains("unavailable"));
    }
}
