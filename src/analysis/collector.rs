//! Sample collection
//!
//! Folds the parser's output into a [`SampleSet`], refusing to produce an empty one.

use crate::common::data_structures::{Sample, SampleSet};
use hashbrown::HashMap;
use thiserror::Error;

/// Errors that can occur while collecting samples
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CollectError {
    #[error("No valid samples were found")]
    EmptyDataset,
}

type Result<T> = core::result::Result<T, CollectError>;

/// How samples that share a depth are treated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Every sample is kept and plotted as its own point.
    #[default]
    Keep,
    /// Samples sharing a depth collapse into one, with the mean gas (rounded half up).
    /// The merged sample takes the position of the first occurrence.
    MergeMean,
}

/// Collects samples in stream order into a [`SampleSet`].
///
/// # Arguments
/// * `samples` - Parser output, in the order the lines appeared
/// * `policy` - Treatment of repeated depths
///
/// # Returns
/// * `Ok(SampleSet)` - At least one sample was produced
/// * `Err(CollectError::EmptyDataset)` - The stream held no usable records
pub fn collect_samples<I>(samples: I, policy: DuplicatePolicy) -> Result<SampleSet>
where
    I: IntoIterator<Item = Sample>,
{
    let collected: Vec<Sample> = match policy {
        DuplicatePolicy::Keep => samples.into_iter().collect(),
        DuplicatePolicy::MergeMean => merge_duplicate_depths(samples),
    };

    SampleSet::new(collected).ok_or(CollectError::EmptyDataset)
}

/// Running gas total for one depth
struct DepthAccumulator {
    depth: u64,
    total_cost: u128,
    count: u128,
}

fn merge_duplicate_depths<I>(samples: I) -> Vec<Sample>
where
    I: IntoIterator<Item = Sample>,
{
    let mut accumulators: Vec<DepthAccumulator> = Vec::new();
    let mut index_by_depth: HashMap<u64, usize> = HashMap::new();

    for sample in samples {
        let index = *index_by_depth.entry(sample.depth()).or_insert_with(|| {
            accumulators.push(DepthAccumulator {
                depth: sample.depth(),
                total_cost: 0,
                count: 0,
            });
            accumulators.len() - 1
        });

        let accumulator = &mut accumulators[index];
        accumulator.total_cost += sample.cost() as u128;
        accumulator.count += 1;
    }

    accumulators
        .into_iter()
        .map(|acc| {
            // The mean of u64 values always fits back into a u64.
            let mean = (acc.total_cost + acc.count / 2) / acc.count;
            Sample::new(acc.depth, mean as u64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stream_is_an_error() {
        let result = collect_samples(Vec::new(), DuplicatePolicy::Keep);
        assert_eq!(result, Err(CollectError::EmptyDataset));

        let result = collect_samples(Vec::new(), DuplicatePolicy::MergeMean);
        assert_eq!(result, Err(CollectError::EmptyDataset));
    }

    #[test]
    fn keep_preserves_every_sample_in_order() {
        let input = vec![
            Sample::new(10, 21000),
            Sample::new(5, 15000),
            Sample::new(10, 21500),
        ];
        let set = collect_samples(input.clone(), DuplicatePolicy::Keep).unwrap();
        assert_eq!(set.as_slice(), input.as_slice());
    }

    #[test]
    fn merge_mean_averages_repeated_depths() {
        let input = vec![
            Sample::new(10, 100),
            Sample::new(5, 7),
            Sample::new(10, 101),
            Sample::new(10, 105),
        ];
        let set = collect_samples(input, DuplicatePolicy::MergeMean).unwrap();

        // (100 + 101 + 105) / 3 = 102
        assert_eq!(set.as_slice(), &[Sample::new(10, 102), Sample::new(5, 7)]);
    }

    #[test]
    fn merge_mean_rounds_half_up() {
        let input = vec![Sample::new(1, 1), Sample::new(1, 2)];
        let set = collect_samples(input, DuplicatePolicy::MergeMean).unwrap();
        assert_eq!(set.as_slice(), &[Sample::new(1, 2)]);
    }

    #[test]
    fn merge_mean_handles_extreme_costs() {
        let input = vec![Sample::new(1, u64::MAX), Sample::new(1, u64::MAX)];
        let set = collect_samples(input, DuplicatePolicy::MergeMean).unwrap();
        assert_eq!(set.as_slice(), &[Sample::new(1, u64::MAX)]);
    }
}
