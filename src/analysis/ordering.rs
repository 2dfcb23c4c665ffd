use crate::common::data_structures::SampleSet;

/// Returns a copy of `samples` sorted by depth, ascending.
///
/// # Remarks
///
/// The sort is stable: samples sharing a depth keep the order in which they were
/// collected, so repeated runs over the same log render identically.
/// The input is left untouched.
pub fn order_by_depth(samples: &SampleSet) -> SampleSet {
    let mut ordered = samples.as_slice().to_vec();
    ordered.sort_by_key(|sample| sample.depth());
    SampleSet::from_non_empty(ordered)
}
