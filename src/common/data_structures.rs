/// One validated (depth, gas) observation taken from the benchmark log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sample {
    /// Number of pending orders resident in the orderbook
    depth: u64,
    /// Gas consumed by the market-like limit buy at that depth
    cost: u64,
}

impl Sample {
    pub const fn new(depth: u64, cost: u64) -> Self {
        Self { depth, cost }
    }

    pub const fn depth(&self) -> u64 {
        self.depth
    }

    pub const fn cost(&self) -> u64 {
        self.cost
    }

    /// Returns `true` if both coordinates can be placed on a logarithmic axis.
    pub const fn is_log_plottable(&self) -> bool {
        self.depth > 0 && self.cost > 0
    }
}

/// A non-empty sequence of [`Sample`]s.
///
/// The sequence is only ever built once (by the collector or the ordering stage)
/// and is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Wraps the given samples, returning [`None`] if there are none.
    pub fn new(samples: Vec<Sample>) -> Option<Self> {
        if samples.is_empty() {
            None
        } else {
            Some(Self { samples })
        }
    }

    /// Wraps samples already known to be non-empty.
    pub(crate) fn from_non_empty(samples: Vec<Sample>) -> Self {
        debug_assert!(!samples.is_empty());
        Self { samples }
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Checks whether every adjacent pair is non-decreasing by depth.
    pub fn is_ordered_by_depth(&self) -> bool {
        self.samples
            .windows(2)
            .all(|pair| pair[0].depth() <= pair[1].depth())
    }
}

/// Line tallies gathered while scanning a benchmark log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Every line read from the source, including blank ones
    pub lines_read: usize,
    /// Lines that produced a [`Sample`]
    pub accepted: usize,
    /// Blank lines, free text and undecodable JSON
    pub malformed: usize,
    /// Decoded records missing a usable depth or gas field
    pub incomplete: usize,
}
