//! Rolling sample windows for the executor charts.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of samples kept per chart.
pub const DEFAULT_WINDOW: usize = 125;

/// Smallest window that can hold two distinct values.
const MIN_WINDOW: usize = 2;

/// How a window whose samples are all equal gets nudged.
///
/// Line charts scale their y axis from the data, and a zero-variance window
/// collapses that range. Appending one sample that differs by one keeps the
/// axis well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FlatSeriesPolicy {
    /// Decrement when the value sits at the core ceiling, otherwise increment.
    #[default]
    CeilingAware,
    /// Always increment.
    Increment,
    /// Decrement, or increment when the value is already zero.
    Decrement,
}

impl FlatSeriesPolicy {
    /// The value appended after a flat window of `value`.
    ///
    /// Never returns `value` itself.
    pub fn nudge(self, value: u64, ceiling: u64) -> u64 {
        match self {
            FlatSeriesPolicy::CeilingAware if value > 0 && value >= ceiling => value - 1,
            FlatSeriesPolicy::CeilingAware => value + 1,
            FlatSeriesPolicy::Increment => value + 1,
            FlatSeriesPolicy::Decrement if value > 0 => value - 1,
            FlatSeriesPolicy::Decrement => value + 1,
        }
    }
}

/// A fixed-width window over the most recent samples.
///
/// The window always holds exactly `capacity` samples: it starts filled with
/// zeros and every push drops the oldest sample.
#[derive(Debug, Clone)]
pub struct RollingSeries {
    samples: VecDeque<u64>,
    capacity: usize,
    policy: FlatSeriesPolicy,
    latest: Option<u64>,
}

impl RollingSeries {
    /// Create a zero-filled window. Capacities below 2 are raised to 2.
    pub fn new(capacity: usize, policy: FlatSeriesPolicy) -> Self {
        let capacity = capacity.max(MIN_WINDOW);
        Self {
            samples: std::iter::repeat(0).take(capacity).collect(),
            capacity,
            policy,
            latest: None,
        }
    }

    /// Append a sample, dropping the oldest.
    ///
    /// If the window becomes flat, a nudged sample (see
    /// [`FlatSeriesPolicy::nudge`]) is appended as well. `ceiling` is the
    /// largest value the sample can take, i.e. the executor's cores.
    pub fn push(&mut self, sample: u64, ceiling: u64) {
        self.append(sample);
        if self.is_flat() {
            self.append(self.policy.nudge(sample, ceiling));
        }
        self.latest = Some(sample);
    }

    fn append(&mut self, sample: u64) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Whether every sample in the window is equal.
    pub fn is_flat(&self) -> bool {
        let mut iter = self.samples.iter();
        match iter.next() {
            Some(first) => iter.all(|s| s == first),
            None => true,
        }
    }

    /// Number of samples in the window (always the capacity).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples (never true).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Fixed window width.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The last sample pushed by the caller, ignoring nudges.
    pub fn latest(&self) -> Option<u64> {
        self.latest
    }

    /// Largest sample in the window.
    pub fn max(&self) -> u64 {
        self.samples.iter().copied().max().unwrap_or(0)
    }

    /// Samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &u64> {
        self.samples.iter()
    }

    /// `(x, y)` points for chart datasets.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().enumerate().map(|(i, &v)| (i as f64, v as f64)).collect()
    }
}
