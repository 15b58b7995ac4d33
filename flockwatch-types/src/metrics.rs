//! Executor metrics and cluster-wide aggregates.

use crate::DRIVER_ID;

/// Bytes in one megabyte, as the web UI counts them.
pub const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Milliseconds in one second.
pub const MILLIS_PER_SECOND: f64 = 1000.0;

/// One polled executor's state.
///
/// Snapshots are replaced wholesale on every poll. `active_tasks` is always
/// clamped to `cores`: Spark occasionally reports more running tasks than an
/// executor has slots, and that value must never reach the display.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutorSnapshot {
    /// Executor identifier (`"driver"` for the driver).
    pub id: String,

    /// `host:port` the executor runs on.
    pub host_port: String,

    /// Number of cores (task slots) of the executor.
    pub cores: u32,

    /// Running tasks, clamped to `cores`.
    pub active_tasks: u32,

    /// Tasks completed since the executor started.
    pub completed_tasks: u64,

    /// Tasks ever assigned to the executor, finished or not.
    pub total_tasks: u64,

    /// Cumulative task time in milliseconds, summed over all cores.
    pub total_duration_ms: u64,

    /// Cumulative input read by the executor's tasks.
    pub total_input_bytes: u64,

    /// RDD blocks stored by the executor.
    pub rdd_blocks: u64,
}

impl ExecutorSnapshot {
    /// Create a builder for an executor snapshot.
    pub fn builder(id: impl Into<String>) -> ExecutorSnapshotBuilder {
        ExecutorSnapshotBuilder::new(id)
    }

    /// Whether this entry is the driver rather than a worker.
    pub fn is_driver(&self) -> bool {
        self.id == DRIVER_ID
    }

    /// Task time per core in seconds.
    ///
    /// Returns 0 for an executor that reports no cores.
    pub fn duration_per_core_secs(&self) -> f64 {
        if self.cores == 0 {
            return 0.0;
        }
        self.total_duration_ms as f64 / (f64::from(self.cores) * MILLIS_PER_SECOND)
    }

    /// Cumulative input in megabytes.
    pub fn input_megabytes(&self) -> f64 {
        self.total_input_bytes as f64 / BYTES_PER_MEGABYTE
    }
}

/// Builder for `ExecutorSnapshot`.
///
/// `build` applies the active-task clamp, so every snapshot produced through
/// the builder honors `active_tasks <= cores`.
#[derive(Debug)]
pub struct ExecutorSnapshotBuilder {
    snapshot: ExecutorSnapshot,
}

impl ExecutorSnapshotBuilder {
    /// Create a new builder for the given executor id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            snapshot: ExecutorSnapshot {
                id: id.into(),
                ..Default::default()
            },
        }
    }

    /// Set the `host:port`.
    pub fn host_port(mut self, host_port: impl Into<String>) -> Self {
        self.snapshot.host_port = host_port.into();
        self
    }

    /// Set the core count.
    pub fn cores(mut self, cores: u32) -> Self {
        self.snapshot.cores = cores;
        self
    }

    /// Set the reported active task count (clamped on build).
    pub fn active_tasks(mut self, active: u32) -> Self {
        self.snapshot.active_tasks = active;
        self
    }

    /// Set the completed task count.
    pub fn completed_tasks(mut self, completed: u64) -> Self {
        self.snapshot.completed_tasks = completed;
        self
    }

    /// Set the total task count.
    pub fn total_tasks(mut self, total: u64) -> Self {
        self.snapshot.total_tasks = total;
        self
    }

    /// Set the cumulative task duration in milliseconds.
    pub fn total_duration_ms(mut self, ms: u64) -> Self {
        self.snapshot.total_duration_ms = ms;
        self
    }

    /// Set the cumulative input in bytes.
    pub fn total_input_bytes(mut self, bytes: u64) -> Self {
        self.snapshot.total_input_bytes = bytes;
        self
    }

    /// Set the RDD block count.
    pub fn rdd_blocks(mut self, blocks: u64) -> Self {
        self.snapshot.rdd_blocks = blocks;
        self
    }

    /// Build the snapshot.
    pub fn build(mut self) -> ExecutorSnapshot {
        self.snapshot.active_tasks = self.snapshot.active_tasks.min(self.snapshot.cores);
        self.snapshot
    }
}

/// Sums over every non-driver executor of one poll.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterTotals {
    /// Number of worker executors.
    pub executors: usize,
    /// Total RDD blocks.
    pub rdd_blocks: u64,
    /// Total completed tasks.
    pub completed_tasks: u64,
    /// Total assigned tasks.
    pub total_tasks: u64,
    /// Sum of per-core durations, in seconds.
    pub duration_secs: f64,
    /// Total input in megabytes.
    pub input_megabytes: f64,
}

/// Per-executor averages of [`ClusterTotals`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAverages {
    pub rdd_blocks: f64,
    pub completed_tasks: f64,
    pub total_tasks: f64,
    pub duration_secs: f64,
    pub input_megabytes: f64,
}

impl ClusterTotals {
    /// Aggregate a list of executors, skipping the driver.
    pub fn from_executors(executors: &[ExecutorSnapshot]) -> Self {
        executors
            .iter()
            .filter(|e| !e.is_driver())
            .fold(Self::default(), |mut totals, e| {
                totals.executors += 1;
                totals.rdd_blocks += e.rdd_blocks;
                totals.completed_tasks += e.completed_tasks;
                totals.total_tasks += e.total_tasks;
                totals.duration_secs += e.duration_per_core_secs();
                totals.input_megabytes += e.input_megabytes();
                totals
            })
    }

    /// Averages per executor, or `None` when there are no executors.
    pub fn averages(&self) -> Option<ClusterAverages> {
        if self.executors == 0 {
            return None;
        }
        let n = self.executors as f64;
        Some(ClusterAverages {
            rdd_blocks: self.rdd_blocks as f64 / n,
            completed_tasks: self.completed_tasks as f64 / n,
            total_tasks: self.total_tasks as f64 / n,
            duration_secs: self.duration_secs / n,
            input_megabytes: self.input_megabytes / n,
        })
    }
}
