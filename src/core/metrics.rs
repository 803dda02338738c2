//! Pipeline metrics for observability
//!
//! Counters describing what happened to log calls: how many reached a sink,
//! how many were filtered by severity, and how many failed or hit a closed
//! logger.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by the log-call pipeline
///
/// # Example
///
/// ```
/// use rust_section_logger::PipelineMetrics;
///
/// let metrics = PipelineMetrics::new();
///
/// metrics.record_accepted();
/// metrics.record_filtered();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.accepted(), 1);
/// assert_eq!(metrics.filtered(), 2);
/// ```
#[derive(Debug)]
pub struct PipelineMetrics {
    /// Calls forwarded to a logger
    accepted: AtomicU64,

    /// Calls dropped because the severity was below the section level
    filtered: AtomicU64,

    /// Forwarded calls whose logger reported an error
    sink_failures: AtomicU64,

    /// Strict calls rejected because the logger was closed
    closed_rejected: AtomicU64,

    /// Error-ignoring calls that silently swallowed a failure
    absorbed: AtomicU64,
}

impl PipelineMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            closed_rejected: AtomicU64::new(0),
            absorbed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn closed_rejected(&self) -> u64 {
        self.closed_rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn absorbed(&self) -> u64 {
        self.absorbed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_closed_rejected(&self) -> u64 {
        self.closed_rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_absorbed(&self) -> u64 {
        self.absorbed.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of forwarded calls that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been forwarded.
    pub fn failure_rate(&self) -> f64 {
        let accepted = self.accepted() as f64;
        if accepted == 0.0 {
            0.0
        } else {
            (self.sink_failures() as f64 / accepted) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.accepted.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.closed_rejected.store(0, Ordering::Relaxed);
        self.absorbed.store(0, Ordering::Relaxed);
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PipelineMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted()),
            filtered: AtomicU64::new(self.filtered()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            closed_rejected: AtomicU64::new(self.closed_rejected()),
            absorbed: AtomicU64::new(self.absorbed()),
        }
    }
}
