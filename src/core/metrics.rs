//! Sink counters
//!
//! Emission never reports failures to the caller; a failed write or flush
//! shows up here instead.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by every handle of one logger tree
///
/// # Example
///
/// ```
/// use rust_contextual_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .verbosity(1)
///     .appender(WriterAppender::new(std::io::sink()))
///     .build();
///
/// logger.info("written", ());
/// logger.v(2).info("gated off", ());
///
/// let snapshot = logger.metrics().snapshot();
/// assert_eq!(snapshot.logged, 1);
/// assert_eq!(snapshot.suppressed, 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    logged: AtomicU64,
    dropped: AtomicU64,
    suppressed: AtomicU64,
    flush_failures: AtomicU64,
}

/// Point-in-time copy of [`LoggerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Records the appender accepted
    pub logged: u64,
    /// Records lost to an appender error or panic
    pub dropped: u64,
    /// `v(n).info` calls skipped by the threshold
    pub suppressed: u64,
    pub flush_failures: u64,
}

impl MetricsSnapshot {
    /// Share of attempted writes that were lost, in percent
    pub fn drop_rate(&self) -> f64 {
        let attempted = self.logged + self.dropped;
        if attempted == 0 {
            return 0.0;
        }
        self.dropped as f64 * 100.0 / attempted as f64
    }
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            logged: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
        }
    }

    pub fn total_logged(&self) -> u64 {
        self.logged.load(Ordering::Relaxed)
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn suppressed_count(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    pub fn flush_failures(&self) -> u64 {
        self.flush_failures.load(Ordering::Relaxed)
    }

    pub(crate) fn record_logged(&self) {
        self.logged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_flush_failure(&self) {
        self.flush_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            logged: self.total_logged(),
            dropped: self.dropped_count(),
            suppressed: self.suppressed_count(),
            flush_failures: self.flush_failures(),
        }
    }

    /// Percentage of attempted writes that were dropped (0.0 when idle)
    pub fn drop_rate(&self) -> f64 {
        self.snapshot().drop_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
        assert_eq!(metrics.drop_rate(), 0.0);
    }

    #[test]
    fn test_counters_are_independent() {
        let metrics = LoggerMetrics::default();
        metrics.record_logged();
        metrics.record_logged();
        metrics.record_dropped();
        metrics.record_suppressed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.logged, 2);
        assert_eq!(snapshot.dropped, 1);
        assert_eq!(snapshot.suppressed, 1);
        assert_eq!(snapshot.flush_failures, 0);
    }

    #[test]
    fn test_drop_rate_ignores_suppressed() {
        let metrics = LoggerMetrics::new();
        for _ in 0..3 {
            metrics.record_logged();
        }
        metrics.record_dropped();
        for _ in 0..50 {
            metrics.record_suppressed();
        }

        let rate = metrics.drop_rate();
        assert!((24.9..=25.1).contains(&rate), "Drop rate was {}", rate);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let metrics = LoggerMetrics::new();
        metrics.record_flush_failure();

        let snapshot = metrics.snapshot();
        metrics.record_flush_failure();

        assert_eq!(snapshot.flush_failures, 1);
        assert_eq!(metrics.flush_failures(), 2);
    }
}
