//! Handler metrics for observability
//!
//! One set of counters is shared by a root handler and every handler derived
//! from it, alongside the output lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for events written by a family of handlers
///
/// # Example
///
/// ```
/// use rust_logfmt_handler::HandlerMetrics;
///
/// let metrics = HandlerMetrics::new();
/// metrics.record_written(12);
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.events_written(), 1);
/// assert_eq!(metrics.bytes_written(), 12);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug, Default)]
pub struct HandlerMetrics {
    /// Events whose block reached the sink
    events_written: AtomicU64,

    /// Bytes handed to the sink
    bytes_written: AtomicU64,

    /// Events whose write failed
    write_failures: AtomicU64,
}

impl HandlerMetrics {
    pub const fn new() -> Self {
        Self {
            events_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn events_written(&self) -> u64 {
        self.events_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Record one event of `bytes` length written
    #[inline]
    pub fn record_written(&self, bytes: usize) {
        self.events_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a failed write, returning the previous failure count
    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been attempted.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = failed + self.events_written() as f64;
        if total == 0.0 {
            0.0
        } else {
            failed / total * 100.0
        }
    }
}
