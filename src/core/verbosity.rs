//! Shared verbosity threshold
//!
//! A `Verbosity` is a cheap, cloneable handle to one threshold. Every logger
//! derived from the same root holds the same handle, so `set` is observed by
//! all of them on their next emission.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Verbosity threshold used when nothing else is configured
pub const DEFAULT_VERBOSITY: i32 = 0;

/// Shared, atomically updated verbosity threshold
///
/// A record at verbosity level `v` is emitted iff `v <= threshold`.
///
/// # Example
///
/// ```
/// use rust_contextual_logger::Verbosity;
///
/// let verbosity = Verbosity::new(3);
/// assert!(verbosity.enabled(3));
/// assert!(!verbosity.enabled(4));
///
/// let shared = verbosity.clone();
/// shared.set(5);
/// assert!(verbosity.enabled(4));
/// ```
#[derive(Debug, Clone)]
pub struct Verbosity {
    threshold: Arc<AtomicI32>,
}

impl Verbosity {
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold: Arc::new(AtomicI32::new(threshold)),
        }
    }

    #[inline]
    pub fn threshold(&self) -> i32 {
        self.threshold.load(Ordering::Acquire)
    }

    /// Replace the threshold for every handle sharing this state
    pub fn set(&self, threshold: i32) {
        self.threshold.store(threshold, Ordering::Release);
    }

    #[inline]
    pub fn enabled(&self, level: i32) -> bool {
        level <= self.threshold()
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::new(DEFAULT_VERBOSITY)
    }
}
