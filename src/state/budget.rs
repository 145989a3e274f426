//! Discovery budget
//!
//! Caps how many distinct links a run may ever schedule.

use std::sync::atomic::{AtomicU64, Ordering};

/// Discovery budget and its two monotonic counters
///
/// Only the scheduler increments the counters; anything else holding a
/// shared reference reads them for reporting.
#[derive(Debug)]
pub struct Budget {
    limit: u64,
    discovered: AtomicU64,
    scheduled: AtomicU64,
}

impl Budget {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            discovered: AtomicU64::new(0),
            scheduled: AtomicU64::new(0),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Links accepted as new so far
    pub fn discovered(&self) -> u64 {
        self.discovered.load(Ordering::Acquire)
    }

    /// Links dispatched to the fetcher so far
    pub fn scheduled(&self) -> u64 {
        self.scheduled.load(Ordering::Acquire)
    }

    /// True while more discoveries may still be accepted
    pub fn accepts_discoveries(&self) -> bool {
        self.discovered() < self.limit
    }

    /// True once the scheduled count has reached the limit
    pub fn is_exhausted(&self) -> bool {
        self.scheduled() >= self.limit
    }

    pub(crate) fn record_scheduled(&self) {
        self.discovered.fetch_add(1, Ordering::AcqRel);
        self.scheduled.fetch_add(1, Ordering::AcqRel);
    }
}
