//! Deduplication state for discovered links
//!
//! The store is the only piece of mutable state the pipeline stages share.
//! It exposes a single atomic check-and-set so no caller can observe a link
//! between "seen" and "scheduled".
use crate::link::LinkFingerprint;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Per-fingerprint discovery state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryState {
    /// Seen but not yet handed to the fetcher
    Unscheduled,

    /// Already dispatched to the fetcher; never fetched again this run
    Scheduled,
}

impl DiscoveryState {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled)
    }
}

impl fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unscheduled => write!(f, "unscheduled"),
            Self::Scheduled => write!(f, "scheduled"),
        }
    }
}

/// Thread-safe map from link fingerprint to discovery state
///
/// Entries are never removed during a crawl run.
#[derive(Debug, Default)]
pub struct DedupStore {
    states: Mutex<HashMap<LinkFingerprint, DiscoveryState>>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically marks a fingerprint as scheduled
    ///
    /// # Returns
    ///
    /// * `false` - The fingerprint was absent or `Unscheduled` and is now `Scheduled`
    /// * `true` - The fingerprint was already `Scheduled`; nothing changed
    ///
    /// Concurrent callers with the same fingerprint never both receive `false`.
    pub fn ensure_scheduled(&self, fingerprint: LinkFingerprint) -> bool {
        let mut states = self.lock();
        let state = states
            .entry(fingerprint)
            .or_insert(DiscoveryState::Unscheduled);

        if state.is_scheduled() {
            return true;
        }

        *state = DiscoveryState::Scheduled;
        false
    }

    /// Returns the current state of a fingerprint, if it has been seen
    pub fn state_of(&self, fingerprint: &LinkFingerprint) -> Option<DiscoveryState> {
        self.lock().get(fingerprint).copied()
    }

    /// Number of distinct fingerprints seen so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<LinkFingerprint, DiscoveryState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
