//! Record sink that keeps writes in memory
//!
//! Used to run the pipeline without touching disk, e.g. when embedding the
//! crawler or exercising the coordinator in tests.

use crate::output::traits::{OutputResult, RecordSink};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// In-memory sink
///
/// Keeps every write in order, so repeated keys stay visible.
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write received so far, in arrival order
    pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn write(&self, key: &str, bytes: &[u8]) -> OutputResult<()> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.to_string(), bytes.to_vec()));
        Ok(())
    }
}
