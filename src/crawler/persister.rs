//! Persister worker
//!
//! Serializes each record and writes it through a `RecordSink`.

use crate::extract::Record;
use crate::output::{storage_key, OutputError, OutputResult, RecordSink};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Counts reported by the persister when it finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersisterReport {
    pub written: u64,
    pub failed: u64,
}

/// Persister worker: writes each record once, as pretty-printed JSON
pub struct Persister {
    sink: Arc<dyn RecordSink>,
}

impl Persister {
    pub fn new(sink: Arc<dyn RecordSink>) -> Self {
        Self { sink }
    }

    /// Serializes and writes one record, returning its storage key
    pub async fn persist(&self, record: &Record) -> OutputResult<String> {
        let name = record
            .primary_name()
            .ok_or_else(|| OutputError::Write(format!("record from {} has no name", record.url)))?;
        let key = storage_key(name);
        let bytes = serde_json::to_vec_pretty(record)?;

        self.sink.write(&key, &bytes).await?;
        Ok(key)
    }

    /// Runs until the record queue is closed and drained
    ///
    /// Write failures are logged and counted, never retried.
    pub async fn run(self, mut record_rx: mpsc::Receiver<Record>) -> PersisterReport {
        let mut report = PersisterReport::default();

        while let Some(record) = record_rx.recv().await {
            match self.persist(&record).await {
                Ok(key) => {
                    report.written += 1;
                    tracing::debug!("Saved record '{}' from {}", key, record.url);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Failed to save record from {}: {}", record.url, e);
                }
            }
        }

        report
    }
}
