//! Output sink trait and types
//!
//! This module defines the persistence boundary the persister writes
//! through, and the summary a finished crawl reports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Durable destination for serialized records
///
/// A write stores `bytes` under `key`. Writing the same key twice follows
/// the sink's own overwrite semantics. Implementations must be thread-safe.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Stores one serialized record under a storage key
    async fn write(&self, key: &str, bytes: &[u8]) -> OutputResult<()>;
}

/// Summary statistics for a finished crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub seed: String,
    pub budget: u64,

    // Scheduler
    pub links_discovered: u64,
    pub links_scheduled: u64,

    // Fetcher
    pub pages_fetched: u64,
    pub fetch_failures: u64,

    // Extractor
    pub records_extracted: u64,
    pub pages_without_record: u64,
    pub links_reported: u64,

    // Persister
    pub records_written: u64,
    pub write_failures: u64,
}

impl CrawlSummary {
    /// Wall-clock duration of the run in seconds, if it has finished
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) => Some((finished - started).num_seconds()),
            _ => None,
        }
    }

    /// True if the crawl stopped because the link budget ran out
    pub fn budget_exhausted(&self) -> bool {
        self.links_scheduled >= self.budget
    }

    /// Percentage of scheduled links that were fetched successfully
    pub fn fetch_success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.fetch_failures;
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempted as f64) * 100.0
    }
}
