//! Output module for persisting records and reporting crawl results
//!
//! This module handles:
//! - The `RecordSink` boundary the persister writes through
//! - One-JSON-file-per-record storage, plus an in-memory sink
//! - The end-of-run crawl summary

mod json_files;
mod memory;
pub mod stats;
mod traits;

pub use json_files::{storage_key, JsonFileSink};
pub use memory::MemorySink;
pub use stats::print_summary;
pub use traits::{CrawlSummary, OutputError, OutputResult, RecordSink};
