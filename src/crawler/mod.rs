//! Crawler module: the concurrent crawl pipeline
//!
//! This module contains the core crawling logic, including:
//! - The scheduler, which dedups links and enforces the budget
//! - The fetcher, which retrieves pages with bounded concurrency
//! - The extractor worker, which turns pages into links and records
//! - The persister, which writes records through a `RecordSink`
//! - The coordinator, which wires the stages and reports a summary
//!
//! Stages talk only through `tokio::sync::mpsc` queues. A closed inbound
//! queue makes a stage drain, close its outbound queues and return.

mod coordinator;
mod extractor;
mod fetcher;
mod messages;
mod persister;
mod scheduler;

pub use coordinator::{discovered_capacity, run_crawl, Coordinator};
pub use extractor::{Extractor, ExtractorReport};
pub use fetcher::{
    build_http_client, fetch_url, FetchResult, Fetcher, FetcherReport, HttpPageSource, PageSource,
};
pub use messages::{Discovery, Page, TodoLink, WorkTicket};
pub use persister::{Persister, PersisterReport};
pub use scheduler::{Scheduler, SchedulerReport};
