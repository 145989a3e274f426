//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `DedupStore`: maps link fingerprints to their `DiscoveryState`
//! - `Budget`: the discovery limit with its discovered/scheduled counters

mod budget;
mod discovery;

// Re-export main types
pub use budget::Budget;
pub use discovery::{DedupStore, DiscoveryState};
