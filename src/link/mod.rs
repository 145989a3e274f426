//! Link handling for cinecrawl
//!
//! This module provides canonicalization of discovered links against the
//! site origin, fixed-size link fingerprints for deduplication, and the
//! namespace/facet filter that decides which links are worth following.

mod canonical;
mod fingerprint;
mod filter;

use thiserror::Error;

pub use canonical::canonicalize;
pub use filter::LinkFilter;
pub use fingerprint::LinkFingerprint;

/// Reasons a discovered link cannot be scheduled
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("empty link")]
    Empty,

    #[error("unsupported link target: {0}")]
    Unsupported(String),

    #[error("failed to resolve link {link}: {message}")]
    Resolve { link: String, message: String },

    #[error("link {0} leaves the crawled site")]
    OffSite(String),
}
