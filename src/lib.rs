//! cinecrawl: a focused movie-site crawler
//!
//! Starting from one seed page, this crate walks a single site through a
//! four-stage pipeline (schedule, fetch, extract, persist), deduplicating
//! links by fingerprint and writing one JSON record per movie page found.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod link;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for cinecrawl operations
#[derive(Debug, Error)]
pub enum CineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed {url} is unreachable: {reason}")]
    SeedUnreachable { url: String, reason: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Pipeline worker failed: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for cinecrawl operations
pub type Result<T> = std::result::Result<T, CineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{RatingLink, Record};
pub use link::LinkFingerprint;
pub use state::{DedupStore, DiscoveryState};
