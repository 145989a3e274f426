//! Configuration module for cinecrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a crawl can also run without any file.
//!
//! # Example
//!
//! ```no_run
//! use cinecrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cinecrawl.toml")).unwrap();
//! println!("Crawling {} from {}", config.site.origin, config.site.seed);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FilterConfig, OutputConfig, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{parse_origin, validate};
