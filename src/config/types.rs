use serde::Deserialize;

/// Main configuration structure for cinecrawl
///
/// Every section is optional; a missing file or section falls back to the
/// defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enables debug-level diagnostics for dropped links and failed fetches
    pub debug: bool,
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            site: SiteConfig::default(),
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            filter: FilterConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// The site being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host every discovered link is resolved against
    pub origin: String,

    /// First link to schedule, relative to the origin
    pub seed: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "http://dianying.fm".to_string(),
            seed: "/movie/django-unchained/".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Hard cap on the number of distinct links ever discovered
    #[serde(rename = "max-links")]
    pub max_links: u64,

    /// Maximum number of page fetches in flight at once
    #[serde(rename = "concurrent-fetches")]
    pub concurrent_fetches: u32,

    /// Capacity of the todo, page and record queues
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Fetch the seed once before starting and fail fast if it is unreachable
    #[serde(rename = "probe-seed")]
    pub probe_seed: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_links: 20_000_000,
            concurrent_fetches: 4,
            queue_capacity: 64,
            request_timeout_secs: 30,
            probe_seed: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "cinecrawl".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Which discovered links are worth following
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// A link is kept only if it starts with one of these prefixes
    #[serde(rename = "include-prefixes")]
    pub include_prefixes: Vec<String>,

    /// Namespace whose links are subject to facet exclusion
    #[serde(rename = "facet-namespace")]
    pub facet_namespace: String,

    /// Facet markers that make a listing link combinatorial noise
    #[serde(rename = "excluded-facets")]
    pub excluded_facets: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include_prefixes: vec!["/category".to_string(), "/movie".to_string()],
            facet_namespace: "/category".to_string(),
            excluded_facets: ["class_tv", "sort_", "region_", "genre_", "year_"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives one JSON file per record
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "movie".to_string(),
        }
    }
}
