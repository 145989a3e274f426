//! cinecrawl main entry point
//!
//! This is the command-line interface for the cinecrawl movie-site crawler.

use cinecrawl::config::{load_config_with_hash, validate, Config};
use cinecrawl::crawler::run_crawl;
use cinecrawl::output::print_summary;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// cinecrawl: a focused movie-site crawler
///
/// cinecrawl walks one site from a seed page, follows category and movie
/// links up to a link budget, and writes one JSON file per movie page.
#[derive(Parser, Debug)]
#[command(name = "cinecrawl")]
#[command(version)]
#[command(about = "A focused movie-site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Site origin, overriding the configuration
    #[arg(long)]
    origin: Option<String>,

    /// Seed link, overriding the configuration
    #[arg(long)]
    seed: Option<String>,

    /// Link budget, overriding the configuration
    #[arg(long)]
    max_links: Option<u64>,

    /// Record output directory, overriding the configuration
    #[arg(long)]
    output_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(origin) = &self.origin {
            config.site.origin = origin.clone();
        }
        if let Some(seed) = &self.seed {
            config.site.seed = seed.clone();
        }
        if let Some(max_links) = self.max_links {
            config.crawler.max_links = max_links;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration before logging so `debug = true` can raise verbosity
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (cfg, hash) = load_config_with_hash(path)?;
            (cfg, Some(hash))
        }
        None => (Config::default(), None),
    };
    cli.apply_overrides(&mut config);

    setup_logging(cli.verbose, cli.quiet, config.debug);

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("No configuration file given, using defaults"),
    }

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, debug: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose.max(u8::from(debug)) {
            0 => EnvFilter::new("cinecrawl=info,warn"),
            1 => EnvFilter::new("cinecrawl=debug,info"),
            _ => EnvFilter::new("cinecrawl=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== cinecrawl Dry Run ===\n");

    println!("Site:");
    println!("  Origin: {}", config.site.origin);
    println!("  Seed: {}", config.site.seed);

    println!("\nCrawler Configuration:");
    println!("  Max links: {}", config.crawler.max_links);
    println!("  Concurrent fetches: {}", config.crawler.concurrent_fetches);
    println!("  Queue capacity: {}", config.crawler.queue_capacity);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Probe seed: {}", config.crawler.probe_seed);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);

    println!("\nLink Filter:");
    println!("  Include prefixes: {}", config.filter.include_prefixes.join(", "));
    println!("  Facet namespace: {}", config.filter.facet_namespace);
    println!("  Excluded facets: {}", config.filter.excluded_facets.join(", "));

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    match run_crawl(config).await {
        Ok(summary) => {
            tracing::info!("Crawl completed successfully");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
