//! Crawler coordinator - pipeline wiring and run orchestration
//!
//! This module contains the logic that coordinates a crawl run, including:
//! - Probing the seed before any worker starts
//! - Creating the four queues and spawning one task per stage
//! - Seeding the scheduler with the first link
//! - Joining the workers and assembling the run summary
//!
//! The coordinator never holds a sender of the discovered queue after
//! seeding, so the queue's lifetime is governed by work tickets alone.

use crate::config::{parse_origin, Config};
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{build_http_client, Fetcher, HttpPageSource, PageSource};
use crate::crawler::messages::WorkTicket;
use crate::crawler::persister::Persister;
use crate::crawler::scheduler::Scheduler;
use crate::link::{canonicalize, LinkFilter};
use crate::output::{CrawlSummary, JsonFileSink, RecordSink};
use crate::state::{Budget, DedupStore};
use crate::{CineError, ConfigError, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

/// Largest capacity a tokio mpsc channel accepts
const MAX_QUEUE_CAPACITY: usize = usize::MAX >> 3;

/// Capacity of the discovered queue for a given budget
///
/// One seed batch plus at most one batch per scheduled page can ever be
/// sent, so the extractor never blocks reporting links.
pub fn discovered_capacity(max_links: u64) -> usize {
    usize::try_from(max_links.saturating_add(1))
        .unwrap_or(MAX_QUEUE_CAPACITY)
        .min(MAX_QUEUE_CAPACITY)
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    source: Arc<dyn PageSource>,
    sink: Arc<dyn RecordSink>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (already validated)
    /// * `source` - Where pages are fetched from
    /// * `sink` - Where records are written to
    pub fn new(config: Config, source: Arc<dyn PageSource>, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            config,
            source,
            sink,
        }
    }

    /// Resolves the configured seed against the origin
    fn seed_url(&self) -> Result<(Url, Url)> {
        let site = &self.config.site;
        let origin = parse_origin(&site.origin)?;
        let seed = canonicalize(&origin, &site.seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("seed {}: {}", site.seed, e)))?;
        Ok((origin, seed))
    }

    /// Fetches the seed once, failing the run if it cannot be retrieved
    async fn probe_seed(&self, seed: &Url) -> Result<()> {
        tracing::debug!("Probing seed {}", seed);
        let result = self.source.fetch(seed.as_str()).await;
        if result.is_success() {
            return Ok(());
        }

        Err(CineError::SeedUnreachable {
            url: seed.to_string(),
            reason: result.to_string(),
        })
    }

    /// Runs the crawl to completion
    ///
    /// The run ends when the persister returns, which happens only after
    /// every upstream stage has drained and closed its output.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The crawl finished
    /// * `Err(CineError)` - The seed was invalid or unreachable, or a worker panicked
    pub async fn run(self) -> Result<CrawlSummary> {
        let (origin, seed) = self.seed_url()?;
        if self.config.crawler.probe_seed {
            self.probe_seed(&seed).await?;
        }

        let crawler = &self.config.crawler;
        let store = Arc::new(DedupStore::new());
        let budget = Arc::new(Budget::new(crawler.max_links));

        let mut summary = CrawlSummary {
            started_at: Some(Utc::now()),
            seed: seed.to_string(),
            budget: crawler.max_links,
            ..CrawlSummary::default()
        };
        tracing::info!(
            "Starting crawl from {} with a budget of {} links",
            seed,
            crawler.max_links
        );

        let capacity = crawler.queue_capacity.clamp(1, MAX_QUEUE_CAPACITY);
        let (discovered_tx, discovered_rx) = mpsc::channel(discovered_capacity(crawler.max_links));
        let (todo_tx, todo_rx) = mpsc::channel(capacity);
        let (page_tx, page_rx) = mpsc::channel(capacity);
        let (record_tx, record_rx) = mpsc::channel(capacity);

        let scheduler = Scheduler::new(origin, Arc::clone(&store), Arc::clone(&budget));
        let fetcher = Fetcher::new(
            Arc::clone(&self.source),
            crawler.concurrent_fetches as usize,
        );
        let extractor = Extractor::new(LinkFilter::new(&self.config.filter));
        let persister = Persister::new(Arc::clone(&self.sink));

        let scheduler = tokio::spawn(scheduler.run(discovered_rx, todo_tx));
        let fetcher = tokio::spawn(fetcher.run(todo_rx, page_tx));
        let extractor = tokio::spawn(extractor.run(page_rx, record_tx));
        let persister = tokio::spawn(persister.run(record_rx));

        // Spends the only original sender
        if !WorkTicket::new(discovered_tx)
            .report(vec![self.config.site.seed.clone()])
            .await
        {
            tracing::warn!("Scheduler stopped before the seed was queued");
        }

        let scheduler = join_worker("scheduler", scheduler).await?;
        let fetcher = join_worker("fetcher", fetcher).await?;
        let extractor = join_worker("extractor", extractor).await?;
        let persister = join_worker("persister", persister).await?;

        summary.finished_at = Some(Utc::now());
        summary.links_discovered = budget.discovered();
        summary.links_scheduled = scheduler.scheduled;
        summary.pages_fetched = fetcher.fetched;
        summary.fetch_failures = fetcher.failed;
        summary.records_extracted = extractor.records;
        summary.pages_without_record = extractor.pages_without_record;
        summary.links_reported = extractor.links_reported;
        summary.records_written = persister.written;
        summary.write_failures = persister.failed;

        tracing::info!(
            "Crawl completed: {} links scheduled ({} known), {} pages fetched, {} records written",
            summary.links_scheduled,
            store.len(),
            summary.pages_fetched,
            summary.records_written
        );

        Ok(summary)
    }
}

async fn join_worker<T>(name: &str, handle: JoinHandle<T>) -> Result<T> {
    handle
        .await
        .map_err(|e| CineError::Worker(format!("{} task failed: {}", name, e)))
}

/// Runs a crawl over HTTP, writing JSON records to the configured directory
///
/// # Arguments
///
/// * `config` - The crawler configuration (already validated)
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed successfully
/// * `Err(CineError)` - Crawl could not start or a worker failed
pub async fn run_crawl(config: Config) -> Result<CrawlSummary> {
    let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
    let client = build_http_client(&config.user_agent, timeout)?;
    let sink = JsonFileSink::create(&config.output.directory)?;
    tracing::info!("Writing records to {}", sink.directory().display());

    Coordinator::new(config, Arc::new(HttpPageSource::new(client)), Arc::new(sink))
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::FetchResult;
    use crate::output::MemorySink;
    use crate::Record;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const ORIGIN: &str = "http://test.local";

    /// A site served from memory; unknown paths answer 404
    #[derive(Default)]
    struct StaticSite {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticSite {
        fn page(mut self, path: &str, body: &str) -> Self {
            self.pages.insert(format!("{}{}", ORIGIN, path), body.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for StaticSite {
        async fn fetch(&self, url: &str) -> FetchResult {
            self.requests.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(body) => FetchResult::Success {
                    final_url: url.to_string(),
                    status_code: 200,
                    body: body.clone(),
                },
                None => FetchResult::HttpError { status_code: 404 },
            }
        }
    }

    fn movie(name: &str, links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="{}">x</a>"#, l))
            .collect();
        format!(
            r#"<html><body><h1 class="x-m-title">{} <span class="muted">(1995)</span></h1>
               <table><tr><td>导演</td><td>A / B</td></tr></table>{}</body></html>"#,
            name, anchors
        )
    }

    fn listing(links: &[&str]) -> String {
        links
            .iter()
            .map(|l| format!(r#"<a href="{}">x</a>"#, l))
            .collect()
    }

    fn test_config(seed: &str, max_links: u64) -> Config {
        let mut config = Config::default();
        config.site.origin = ORIGIN.to_string();
        config.site.seed = seed.to_string();
        config.crawler.max_links = max_links;
        config.crawler.probe_seed = false;
        config.crawler.queue_capacity = 2;
        config
    }

    async fn crawl(
        config: Config,
        site: Arc<StaticSite>,
        sink: Arc<MemorySink>,
    ) -> Result<CrawlSummary> {
        let run = Coordinator::new(config, site, sink).run();
        tokio::time::timeout(Duration::from_secs(10), run)
            .await
            .expect("crawl did not terminate")
    }

    fn written_names(sink: &MemorySink) -> Vec<String> {
        let mut names: Vec<String> = sink
            .writes()
            .into_iter()
            .map(|(_, bytes)| {
                let record: Record = serde_json::from_slice(&bytes).unwrap();
                record.name[0].clone()
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_discovered_capacity() {
        assert_eq!(discovered_capacity(1), 2);
        assert_eq!(discovered_capacity(20_000_000), 20_000_001);
        assert_eq!(discovered_capacity(u64::MAX), MAX_QUEUE_CAPACITY);
    }

    #[tokio::test]
    async fn test_small_site_terminates_and_persists_records() {
        let site = Arc::new(
            StaticSite::default()
                .page("/category/action", &listing(&["/movie/heat/", "/movie/ronin/"]))
                .page("/movie/heat/", &movie("Heat", &["/movie/ronin/", "/category/action"]))
                .page("/movie/ronin/", &movie("Ronin", &["/movie/heat/"])),
        );
        let sink = Arc::new(MemorySink::new());

        let summary = crawl(test_config("/category/action", 1000), site.clone(), sink.clone())
            .await
            .unwrap();

        assert_eq!(written_names(&sink), vec!["Heat", "Ronin"]);
        assert_eq!(summary.links_scheduled, 3);
        assert_eq!(summary.pages_fetched, 3);
        assert_eq!(summary.records_extracted, 2);
        assert_eq!(summary.pages_without_record, 1);
        assert_eq!(summary.records_written, 2);
        assert!(!summary.budget_exhausted());
        assert!(summary.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_each_link_fetched_once() {
        let site = Arc::new(
            StaticSite::default()
                .page("/movie/a/", &movie("A", &["/movie/b/", "/movie/b/", "/movie/a/"]))
                .page("/movie/b/", &movie("B", &["/movie/a/", "/movie/a/#cast"])),
        );
        let sink = Arc::new(MemorySink::new());

        crawl(test_config("/movie/a/", 1000), site.clone(), sink.clone())
            .await
            .unwrap();

        let mut requests = site.requests();
        requests.sort();
        assert_eq!(
            requests,
            vec!["http://test.local/movie/a/", "http://test.local/movie/b/"]
        );
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_budget_caps_scheduled_links() {
        let targets: Vec<String> = (0..20).map(|i| format!("/movie/m{}/", i)).collect();
        let target_refs: Vec<&str> = targets.iter().map(String::as_str).collect();
        let mut site = StaticSite::default().page("/category/all", &listing(&target_refs));
        for (i, path) in targets.iter().enumerate() {
            site = site.page(path, &movie(&format!("M{}", i), &target_refs));
        }
        let site = Arc::new(site);
        let sink = Arc::new(MemorySink::new());

        let summary = crawl(test_config("/category/all", 5), site.clone(), sink.clone())
            .await
            .unwrap();

        assert_eq!(summary.links_scheduled, 5);
        assert_eq!(summary.links_discovered, 5);
        assert!(summary.budget_exhausted());
        assert!(site.requests().len() <= 5);
        assert!(sink.len() <= 4);
    }

    #[tokio::test]
    async fn test_failed_fetches_are_dropped() {
        let site = Arc::new(
            StaticSite::default()
                .page("/movie/a/", &movie("A", &["/movie/missing/", "/movie/b/"]))
                .page("/movie/b/", &movie("B", &[])),
        );
        let sink = Arc::new(MemorySink::new());

        let summary = crawl(test_config("/movie/a/", 1000), site, sink.clone())
            .await
            .unwrap();

        assert_eq!(summary.links_scheduled, 3);
        assert_eq!(summary.pages_fetched, 2);
        assert_eq!(summary.fetch_failures, 1);
        assert_eq!(written_names(&sink), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_nameless_pages_are_not_persisted() {
        let site = Arc::new(
            StaticSite::default()
                .page("/movie/a/", r#"<table><tr><td>导演</td><td>X</td></tr></table>"#),
        );
        let sink = Arc::new(MemorySink::new());

        let summary = crawl(test_config("/movie/a/", 10), site, sink.clone())
            .await
            .unwrap();

        assert_eq!(summary.pages_without_record, 1);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_seed_fails_probe() {
        let site = Arc::new(StaticSite::default());
        let sink = Arc::new(MemorySink::new());
        let mut config = test_config("/movie/gone/", 10);
        config.crawler.probe_seed = true;

        let result = crawl(config, site.clone(), sink).await;

        assert!(matches!(result, Err(CineError::SeedUnreachable { .. })));
        assert_eq!(site.requests(), vec!["http://test.local/movie/gone/"]);
    }

    #[tokio::test]
    async fn test_unreachable_seed_without_probe_finishes_empty() {
        let site = Arc::new(StaticSite::default());
        let sink = Arc::new(MemorySink::new());

        let summary = crawl(test_config("/movie/gone/", 10), site, sink.clone())
            .await
            .unwrap();

        assert_eq!(summary.links_scheduled, 1);
        assert_eq!(summary.fetch_failures, 1);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_origin_with_path_is_a_config_error() {
        let site = Arc::new(StaticSite::default().page("/movie/a/", &movie("A", &[])));
        let sink = Arc::new(MemorySink::new());
        let mut config = test_config("/movie/a/", 10);
        config.site.origin = format!("{}/base", ORIGIN);

        let result = crawl(config, site.clone(), sink.clone()).await;

        assert!(matches!(result, Err(CineError::Config(ConfigError::InvalidUrl(_)))));
        assert!(site.requests().is_empty());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_seed_is_a_config_error() {
        let site = Arc::new(StaticSite::default());
        let sink = Arc::new(MemorySink::new());

        let result = crawl(test_config("http://elsewhere.example/", 10), site, sink).await;
        assert!(matches!(result, Err(CineError::Config(_))));
    }
}
