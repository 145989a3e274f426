//! Page fetching
//!
//! This module handles all page retrieval for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - The `PageSource` boundary and its HTTP implementation
//! - The fetcher worker, which runs a bounded number of fetches at once
//!
//! Failed fetches are never retried. The link is dropped along with its
//! work ticket.

use crate::config::UserAgentConfig;
use crate::crawler::messages::{Page, TodoLink};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// The response had no content
    EmptyBody,

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success {
                final_url,
                status_code,
                body,
            } => write!(f, "HTTP {} from {} ({} bytes)", status_code, final_url, body.len()),
            Self::HttpError { status_code } => write!(f, "HTTP {}", status_code),
            Self::EmptyBody => write!(f, "empty body"),
            Self::NetworkError { error } => write!(f, "{}", error),
        }
    }
}

/// Retrieves the raw body of a page
///
/// Implementations must be thread-safe; the fetcher calls them from many
/// tasks at once.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Performs one GET of `url`, without retry
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Fetches pages over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use cinecrawl::config::UserAgentConfig;
/// use cinecrawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "cinecrawl".to_string(),
///     crawler_version: "0.1.0".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", config.crawler_name, config.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with content | Success |
/// | 2xx without content | EmptyBody |
/// | Any other status | HttpError |
/// | Timeout / connection / body read failure | NetworkError |
///
/// Redirects are followed by the client.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            // Classify error
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() || status == StatusCode::NO_CONTENT {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) if body.trim().is_empty() => FetchResult::EmptyBody,
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Counts reported by the fetcher when it finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetcherReport {
    pub fetched: u64,
    pub failed: u64,
}

impl FetcherReport {
    fn tally(&mut self, outcome: Result<bool, JoinError>) {
        match outcome {
            Ok(true) => self.fetched += 1,
            Ok(false) => self.failed += 1,
            Err(e) => {
                tracing::warn!("Fetch task failed: {}", e);
                self.failed += 1;
            }
        }
    }
}

/// Fetcher worker: turns scheduled links into pages
pub struct Fetcher {
    source: Arc<dyn PageSource>,
    concurrency: usize,
}

impl Fetcher {
    pub fn new(source: Arc<dyn PageSource>, concurrency: usize) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
        }
    }

    /// Runs until the todo queue is closed and drained
    ///
    /// Every in-flight fetch is joined before the page queue closes.
    pub async fn run(
        self,
        mut todo_rx: mpsc::Receiver<TodoLink>,
        page_tx: mpsc::Sender<Page>,
    ) -> FetcherReport {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut in_flight = JoinSet::new();
        let mut report = FetcherReport::default();

        while let Some(todo) = todo_rx.recv().await {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            while let Some(outcome) = in_flight.try_join_next() {
                report.tally(outcome);
            }

            let source = Arc::clone(&self.source);
            let page_tx = page_tx.clone();
            in_flight.spawn(async move {
                let _permit = permit;
                fetch_one(source.as_ref(), todo, &page_tx).await
            });
        }

        while let Some(outcome) = in_flight.join_next().await {
            report.tally(outcome);
        }

        tracing::debug!(
            "Fetcher finished: {} fetched, {} failed",
            report.fetched,
            report.failed
        );
        report
    }
}

/// Fetches one link and forwards the page; false if the link was dropped
async fn fetch_one(source: &dyn PageSource, todo: TodoLink, page_tx: &mpsc::Sender<Page>) -> bool {
    let TodoLink { link, url, ticket } = todo;

    match source.fetch(url.as_str()).await {
        FetchResult::Success { body, .. } => {
            tracing::trace!("Fetched {} ({} bytes)", url, body.len());
            let page = Page {
                link,
                url,
                body,
                ticket,
            };
            if page_tx.send(page).await.is_err() {
                tracing::warn!("Extractor stopped; dropping fetched page");
                return false;
            }
            true
        }
        failure => {
            tracing::debug!("Dropping {}: {}", url, failure);
            false
        }
    }
}
