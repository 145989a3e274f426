//! Scheduler: deduplication and the discovery budget
//!
//! This module handles:
//! - Resolving discovered links against the site origin
//! - Deciding "already seen" vs "new" through the shared `DedupStore`
//! - Enforcing the discovery budget
//! - Dispatching new links to the fetcher, each with its own work ticket
//!
//! The scheduler stops when the discovered queue is closed and drained, or
//! once the budget is exhausted. Either way it closes the todo queue.

use crate::crawler::messages::{Discovery, TodoLink};
use crate::link::{canonicalize, LinkFingerprint};
use crate::state::{Budget, DedupStore};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// Scheduled-link interval between progress log lines
const PROGRESS_INTERVAL: u64 = 50;

/// Counts reported by the scheduler when it finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerReport {
    /// Discovery batches received, the seed included
    pub batches: u64,

    /// Links received across all batches, duplicates included
    pub links_seen: u64,

    /// Links dispatched to the fetcher
    pub scheduled: u64,

    /// Whether the run ended on the budget rather than on exhaustion
    pub budget_exhausted: bool,
}

/// Single authority over which links get fetched
pub struct Scheduler {
    origin: Url,
    store: Arc<DedupStore>,
    budget: Arc<Budget>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `origin` - Site origin every discovered link is resolved against
    /// * `store` - Shared deduplication store
    /// * `budget` - Shared discovery budget; only the scheduler advances it
    pub fn new(origin: Url, store: Arc<DedupStore>, budget: Arc<Budget>) -> Self {
        Self {
            origin,
            store,
            budget,
        }
    }

    /// Dedups a batch of links, returning the ones to dispatch
    ///
    /// Each returned link has been marked scheduled and counted against the
    /// budget. Once the budget is reached the rest of the batch is ignored.
    pub fn on_discovered(&self, links: &[String]) -> Vec<(String, Url)> {
        let mut dispatch = Vec::new();

        for (i, link) in links.iter().enumerate() {
            if !self.budget.accepts_discoveries() {
                tracing::debug!(
                    "Link budget reached; dropping {} remaining links of the batch",
                    links.len() - i
                );
                break;
            }

            let url = match canonicalize(&self.origin, link) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Dropping link: {}", e);
                    continue;
                }
            };

            let fingerprint = LinkFingerprint::of_url(&url);
            if self.store.ensure_scheduled(fingerprint) {
                tracing::trace!("Already scheduled: {}", url);
                continue;
            }

            self.budget.record_scheduled();
            dispatch.push((link.clone(), url));
        }

        dispatch
    }

    /// True once the budget has been spent
    pub fn should_stop(&self) -> bool {
        self.budget.is_exhausted()
    }

    /// Runs until the discovered queue closes or the budget is exhausted
    ///
    /// Returning drops both the todo sender and the discovered receiver, so
    /// the fetcher sees its queue close and late reports are refused.
    pub async fn run(
        self,
        mut discovered_rx: mpsc::Receiver<Discovery>,
        todo_tx: mpsc::Sender<TodoLink>,
    ) -> SchedulerReport {
        let mut report = SchedulerReport::default();

        'batches: while let Some(Discovery { links, ticket }) = discovered_rx.recv().await {
            report.batches += 1;
            report.links_seen += links.len() as u64;

            for (link, url) in self.on_discovered(&links) {
                report.scheduled += 1;
                let scheduled = self.budget.scheduled();
                if scheduled % PROGRESS_INTERVAL == 0 {
                    tracing::info!(
                        "Progress: {} links scheduled, {} known ({} budget)",
                        scheduled,
                        self.store.len(),
                        self.budget.limit()
                    );
                }

                let todo = TodoLink {
                    link,
                    url,
                    ticket: ticket.issue(),
                };
                if todo_tx.send(todo).await.is_err() {
                    tracing::warn!("Fetcher stopped; scheduler shutting down");
                    break 'batches;
                }
            }

            if self.should_stop() {
                report.budget_exhausted = true;
                tracing::info!(
                    "Link budget of {} exhausted; no further links will be scheduled",
                    self.budget.limit()
                );
                break;
            }
        }

        if !report.budget_exhausted {
            tracing::info!("No links left to discover");
        }
        report
    }
}
