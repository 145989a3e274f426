//! Extractor worker
//!
//! Runs the pure `extract` module over each fetched page and routes the
//! results: records to the persister, links back to the scheduler.

use crate::crawler::messages::Page;
use crate::extract::{extract, Extraction, Record};
use crate::link::LinkFilter;
use tokio::sync::mpsc;

/// Counts reported by the extractor when it finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractorReport {
    pub pages: u64,
    pub records: u64,
    pub pages_without_record: u64,

    /// Links sent back to the scheduler
    pub links_reported: u64,

    /// Pages whose links arrived after the scheduler had stopped
    pub late_reports: u64,
}

/// Extractor worker: splits each page into links and an optional record
pub struct Extractor {
    filter: LinkFilter,
}

impl Extractor {
    pub fn new(filter: LinkFilter) -> Self {
        Self { filter }
    }

    /// Runs until the page queue is closed and drained
    ///
    /// Records go to the persister. Links are reported by spending the
    /// page's work ticket, so a page's ticket is released only after its
    /// links are queued for the scheduler.
    pub async fn run(
        self,
        mut page_rx: mpsc::Receiver<Page>,
        record_tx: mpsc::Sender<Record>,
    ) -> ExtractorReport {
        let mut report = ExtractorReport::default();

        while let Some(page) = page_rx.recv().await {
            let Page {
                link,
                url,
                body,
                ticket,
            } = page;
            report.pages += 1;

            let Extraction { links, record } = extract(url.as_str(), &body, &self.filter);

            match record.filter(Record::is_valid) {
                Some(record) => {
                    report.records += 1;
                    tracing::debug!("Extracted '{}' from {}", record.name[0], url);
                    if record_tx.send(record).await.is_err() {
                        tracing::warn!("Persister stopped; dropping record from {}", url);
                    }
                }
                None => {
                    report.pages_without_record += 1;
                    tracing::debug!("No movie record on {} ({})", url, link);
                }
            }

            let count = links.len() as u64;
            if ticket.report(links).await {
                report.links_reported += count;
            } else {
                report.late_reports += 1;
                tracing::debug!("Scheduler stopped; discarding {} links from {}", count, url);
            }
        }

        tracing::debug!(
            "Extractor finished: {} pages, {} records",
            report.pages,
            report.records
        );
        report
    }
}
