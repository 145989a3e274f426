//! Messages passed between pipeline stages
//!
//! Every link in flight carries a [`WorkTicket`]: a clone of the discovered
//! queue's sender. The discovered queue stays open exactly as long as some
//! ticket is alive, so the scheduler sees it close once no fetched page can
//! report links any more.

use tokio::sync::mpsc;
use url::Url;

/// A batch of links found on one page, plus the ticket that page carried
#[derive(Debug)]
pub struct Discovery {
    pub links: Vec<String>,

    /// Kept alive until the scheduler has processed the batch
    pub ticket: WorkTicket,
}

/// Keeps the discovered queue open while a link is in flight
#[derive(Debug, Clone)]
pub struct WorkTicket {
    tx: mpsc::Sender<Discovery>,
}

impl WorkTicket {
    pub(crate) fn new(tx: mpsc::Sender<Discovery>) -> Self {
        Self { tx }
    }

    /// Issues a ticket for a newly dispatched link
    pub(crate) fn issue(&self) -> Self {
        self.clone()
    }

    /// Spends the ticket by reporting a page's links to the scheduler
    ///
    /// Returns false if the scheduler has already stopped listening.
    pub async fn report(self, links: Vec<String>) -> bool {
        let tx = self.tx.clone();
        tx.send(Discovery { links, ticket: self }).await.is_ok()
    }
}

/// A link the scheduler dispatched for fetching
#[derive(Debug)]
pub struct TodoLink {
    /// The link as discovered
    pub link: String,

    /// Canonical absolute URL
    pub url: Url,

    pub ticket: WorkTicket,
}

/// A successfully fetched page
#[derive(Debug)]
pub struct Page {
    pub link: String,

    /// URL the page was requested from
    pub url: Url,

    pub body: String,

    pub ticket: WorkTicket,
}
