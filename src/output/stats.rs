//! Crawl summary reporting
//!
//! Prints the end-of-run summary the coordinator assembles from the
//! pipeline workers' reports.

use crate::output::traits::CrawlSummary;

/// Prints a crawl summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Run:");
    println!("  Seed: {}", summary.seed);
    if let Some(started) = summary.started_at {
        println!("  Started: {}", started.to_rfc3339());
    }
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = summary.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!();

    println!("Links:");
    println!("  Budget: {}", summary.budget);
    println!("  Discovered: {}", summary.links_discovered);
    println!("  Scheduled: {}", summary.links_scheduled);
    println!("  Reported by extractor: {}", summary.links_reported);
    if summary.budget_exhausted() {
        println!("  Budget exhausted");
    }
    println!();

    println!("Pages:");
    println!("  Fetched: {}", summary.pages_fetched);
    println!("  Fetch failures: {}", summary.fetch_failures);
    println!("  Without record: {}", summary.pages_without_record);
    println!();

    println!("Records:");
    println!("  Extracted: {}", summary.records_extracted);
    println!("  Written: {}", summary.records_written);
    if summary.write_failures > 0 {
        println!("  Write failures: {}", summary.write_failures);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        summary.fetch_success_rate(),
        summary.pages_fetched,
        summary.pages_fetched + summary.fetch_failures
    );
}
