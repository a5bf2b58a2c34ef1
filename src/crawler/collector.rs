//! Detail page collector
//!
//! Fetches each referenced detail page, extracts its record and appends it
//! to the sink. A failed item is skipped. Records are appended in the order
//! their references were discovered, also when several pages are in flight.

use crate::config::CrawlerConfig;
use crate::crawler::extractor::SiteSelectors;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::pagination::ListingPage;
use crate::crawler::retry::{fetch_with_retry, RetryPolicy};
use crate::crawler::signal::StopSignal;
use crate::output::{DetailRecord, OutputError, RecordSink};
use crate::url::resolve_reference;
use futures::stream::{self, StreamExt};
use std::time::Duration;

/// Counts for one batch of references
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectOutcome {
    /// Records appended to the sink
    pub saved: u64,

    /// References that produced no record
    pub failed: u64,
}

/// Turns item references into persisted records
pub struct DetailCollector<'a> {
    fetcher: &'a PageFetcher,
    selectors: &'a SiteSelectors,
    detail_delay: Duration,
    concurrency: usize,
    retry: RetryPolicy,
    stop: StopSignal,
}

impl<'a> DetailCollector<'a> {
    pub fn new(
        fetcher: &'a PageFetcher,
        selectors: &'a SiteSelectors,
        config: &CrawlerConfig,
        stop: StopSignal,
    ) -> Self {
        Self {
            fetcher,
            selectors,
            detail_delay: config.detail_delay(),
            concurrency: config.detail_concurrency.max(1) as usize,
            retry: RetryPolicy::from_config(config),
            stop,
        }
    }

    /// Collects every reference of a listing page into `sink`
    ///
    /// Items not yet started when the stop signal trips are left out.
    ///
    /// # Errors
    ///
    /// A sink error ends the batch immediately; it is fatal for the run.
    pub async fn collect<S>(
        &self,
        page: &ListingPage,
        sink: &mut S,
    ) -> Result<CollectOutcome, OutputError>
    where
        S: RecordSink + ?Sized,
    {
        let mut outcome = CollectOutcome::default();

        // `buffered` yields results in input order regardless of completion order
        let mut results = stream::iter(page.references.iter())
            .take_while(|_| futures::future::ready(!self.stop.is_triggered()))
            .map(|reference| self.collect_one(&page.url, reference))
            .buffered(self.concurrency);

        while let Some(result) = results.next().await {
            match result {
                Some(record) => {
                    let source = record.source_url.clone();
                    sink.append(record)?;
                    outcome.saved += 1;
                    tracing::info!("Saved {} ({} records total)", source, sink.len());
                }
                None => outcome.failed += 1,
            }
        }

        Ok(outcome)
    }

    /// Fetches and extracts one item, `None` if it has to be skipped
    ///
    /// The detail pause is applied whether or not the item succeeded.
    async fn collect_one(&self, page_url: &str, reference: &str) -> Option<DetailRecord> {
        tracing::info!("Scraping details from: {}", reference);

        let record = match resolve_reference(page_url, reference) {
            Ok(target) => match fetch_with_retry(self.fetcher, target.as_str(), &self.retry).await
            {
                Ok(response) => Some(self.selectors.detail_from_html(&response.body, reference)),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", reference, e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Skipping unusable reference {}: {}", reference, e);
                None
            }
        };

        self.fetcher.throttle().defer(self.detail_delay).await;
        record
    }
}
