//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the pipeline together:
//! - The walker hands out the references of one listing page at a time
//! - The collector turns them into records and appends them to the sink
//! - The listing pause is applied once a page's items are done
//! - The run ends on the walker's stop reason or on a sink error

use crate::config::{validate, Config};
use crate::crawler::collector::DetailCollector;
use crate::crawler::extractor::SiteSelectors;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::pagination::{PaginationWalker, WalkStep};
use crate::crawler::signal::StopSignal;
use crate::output::{CrawlReport, JsonSnapshotStore, RecordSink};
use crate::CrawlerError;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: PageFetcher,
    selectors: SiteSelectors,
    stop: StopSignal,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, compiles the selectors and builds the
    /// HTTP client.
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        Self::with_stop_signal(config, StopSignal::new())
    }

    /// Creates a coordinator that stops when `stop` is triggered
    pub fn with_stop_signal(config: Config, stop: StopSignal) -> Result<Self, CrawlerError> {
        validate(&config)?;
        let selectors = SiteSelectors::from_config(&config.selectors)?;
        let fetcher = PageFetcher::from_config(&config)?;

        Ok(Self {
            config,
            fetcher,
            selectors,
            stop,
        })
    }

    /// Handle for cancelling the run
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the crawl, appending every collected record to `sink`
    ///
    /// The sink is not finalized here; the caller owns it.
    pub async fn run<S>(&self, sink: &mut S) -> Result<CrawlReport, CrawlerError>
    where
        S: RecordSink + ?Sized,
    {
        let crawler_config = &self.config.crawler;
        tracing::info!("Starting crawl at {}", crawler_config.base_url);

        let mut report = CrawlReport::start();
        let mut walker = PaginationWalker::new(
            &self.fetcher,
            &self.selectors,
            crawler_config,
            self.stop.clone(),
        );
        let collector = DetailCollector::new(
            &self.fetcher,
            &self.selectors,
            crawler_config,
            self.stop.clone(),
        );

        let reason = loop {
            let page = match walker.next_page().await? {
                WalkStep::Page(page) => page,
                WalkStep::Done(reason) => break reason,
            };

            tracing::info!(
                "Found {} items on listing page {}",
                page.references.len(),
                page.page
            );
            report.references_discovered += page.references.len() as u64;

            let outcome = match collector.collect(&page, &mut *sink).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Failed to persist records, aborting run: {}", e);
                    return Err(e.into());
                }
            };
            report.records_saved += outcome.saved;
            report.items_failed += outcome.failed;

            if !self.stop.is_triggered() {
                walker.finish_page().await;
            }
        };

        report.pages_visited = walker.pages_visited();
        report.finish(reason);

        if reason.is_natural_end() {
            tracing::info!(
                "Crawl finished ({}): {} records from {} listing pages, {} items failed",
                reason,
                report.records_saved,
                report.pages_visited,
                report.items_failed
            );
        } else {
            tracing::warn!(
                "Crawl stopped early ({}): {} records from {} listing pages, {} items failed",
                reason,
                report.records_saved,
                report.pages_visited,
                report.items_failed
            );
        }

        Ok(report)
    }
}

/// Runs a complete crawl into the configured JSON output file
///
/// The snapshot is finalized on success, so the output file exists even
/// when nothing was collected.
///
/// # Example
///
/// ```no_run
/// use catalog_crawler::config::Config;
/// use catalog_crawler::crawler::{run_crawl, StopSignal};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default(), StopSignal::new()).await?;
/// println!("saved {} records", report.records_saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, stop: StopSignal) -> Result<CrawlReport, CrawlerError> {
    let coordinator = Coordinator::with_stop_signal(config, stop)?;
    let mut store = JsonSnapshotStore::new(&coordinator.config().output.path);

    let report = coordinator.run(&mut store).await?;
    store.finalize()?;

    tracing::info!(
        "{} records saved to {}",
        store.len(),
        store.path().display()
    );

    Ok(report)
}
