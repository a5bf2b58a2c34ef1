//! Listing page walker
//!
//! Requests listing pages 1, 2, 3, ... in order and hands out the item
//! references found on each. The walk ends on the first page that yields
//! no references or cannot be fetched, and additionally on a configured
//! page limit, on a page that repeats the previous page's references, or
//! on cancellation.

use crate::config::CrawlerConfig;
use crate::crawler::extractor::SiteSelectors;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::retry::{fetch_with_retry, RetryPolicy};
use crate::crawler::signal::StopSignal;
use crate::state::{StopReason, WalkState};
use crate::url::listing_url;
use crate::UrlError;
use std::time::Duration;

/// References discovered on one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// 1-based page index
    pub page: u32,

    /// URL the page was fetched from
    pub url: String,

    /// Item references in document order
    pub references: Vec<String>,
}

/// Result of one walker step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkStep {
    /// A page with at least one reference
    Page(ListingPage),

    /// The walk is over
    Done(StopReason),
}

/// Drives the listing page sequence
pub struct PaginationWalker<'a> {
    fetcher: &'a PageFetcher,
    selectors: &'a SiteSelectors,
    base_url: String,
    page_param: String,
    page_limit: Option<u32>,
    listing_delay: Duration,
    retry: RetryPolicy,
    stop: StopSignal,
    state: WalkState,
    pages_visited: u32,
    previous: Option<Vec<String>>,
}

impl<'a> PaginationWalker<'a> {
    pub fn new(
        fetcher: &'a PageFetcher,
        selectors: &'a SiteSelectors,
        config: &CrawlerConfig,
        stop: StopSignal,
    ) -> Self {
        Self {
            fetcher,
            selectors,
            base_url: config.base_url.clone(),
            page_param: config.page_param.clone(),
            page_limit: config.page_limit(),
            listing_delay: config.listing_delay(),
            retry: RetryPolicy::from_config(config),
            stop,
            state: WalkState::start(),
            pages_visited: 0,
            previous: None,
        }
    }

    /// Current walker state
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Number of listing pages requested so far
    pub fn pages_visited(&self) -> u32 {
        self.pages_visited
    }

    /// Fetches the next listing page and extracts its references
    ///
    /// Once `Done` has been returned, every further call returns the same
    /// `Done` without any network access.
    ///
    /// # Errors
    ///
    /// Only if the configured base URL cannot be turned into a listing URL.
    /// Fetch failures end the walk instead.
    pub async fn next_page(&mut self) -> Result<WalkStep, UrlError> {
        let page = match self.state {
            WalkState::Active { page } => page,
            WalkState::Done { reason } => return Ok(WalkStep::Done(reason)),
        };

        if self.stop.is_triggered() {
            tracing::info!("Stop requested, not requesting listing page {}", page);
            return Ok(self.finish(StopReason::Cancelled));
        }

        if let Some(limit) = self.page_limit {
            if self.pages_visited >= limit {
                tracing::info!("Reached page limit of {}", limit);
                return Ok(self.finish(StopReason::PageLimit));
            }
        }

        let url = listing_url(&self.base_url, &self.page_param, page)?;
        tracing::info!("Processing listing page {}: {}", page, url);
        self.pages_visited += 1;

        let response = match fetch_with_retry(self.fetcher, &url, &self.retry).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Listing page {} failed: {}", page, e);
                return Ok(self.finish(StopReason::FetchFailed));
            }
        };

        let references = self.selectors.listing_from_html(&response.body);

        if references.is_empty() {
            tracing::info!("No items found on {}, stopping", url);
            return Ok(self.finish(StopReason::EmptyPage));
        }

        if self.previous.as_ref() == Some(&references) {
            tracing::warn!(
                "Listing page {} repeats the previous page's {} items, stopping",
                page,
                references.len()
            );
            return Ok(self.finish(StopReason::RepeatedPage));
        }

        self.previous = Some(references.clone());
        self.state = self.state.advance();

        Ok(WalkStep::Page(ListingPage {
            page,
            url,
            references,
        }))
    }

    /// Marks the current page's items as processed
    ///
    /// Applies the listing pause before the next request.
    pub async fn finish_page(&self) {
        self.fetcher.throttle().defer(self.listing_delay).await;
    }

    fn finish(&mut self, reason: StopReason) -> WalkStep {
        self.state = self.state.finish(reason);
        tracing::debug!("Walker is now {}", self.state);
        WalkStep::Done(reason)
    }
}
