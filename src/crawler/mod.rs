//! Crawler module for catalog fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - Rate-limited HTTP fetching and caller-side retry
//! - Listing and detail page extraction
//! - The pagination walk over listing pages
//! - Detail collection into a record sink
//! - Overall crawl coordination

mod collector;
mod coordinator;
mod extractor;
mod fetcher;
mod pagination;
mod retry;
mod signal;
mod throttle;

pub use collector::{CollectOutcome, DetailCollector};
pub use coordinator::{run_crawl, Coordinator};
pub use extractor::SiteSelectors;
pub use fetcher::{build_http_client, FetchError, PageFetcher, RawResponse};
pub use pagination::{ListingPage, PaginationWalker, WalkStep};
pub use retry::{fetch_with_retry, RetryPolicy};
pub use signal::StopSignal;
pub use throttle::Throttle;
