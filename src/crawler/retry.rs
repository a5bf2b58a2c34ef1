//! Bounded retry with exponential backoff
//!
//! Retrying is the caller's decision: the walker and the collector wrap
//! `PageFetcher::fetch` with [`fetch_with_retry`]. With the default policy
//! (`max_retries = 0`) a failed request is reported immediately.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchError, PageFetcher, RawResponse};
use std::time::Duration;

/// Upper bound for a single backoff delay
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// How often and how patiently to retry a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay(),
        }
    }

    /// Backoff before retry number `attempt` (1-based)
    ///
    /// `base_delay * 2^(attempt - 1)`, capped at 30 seconds.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Fetches `url`, retrying retryable failures according to `policy`
pub async fn fetch_with_retry(
    fetcher: &PageFetcher,
    url: &str,
    policy: &RetryPolicy,
) -> Result<RawResponse, FetchError> {
    let mut attempt = 0;
    loop {
        match fetcher.fetch(url).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "{} (retry {}/{} in {:?})",
                    e,
                    attempt,
                    policy.max_retries,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
