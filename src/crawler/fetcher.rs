//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests, each preceded by the shared throttle
//! - Error classification into transport and HTTP status failures
//!
//! No retrying happens here; see `retry` for the caller-side policy.

use crate::config::{Config, UserAgentConfig};
use crate::crawler::throttle::Throttle;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// A successful (2xx) response
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Response body, decoded as text
    pub body: String,
}

/// Why a fetch failed
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connection, TLS, timeout or body read failure
    #[error("request to {url} failed: {message}")]
    Transport {
        url: String,
        message: String,
        timed_out: bool,
    },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    /// The URL that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::HttpStatus { url, .. } => url,
        }
    }

    /// Returns true if the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }

    /// Returns true if repeating the request may succeed
    ///
    /// | Condition | Retryable |
    /// |-----------|-----------|
    /// | Transport failure | yes |
    /// | HTTP 429 | yes |
    /// | HTTP 5xx | yes |
    /// | Other status | no |
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::HttpStatus { status, .. } => *status == 429 || (500..600).contains(status),
        }
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timeout".to_string()
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else {
            error.to_string()
        };

        Self::Transport {
            url: url.to_string(),
            message,
            timed_out: error.is_timeout(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Overall per-request timeout, also used as connect timeout
///
/// # Example
///
/// ```no_run
/// use catalog_crawler::config::UserAgentConfig;
/// use catalog_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.value.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues rate-limited GET requests
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    throttle: Throttle,
}

impl PageFetcher {
    pub fn new(client: Client, throttle: Throttle) -> Self {
        Self { client, throttle }
    }

    /// Builds a fetcher with a fresh throttle from the crawler configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout())?;
        Ok(Self::new(client, Throttle::new()))
    }

    /// The throttle every request of this fetcher passes through
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Fetches a URL
    ///
    /// Waits for the throttle, then sends one GET request. Any non-2xx
    /// status is returned as `FetchError::HttpStatus`.
    pub async fn fetch(&self, url: &str) -> Result<RawResponse, FetchError> {
        self.throttle.wait_turn().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(RawResponse {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}
