use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default catalog listing URL (page 1)
pub const DEFAULT_BASE_URL: &str = "https://mangakita.id/manga/";

/// Default User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default output file
pub const DEFAULT_OUTPUT_PATH: &str = "all_manga_details.json";

/// Main configuration structure for Catalog-Crawler
///
/// Every section and key has a default, so an empty TOML document is a
/// valid configuration that targets the compiled-in catalog.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Listing URL for page 1; later pages append `?{page_param}={n}`
    pub base_url: String,

    /// Query parameter carrying the page number
    pub page_param: String,

    /// Pause after each listing page (milliseconds)
    pub listing_delay_ms: u64,

    /// Pause after each detail item, successful or not (milliseconds)
    pub detail_delay_ms: u64,

    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,

    /// Maximum number of listing pages to visit, 0 for no limit
    pub max_pages: u32,

    /// Number of detail pages fetched concurrently
    pub detail_concurrency: u32,

    /// Retries for transient fetch failures, 0 disables retrying
    pub max_retries: u32,

    /// Backoff base for the first retry (milliseconds)
    pub retry_base_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_param: "page".to_string(),
            listing_delay_ms: 1000,
            detail_delay_ms: 500,
            request_timeout_ms: 10_000,
            max_pages: 0,
            detail_concurrency: 1,
            max_retries: 0,
            retry_base_delay_ms: 500,
        }
    }
}

impl CrawlerConfig {
    pub fn listing_delay(&self) -> Duration {
        Duration::from_millis(self.listing_delay_ms)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Page limit as an option, `None` meaning unbounded
    pub fn page_limit(&self) -> Option<u32> {
        (self.max_pages > 0).then_some(self.max_pages)
    }
}

/// Client identity configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// The User-Agent header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON snapshot file
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

/// CSS selectors describing the target site's markup
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Item card on a listing page
    pub item_card: String,

    /// Link inside an item card; the first match is used
    pub item_link: String,

    /// Title element on a detail page
    pub title: String,

    /// Element wrapping the cover image
    pub cover_container: String,

    /// Image inside the cover container
    pub cover_image: String,

    /// Description element
    pub description: String,

    /// Element wrapping the genre links
    pub genre_container: String,

    /// Genre link inside the genre container
    pub genre_link: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item_card: "div.bsx".to_string(),
            item_link: "a".to_string(),
            title: "h1.entry-title".to_string(),
            cover_container: "div.thumb".to_string(),
            cover_image: "img".to_string(),
            description: "div.entry-content.entry-content-single".to_string(),
            genre_container: "div.seriestugenre".to_string(),
            genre_link: "a".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Returns every selector paired with its config key
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("item-card", &self.item_card),
            ("item-link", &self.item_link),
            ("title", &self.title),
            ("cover-container", &self.cover_container),
            ("cover-image", &self.cover_image),
            ("description", &self.description),
            ("genre-container", &self.genre_container),
            ("genre-link", &self.genre_link),
        ]
    }
}
