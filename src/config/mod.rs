//! Configuration module for Catalog-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; missing ones fall back to the documented defaults.
//!
//! # Example
//!
//! ```no_run
//! use catalog_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawling from: {}", config.crawler.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SelectorConfig, UserAgentConfig, DEFAULT_BASE_URL,
    DEFAULT_OUTPUT_PATH, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
