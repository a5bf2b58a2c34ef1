use crate::config::types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound for `detail-concurrency`
const MAX_DETAIL_CONCURRENCY: u32 = 32;

/// Upper bound for `max-retries`
const MAX_RETRIES: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.page_param.trim().is_empty() {
        return Err(ConfigError::Validation(
            "page-param cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-ms must be greater than 0".to_string(),
        ));
    }

    if config.detail_concurrency < 1 || config.detail_concurrency > MAX_DETAIL_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "detail-concurrency must be between 1 and {}, got {}",
            MAX_DETAIL_CONCURRENCY, config.detail_concurrency
        )));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= {}, got {}",
            MAX_RETRIES, config.max_retries
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }

    // reqwest rejects header values with control characters at build time
    if config.value.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user-agent value cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector compiles
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (key, selector) in config.entries() {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector '{}' cannot be empty",
                key
            )));
        }

        Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;
    }

    Ok(())
}
