//! URL handling module for Catalog-Crawler
//!
//! This module builds listing page URLs from the catalog base URL and
//! resolves item references (which may be relative) into fetchable URLs.

use crate::{UrlError, UrlResult};
use url::Url;

/// Builds the URL of a listing page
///
/// Page 1 is the bare catalog URL exactly as configured. Page `n > 1`
/// appends `{page_param}={n}` to the query string.
///
/// # Examples
///
/// ```
/// use catalog_crawler::url::listing_url;
///
/// let base = "https://example.test/manga/";
/// assert_eq!(listing_url(base, "page", 1).unwrap(), base);
/// assert_eq!(
///     listing_url(base, "page", 3).unwrap(),
///     "https://example.test/manga/?page=3"
/// );
/// ```
pub fn listing_url(base_url: &str, page_param: &str, page: u32) -> UrlResult<String> {
    let mut url = parse_http_url(base_url)?;

    if page <= 1 {
        return Ok(base_url.to_string());
    }

    url.query_pairs_mut()
        .append_pair(page_param, &page.to_string());

    Ok(url.to_string())
}

/// Resolves an item reference against the page it was found on
///
/// Absolute references are returned as-is (after parsing); relative ones
/// are joined onto `page_url`. Only http and https results are accepted.
pub fn resolve_reference(page_url: &str, reference: &str) -> UrlResult<Url> {
    let base = parse_http_url(page_url)?;
    let reference = reference.trim();

    let resolved = base.join(reference).map_err(|_| UrlError::Unresolvable {
        reference: reference.to_string(),
        base: page_url.to_string(),
    })?;

    match resolved.scheme() {
        "http" | "https" => Ok(resolved),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

fn parse_http_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}
