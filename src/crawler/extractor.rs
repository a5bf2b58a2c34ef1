//! HTML extraction for listing and detail pages
//!
//! Listing pages yield the detail links of their item cards. Detail pages
//! yield a `DetailRecord`. Extraction never fails: an element that is not
//! where the selectors expect it leaves its field at the placeholder value,
//! so a redesigned page produces a partial record instead of no record.

use crate::config::SelectorConfig;
use crate::output::{or_not_available, DetailRecord};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Compiled selectors for one site
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    item_card: Selector,
    item_link: Selector,
    title: Selector,
    cover_container: Selector,
    cover_image: Selector,
    description: Selector,
    genre_container: Selector,
    genre_link: Selector,
}

impl SiteSelectors {
    /// Compiles the configured selectors
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            item_card: compile(&config.item_card)?,
            item_link: compile(&config.item_link)?,
            title: compile(&config.title)?,
            cover_container: compile(&config.cover_container)?,
            cover_image: compile(&config.cover_image)?,
            description: compile(&config.description)?,
            genre_container: compile(&config.genre_container)?,
            genre_link: compile(&config.genre_link)?,
        })
    }

    /// Extracts item references from a listing page, in document order
    ///
    /// For each item card the first link inside it is taken; a card whose
    /// first link has no `href` contributes nothing. An empty result means
    /// the page has no item cards.
    pub fn extract_listing(&self, document: &Html) -> Vec<String> {
        let mut references = Vec::new();
        let mut cards = 0usize;

        for card in document.select(&self.item_card) {
            cards += 1;
            match card
                .select(&self.item_link)
                .next()
                .and_then(|link| link.value().attr("href"))
            {
                Some(href) => references.push(href.to_string()),
                None => tracing::debug!("Item card #{} has no link", cards),
            }
        }

        if cards == 0 {
            tracing::debug!("No item cards found on listing page");
        } else if references.len() < cards {
            tracing::warn!(
                "{} of {} item cards on listing page have no link",
                cards - references.len(),
                cards
            );
        }

        references
    }

    /// Extracts a detail record from a detail page
    ///
    /// `source_url` is stored verbatim in the record.
    pub fn extract_detail(&self, document: &Html, source_url: &str) -> DetailRecord {
        let title = first_text(document, &self.title);
        if title.is_none() {
            tracing::debug!("{}: title not found", source_url);
        }

        let cover_url = document
            .select(&self.cover_container)
            .next()
            .and_then(|container| container.select(&self.cover_image).next())
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);
        if cover_url.is_none() {
            tracing::debug!("{}: cover image not found", source_url);
        }

        let description = first_text(document, &self.description);
        if description.is_none() {
            tracing::debug!("{}: description not found", source_url);
        }

        let genres = match document.select(&self.genre_container).next() {
            Some(container) => container
                .select(&self.genre_link)
                .map(|link| element_text(&link))
                .collect(),
            None => {
                tracing::debug!("{}: genre list not found", source_url);
                Vec::new()
            }
        };

        DetailRecord {
            title: or_not_available(title),
            cover_url: or_not_available(cover_url),
            description: or_not_available(description),
            genres,
            // The site exposes no rating data in-page
            rating: None,
            total_ratings: None,
            source_url: source_url.to_string(),
        }
    }

    /// Parses `html` and extracts its item references
    pub fn listing_from_html(&self, html: &str) -> Vec<String> {
        self.extract_listing(&Html::parse_document(html))
    }

    /// Parses `html` and extracts its detail record
    pub fn detail_from_html(&self, html: &str, source_url: &str) -> DetailRecord {
        self.extract_detail(&Html::parse_document(html), source_url)
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Trimmed text of the first element matching `selector`
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|element| element_text(&element))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
