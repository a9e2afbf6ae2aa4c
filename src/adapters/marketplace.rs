//! Item enrichment by scraping the marketplace's public item pages.
//!
//! The selectors are tied to third-party markup and break without notice, so
//! every failure here degrades to "no details" rather than an error.

use crate::config::MarketplaceConfig;
use crate::domain::model::{ItemDetails, ItemId};
use crate::domain::ports::ItemEnricher;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

pub struct MarketplaceEnricher {
    client: Client,
    item_base_url: Url,
    title_selector: Selector,
    image_selector: Selector,
}

impl MarketplaceEnricher {
    pub fn new(config: &MarketplaceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            item_base_url: Url::parse(&config.item_base_url)?,
            title_selector: parse_selector("marketplace.title_selector", &config.title_selector)?,
            image_selector: parse_selector("marketplace.image_selector", &config.image_selector)?,
        })
    }

    async fn try_fetch(&self, id: &ItemId) -> Result<ItemDetails> {
        let page_url = id.item_url(&self.item_base_url)?;
        tracing::debug!("Fetching item page {}", page_url);

        let response = self
            .client
            .get(page_url.clone())
            .send()
            .await
            .map_err(|e| RelayError::EnrichmentError {
                item_id: id.to_string(),
                message: format!("item page request failed: {}", e),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::EnrichmentError {
                item_id: id.to_string(),
                message: format!("item page responded with {}", status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RelayError::EnrichmentError {
                item_id: id.to_string(),
                message: format!("failed to read item page: {}", e),
            })?;
        extract_details(&body, &page_url, &self.title_selector, &self.image_selector).ok_or_else(
            || RelayError::EnrichmentError {
                item_id: id.to_string(),
                message: "title or thumbnail not found in page markup".to_string(),
            },
        )
    }
}

#[async_trait]
impl ItemEnricher for MarketplaceEnricher {
    async fn fetch(&self, id: &ItemId) -> Option<ItemDetails> {
        match self.try_fetch(id).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!("Details unavailable for item {}: {}", id, e);
                None
            }
        }
    }
}

fn parse_selector(field: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| RelayError::InvalidConfigValueError {
        field: field.to_string(),
        value: selector.to_string(),
        reason: format!("Invalid CSS selector: {}", e),
    })
}

/// Pulls the title text and first thumbnail out of an item page.
///
/// Relative image URLs are resolved against `page_url`.
pub fn extract_details(
    html: &str,
    page_url: &Url,
    title_selector: &Selector,
    image_selector: &Selector,
) -> Option<ItemDetails> {
    let document = Html::parse_document(html);

    let title = document
        .select(title_selector)
        .map(|el| normalize_ws(&el.text().collect::<String>()))
        .find(|text| !text.is_empty())?;

    let image = document.select(image_selector).next()?;
    let src = ["src", "data-src"]
        .iter()
        .filter_map(|attr| image.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty())?;
    let thumbnail_url = page_url.join(src).ok()?;

    Some(ItemDetails {
        title,
        source_url: page_url.to_string(),
        thumbnail_url: thumbnail_url.to_string(),
    })
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
