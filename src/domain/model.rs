use crate::utils::error::{RelayError, Result};
use crate::utils::validation::is_valid_item_id;
use serde::Serialize;
use std::fmt;
use url::Url;

/// A validated marketplace item identifier.
///
/// Construction goes through [`ItemId::parse`], so holding one means the
/// value already passed the identifier check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn parse(raw: &str) -> Result<Self> {
        if !is_valid_item_id(raw) {
            return Err(RelayError::ValidationError {
                message: format!("Invalid item ID: {:?}", raw),
            });
        }
        Ok(Self(raw.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical item page URL under `base` (which should end with `/`).
    pub fn item_url(&self, base: &Url) -> Result<Url> {
        Ok(base.join(&self.0)?)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display metadata scraped from an item page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub title: String,
    pub source_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    pub item_id: ItemId,
    pub event_name: String,
    pub page_title: String,
    pub page_url: String,
    pub timestamp_micros: i64,
}

impl AnalyticsEvent {
    pub const PAGE_VIEW: &'static str = "page_view";

    pub fn page_view(item_id: ItemId, page_title: &str, page_url: &str) -> Self {
        Self {
            item_id,
            event_name: Self::PAGE_VIEW.to_string(),
            page_title: page_title.to_string(),
            page_url: page_url.to_string(),
            timestamp_micros: chrono::Utc::now().timestamp_micros(),
        }
    }
}

/// One row of the enriched listing, in snapshot order.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRow {
    Enriched { id: ItemId, details: ItemDetails },
    Unavailable { id: ItemId },
}

impl DisplayRow {
    pub fn id(&self) -> &ItemId {
        match self {
            DisplayRow::Enriched { id, .. } | DisplayRow::Unavailable { id } => id,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DisplayRow::Enriched { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_validates() {
        let id = ItemId::parse(" 110445512345\n").unwrap();
        assert_eq!(id.as_str(), "110445512345");

        let err = ItemId::parse("abc").unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_item_url_joins_base() {
        let base = Url::parse("https://www.ebay.com/itm/").unwrap();
        let id = ItemId::parse("110445512345").unwrap();
        assert_eq!(
            id.item_url(&base).unwrap().as_str(),
            "https://www.ebay.com/itm/110445512345"
        );
    }

    #[test]
    fn test_item_id_serializes_as_plain_string() {
        let ids = vec![ItemId::parse("110445512345").unwrap()];
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"["110445512345"]"#);
    }

    #[test]
    fn test_page_view_event() {
        let id = ItemId::parse("110445512345").unwrap();
        let event = AnalyticsEvent::page_view(
            id.clone(),
            "eBay Listing",
            "https://www.ebay.com/itm/110445512345",
        );
        assert_eq!(event.item_id, id);
        assert_eq!(event.event_name, "page_view");
        assert!(event.timestamp_micros > 0);
    }
}
