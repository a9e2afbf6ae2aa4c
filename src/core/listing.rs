use crate::domain::model::{DisplayRow, ItemId};
use crate::domain::ports::ItemEnricher;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Pairs each tracked id with its enrichment, keeping snapshot order.
pub struct ListingRenderer {
    enricher: Arc<dyn ItemEnricher>,
    concurrent_requests: usize,
}

impl ListingRenderer {
    pub fn new(enricher: Arc<dyn ItemEnricher>, concurrent_requests: usize) -> Self {
        Self {
            enricher,
            concurrent_requests: concurrent_requests.max(1),
        }
    }

    /// Enriches up to `concurrent_requests` items at a time. An item whose
    /// lookup fails becomes an [`DisplayRow::Unavailable`] row; the rest are
    /// unaffected.
    pub async fn render(&self, items: &[ItemId]) -> Vec<DisplayRow> {
        let rows: Vec<DisplayRow> = stream::iter(items.iter().cloned())
            .map(|id| async move {
                match self.enricher.fetch(&id).await {
                    Some(details) => DisplayRow::Enriched { id, details },
                    None => DisplayRow::Unavailable { id },
                }
            })
            .buffered(self.concurrent_requests)
            .collect()
            .await;

        let unavailable = rows.iter().filter(|row| !row.is_available()).count();
        tracing::debug!(
            "Rendered {} rows ({} without details)",
            rows.len(),
            unavailable
        );
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ItemDetails;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    struct MockEnricher {
        pages: HashMap<String, ItemDetails>,
        delays: HashMap<String, Duration>,
    }

    impl MockEnricher {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                delays: HashMap::new(),
            }
        }

        fn with_item(mut self, id: &str, title: &str) -> Self {
            self.pages.insert(
                id.to_string(),
                ItemDetails {
                    title: title.to_string(),
                    source_url: format!("https://www.ebay.com/itm/{}", id),
                    thumbnail_url: format!("https://i.ebayimg.com/{}.jpg", id),
                },
            );
            self
        }

        fn with_delay(mut self, id: &str, delay: Duration) -> Self {
            self.delays.insert(id.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl ItemEnricher for MockEnricher {
        async fn fetch(&self, id: &ItemId) -> Option<ItemDetails> {
            if let Some(delay) = self.delays.get(id.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            self.pages.get(id.as_str()).cloned()
        }
    }

    fn id(raw: &str) -> ItemId {
        ItemId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_order() {
        let enricher = MockEnricher::new().with_item("200000000002", "Camera");
        let renderer = ListingRenderer::new(Arc::new(enricher), 4);

        let rows = renderer
            .render(&[id("100000000001"), id("200000000002")])
            .await;

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            DisplayRow::Unavailable {
                id: id("100000000001")
            }
        );
        match &rows[1] {
            DisplayRow::Enriched { id: row_id, details } => {
                assert_eq!(row_id.as_str(), "200000000002");
                assert_eq!(details.title, "Camera");
            }
            other => panic!("expected enriched row, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_items_do_not_reorder_rows() {
        let enricher = MockEnricher::new()
            .with_item("100000000001", "Slow")
            .with_item("200000000002", "Fast")
            .with_delay("100000000001", Duration::from_millis(50));
        let renderer = ListingRenderer::new(Arc::new(enricher), 4);

        let rows = renderer
            .render(&[id("100000000001"), id("200000000002")])
            .await;

        let ids: Vec<&str> = rows.iter().map(|row| row.id().as_str()).collect();
        assert_eq!(ids, vec!["100000000001", "200000000002"]);
        assert!(rows.iter().all(DisplayRow::is_available));
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let renderer = ListingRenderer::new(Arc::new(MockEnricher::new()), 0);
        assert!(renderer.render(&[]).await.is_empty());
    }
}
