use crate::core::store::TrackedItemStore;
use crate::domain::model::{AnalyticsEvent, ItemId};
use crate::domain::ports::{AnalyticsSink, Storage};
use crate::utils::error::{RelayError, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

/// Result of a successful tracking hit.
///
/// `forwarding` is the detached analytics task. Dropping it leaves the task
/// running; awaiting it is only useful in tests.
pub struct TrackOutcome {
    pub id: ItemId,
    pub newly_tracked: bool,
    pub forwarding: JoinHandle<()>,
}

/// Validates a hit, records the item and relays a page view.
pub struct Tracker<S: Storage> {
    store: Arc<TrackedItemStore<S>>,
    analytics: Arc<dyn AnalyticsSink>,
    item_base_url: Url,
    page_title: String,
}

impl<S: Storage> Tracker<S> {
    pub fn new(
        store: Arc<TrackedItemStore<S>>,
        analytics: Arc<dyn AnalyticsSink>,
        item_base_url: Url,
        page_title: impl Into<String>,
    ) -> Self {
        Self {
            store,
            analytics,
            item_base_url,
            page_title: page_title.into(),
        }
    }

    pub fn store(&self) -> &Arc<TrackedItemStore<S>> {
        &self.store
    }

    /// Fails only with a validation error for a missing or malformed id.
    /// Forwarding runs in the background and its failure is only logged.
    pub async fn track(&self, raw_id: Option<&str>) -> Result<TrackOutcome> {
        let raw_id = raw_id.ok_or_else(|| RelayError::ValidationError {
            message: "Item ID is required".to_string(),
        })?;
        let id = ItemId::parse(raw_id)?;

        let newly_tracked = self.store.add(id.clone()).await;
        if newly_tracked {
            tracing::info!("Tracking new item {}", id);
        }

        let page_url = id.item_url(&self.item_base_url)?;
        let event = AnalyticsEvent::page_view(id.clone(), &self.page_title, page_url.as_str());
        let analytics = Arc::clone(&self.analytics);
        let forwarding = tokio::spawn(async move {
            if let Err(e) = analytics.forward(&event).await {
                tracing::warn!("Analytics forwarding failed for item {}: {}", event.item_id, e);
            }
        });

        Ok(TrackOutcome {
            id,
            newly_tracked,
            forwarding,
        })
    }
}
