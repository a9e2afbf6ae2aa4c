//! HTTP surface: tracking pixel, listing pages and static assets.

pub mod handlers;
pub mod pages;

use crate::adapters::analytics::MeasurementProtocolForwarder;
use crate::adapters::marketplace::MarketplaceEnricher;
use crate::adapters::storage::LocalStorage;
use crate::config::AppConfig;
use crate::core::listing::ListingRenderer;
use crate::core::store::TrackedItemStore;
use crate::core::tracker::Tracker;
use crate::utils::error::Result;
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use url::Url;

/// Shared request-handling state.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Tracker<LocalStorage>>,
    pub listing: Arc<ListingRenderer>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(tracker: Tracker<LocalStorage>, listing: ListingRenderer) -> Self {
        Self {
            tracker: Arc::new(tracker),
            listing: Arc::new(listing),
            started_at: Utc::now(),
        }
    }

    /// Wires the store and the production adapters from configuration.
    ///
    /// Store load problems never fail here; only bad adapter settings do.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let store_path = Path::new(&config.server.store_path);
        let (base_dir, file_name) = match (store_path.parent(), store_path.file_name()) {
            (Some(parent), Some(name)) => (parent.to_path_buf(), name.to_string_lossy().into_owned()),
            _ => (Path::new(".").to_path_buf(), config.server.store_path.clone()),
        };
        let store = Arc::new(TrackedItemStore::load(LocalStorage::new(base_dir), file_name).await);

        let forwarder = MeasurementProtocolForwarder::new(&config.analytics)?;
        let tracker = Tracker::new(
            store,
            Arc::new(forwarder),
            Url::parse(&config.marketplace.item_base_url)?,
            config.analytics.page_title.clone(),
        );

        let enricher = MarketplaceEnricher::new(&config.marketplace)?;
        let listing = ListingRenderer::new(
            Arc::new(enricher),
            config.marketplace.concurrent_requests,
        );

        Ok(Self::new(tracker, listing))
    }
}

pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/home", get(handlers::home))
        .route("/status", get(handlers::status))
        .route("/track", get(handlers::track))
        .route("/current-tags", get(handlers::current_tags))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
