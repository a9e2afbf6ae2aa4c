use crate::domain::model::{AnalyticsEvent, ItemDetails, ItemId};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Byte-level backing store for the tracked-item file.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Best-effort relay of tracking events to an external collector.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn forward(&self, event: &AnalyticsEvent) -> Result<()>;
}

/// Looks up display metadata for an item.
///
/// `None` is the normal outcome when the remote page is unreachable or its
/// markup no longer matches; implementations log the cause themselves.
#[async_trait]
pub trait ItemEnricher: Send + Sync {
    async fn fetch(&self, id: &ItemId) -> Option<ItemDetails>;
}
