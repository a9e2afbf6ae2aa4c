use crate::domain::model::ItemId;
use crate::domain::ports::Storage;
use crate::utils::error::{RelayError, Result};
use tokio::sync::RwLock;

/// Durable, deduplicated list of tracked item ids in discovery order.
///
/// The whole list is rewritten to the backing file after every insertion.
/// The write lock is held across "mutate, then persist" so concurrent
/// insertions cannot interleave their file writes, and readers never see a
/// half-applied mutation.
pub struct TrackedItemStore<S: Storage> {
    storage: S,
    file_name: String,
    items: RwLock<Vec<ItemId>>,
}

impl<S: Storage> TrackedItemStore<S> {
    /// Loads the list from `file_name`, falling back to an empty list when the
    /// file is missing or unreadable.
    ///
    /// Entries that are not valid ids, and duplicates, are dropped; if any were
    /// dropped the cleaned list is written back immediately.
    pub async fn load(storage: S, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();

        let (items, dropped) = match storage.read_file(&file_name).await {
            Ok(bytes) => match decode_items(&bytes) {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::warn!(
                        "Tracked item file {} is corrupt, starting empty: {}",
                        file_name,
                        e
                    );
                    (Vec::new(), 0)
                }
            },
            Err(RelayError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No tracked item file at {}, starting empty", file_name);
                (Vec::new(), 0)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read tracked item file {}, starting empty: {}",
                    file_name,
                    e
                );
                (Vec::new(), 0)
            }
        };

        let store = Self {
            storage,
            file_name,
            items: RwLock::new(items),
        };

        if dropped > 0 {
            tracing::warn!("Dropped {} malformed tracked item entries", dropped);
            let items = store.items.read().await;
            if let Err(e) = store.persist(&items).await {
                tracing::error!("Failed to rewrite cleaned tracked item file: {}", e);
            }
        }

        tracing::info!("Loaded {} tracked items", store.len().await);
        store
    }

    pub async fn contains(&self, id: &ItemId) -> bool {
        self.items.read().await.contains(id)
    }

    /// Appends `id` unless already present. Returns whether it was new.
    ///
    /// A failed write is logged and the in-memory insertion is kept.
    pub async fn add(&self, id: ItemId) -> bool {
        let mut items = self.items.write().await;
        if items.contains(&id) {
            tracing::debug!("Item {} already tracked", id);
            return false;
        }

        items.push(id);
        if let Err(e) = self.persist(&items).await {
            tracing::error!(
                "Failed to persist tracked items to {}: {}",
                self.file_name,
                e
            );
        }
        true
    }

    /// Point-in-time copy of the tracked ids.
    pub async fn snapshot(&self) -> Vec<ItemId> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn persist(&self, items: &[ItemId]) -> Result<()> {
        let data = serde_json::to_vec(items)?;
        tracing::debug!("Writing {} tracked items to {}", items.len(), self.file_name);
        self.storage.write_file(&self.file_name, &data).await
    }
}

/// Parses the stored JSON array, keeping valid unique ids in order.
/// Returns the kept ids and how many entries were discarded.
fn decode_items(bytes: &[u8]) -> Result<(Vec<ItemId>, usize)> {
    let raw: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
    let mut items: Vec<ItemId> = Vec::with_capacity(raw.len());
    let mut dropped = 0;

    for value in raw {
        match value.as_str().map(ItemId::parse) {
            Some(Ok(id)) if !items.contains(&id) => items.push(id),
            _ => dropped += 1,
        }
    }

    Ok((items, dropped))
}
