pub mod file;
pub mod memory;
pub mod traits;

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use traits::KeyValueStore;

/// An ordered list persisted as one JSON array under a single slot.
///
/// Storage and serialization failures never escape: reads fall back to the
/// default value and failed writes are logged, leaving the caller's in-memory
/// copy as the only source of truth for the rest of the session.
pub struct PersistentList<T> {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    default: Vec<T>,
}

impl<T> PersistentList<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>, default: Vec<T>) -> Self {
        Self {
            backend,
            key: key.into(),
            default,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn read(&self) -> Vec<T> {
        let raw = match self.backend.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return self.default.clone(),
            Err(e) => {
                log::warn!("Failed to read slot {}: {}", self.key, e);
                return self.default.clone();
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Slot {} holds malformed data, using default: {}", self.key, e);
                return self.default.clone();
            }
        };

        // One bad entry drops only itself.
        let total = entries.len();
        let items: Vec<T> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        if items.len() < total {
            log::warn!(
                "Skipped {} malformed entries in slot {}",
                total - items.len(),
                self.key
            );
        }
        items
    }

    pub async fn write(&self, items: &[T]) {
        let raw = match serde_json::to_string(items) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to serialize slot {}: {}", self.key, e);
                return;
            }
        };

        if let Err(e) = self.backend.set(&self.key, &raw).await {
            log::warn!("Failed to persist slot {}: {}", self.key, e);
        }
    }
}
