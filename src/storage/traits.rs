use crate::error::Result;
use async_trait::async_trait;

/// Persistence port: named slots holding serialized values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces whatever the slot held before.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
