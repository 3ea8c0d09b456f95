use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Name of the persistence slot holding the history list.
pub const HISTORY_SLOT: &str = "generated-images";

/// One generated image as kept in the history list. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImageRecord {
    pub url: String,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

impl GeneratedImageRecord {
    pub fn new(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            prompt: prompt.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn local_timestamp(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}
