pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod replicate;
pub mod storage;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use app::{ConsoleNotifier, Notifier, PageController, PageState};
pub use config::StudioConfig;
pub use error::{Result, StudioError};
pub use models::{
    GeneratedImageRecord, GenerationOptions, ImageGenerationRequest, ProviderResponse,
    HISTORY_SLOT,
};
pub use replicate::{DownloadClient, ImageClient, ImageDownloader, ImageGenerator, ReplicateClient};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, PersistentList};
pub use ui::{Gallery, GenerationForm, ImageCard};
