use crate::{
    error::Result,
    models::{GeneratedImageRecord, GenerationOptions},
};
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Sends one generation request and maps the first returned image to a record.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedImageRecord>;
}

#[async_trait]
pub trait ImageDownloader: Send + Sync {
    /// Saves the image behind `url` locally and returns the saved file's path.
    async fn download(&self, url: &str) -> Result<PathBuf>;
}
