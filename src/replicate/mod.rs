pub mod download;
pub mod image_client;
pub mod traits;

use crate::{config::StudioConfig, error::Result};
use reqwest::Client;

pub use download::DownloadClient;
pub use image_client::ImageClient;
pub use traits::{ImageDownloader, ImageGenerator};

/// HTTP clients for the generation backend, sharing one connection pool.
#[derive(Clone)]
pub struct ReplicateClient {
    image_client: ImageClient,
    download_client: DownloadClient,
}

impl ReplicateClient {
    pub fn new(config: &StudioConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("imagegen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            image_client: ImageClient::new(client.clone(), &config.api_url),
            download_client: DownloadClient::new(client, config.download_dir.clone()),
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn download(&self) -> &DownloadClient {
        &self.download_client
    }
}
