use crate::{
    error::{Result, StudioError},
    replicate::traits::ImageDownloader,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use futures::StreamExt;
use reqwest::Client;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

#[derive(Clone)]
pub struct DownloadClient {
    client: Client,
    download_dir: PathBuf,
}

impl DownloadClient {
    pub fn new(client: Client, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    async fn fetch_into<W: Write + Send>(&self, url: &str, file: &mut W) -> Result<u64> {
        if let Some(data_url) = url.strip_prefix("data:") {
            let bytes = decode_data_url(data_url)?;
            file.write_all(&bytes).map_err(write_error)?;
            return Ok(bytes.len() as u64);
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StudioError::Download(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(StudioError::Download(format!(
                "Fetching {} returned status {}",
                url,
                response.status()
            )));
        }

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                StudioError::Download(format!("Download of {} interrupted: {}", url, e))
            })?;
            file.write_all(&chunk).map_err(write_error)?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }
}

#[async_trait]
impl ImageDownloader for DownloadClient {
    async fn download(&self, url: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(write_error)?;

        // Dropping the staged file on any early return deletes it.
        let mut staged = NamedTempFile::new_in(&self.download_dir).map_err(write_error)?;
        let written = {
            let mut writer = BufWriter::new(staged.as_file_mut());
            let written = self.fetch_into(url, &mut writer).await?;
            writer.flush().map_err(write_error)?;
            written
        };

        let target = persist_unique(staged, &self.download_dir)?;
        log::info!("💾 Saved {} bytes to {}", written, target.display());
        Ok(target)
    }
}

/// Moves the staged file to `generated-image-<ms>.png`, never replacing an
/// existing image; a name already taken gets a random suffix.
fn persist_unique(staged: NamedTempFile, dir: &Path) -> Result<PathBuf> {
    let stamp = Utc::now().timestamp_millis();
    let target = dir.join(format!("generated-image-{}.png", stamp));

    match staged.persist_noclobber(&target) {
        Ok(_) => Ok(target),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            let suffix = Uuid::new_v4().simple().to_string();
            let target = dir.join(format!("generated-image-{}-{}.png", stamp, &suffix[..8]));
            e.file
                .persist_noclobber(&target)
                .map_err(|e| write_error(e.error))?;
            Ok(target)
        }
        Err(e) => Err(write_error(e.error)),
    }
}

fn write_error(e: std::io::Error) -> StudioError {
    StudioError::Download(format!("Failed to save image: {}", e))
}

/// Decodes the part of a `data:` URL after the scheme. Only base64 payloads are accepted.
fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| StudioError::Download("Malformed data URL".into()))?;

    if !header.ends_with(";base64") {
        return Err(StudioError::Download(
            "Only base64 data URLs are supported".into(),
        ));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|e| StudioError::Download(format!("Invalid base64 image data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::unreachable_url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn saved_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .map(|entries| entries.map(|entry| entry.unwrap().path()).collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    fn data_url(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    #[tokio::test]
    async fn test_download_saves_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(b"\x89PNG fake image".to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let client = DownloadClient::new(Client::new(), dir.path());

        let path = client
            .download(&format!("{}/img.png", server.uri()))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG fake image");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("generated-image-"));
        assert!(name.ends_with(".png"));
        assert_eq!(saved_files(dir.path()), vec![path.clone()]);
    }

    #[tokio::test]
    async fn test_unreachable_url_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let client = DownloadClient::new(Client::new(), dir.path());

        let err = client
            .download(&format!("{}/img.png", unreachable_url().await))
            .await
            .unwrap_err();

        assert!(matches!(err, StudioError::Download(_)));
        assert!(saved_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_not_found_saves_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let client = DownloadClient::new(Client::new(), dir.path());

        let err = client
            .download(&format!("{}/img.png", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, StudioError::Download(_)));
        assert!(saved_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_data_url_is_decoded_locally() {
        let dir = tempfile::tempdir().unwrap();
        let client = DownloadClient::new(Client::new(), dir.path().join("out"));

        let path = client.download(&data_url(b"pixels")).await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"pixels");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_simultaneous_downloads_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let client = DownloadClient::new(Client::new(), dir.path());
        let (url_a, url_b) = (data_url(b"first image"), data_url(b"second image"));

        for _ in 0..25 {
            let (a, b) = tokio::join!(client.download(&url_a), client.download(&url_b));
            let (a, b) = (a.unwrap(), b.unwrap());

            assert_ne!(a, b);
            assert_eq!(std::fs::read(&a).unwrap(), b"first image");
            assert_eq!(std::fs::read(&b).unwrap(), b"second image");
        }
        assert_eq!(saved_files(dir.path()).len(), 50);
    }

    #[test]
    fn test_taken_name_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let first = NamedTempFile::new_in(dir.path()).unwrap();
        let second = NamedTempFile::new_in(dir.path()).unwrap();

        let a = persist_unique(first, dir.path()).unwrap();
        let b = persist_unique(second, dir.path()).unwrap();

        assert_ne!(a, b);
        assert!(a.exists() && b.exists());
    }

    #[test]
    fn test_rejects_non_base64_data_url() {
        assert!(decode_data_url("text/plain,hello").is_err());
        assert!(decode_data_url("image/png;base64").is_err());
        assert!(decode_data_url("image/png;base64,@@@").is_err());
    }
}
