use crate::error::{Result, StudioError};
use crate::logger::LogLevel;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_DATA_DIR: &str = ".imagegen";

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub download_dir: PathBuf,
    pub log_level: String,
    pub log_json: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            download_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            log_json: false,
            log_file: None,
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = env::var("IMAGEGEN_API_URL").unwrap_or(defaults.api_url);
        let data_dir = env::var("IMAGEGEN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let download_dir = env::var("IMAGEGEN_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);
        let log_level = env::var("IMAGEGEN_LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_json = env::var("IMAGEGEN_LOG_JSON")
            .ok()
            .map_or(false, |val| val == "true");
        let log_file = env::var("IMAGEGEN_LOG_FILE").ok().map(PathBuf::from);

        StudioConfig {
            api_url,
            data_dir,
            download_dir,
            log_level,
            log_json,
            log_file,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_download_dir(mut self, download_dir: impl Into<PathBuf>) -> Self {
        self.download_dir = download_dir.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(StudioError::Config(format!(
                "API URL must start with http:// or https://, got {}",
                self.api_url
            )));
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<LogLevel> {
        self.log_level.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StudioConfig::new();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = StudioConfig::new().with_api_url("ftp://example.com");
        assert!(matches!(config.validate(), Err(StudioError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let config = StudioConfig::new().with_log_level("loud");
        assert!(matches!(config.validate(), Err(StudioError::Config(_))));
    }

    #[test]
    fn test_builder_overrides() {
        let config = StudioConfig::new()
            .with_api_url("https://images.example.com")
            .with_data_dir("/tmp/history")
            .with_download_dir("/tmp/out")
            .with_log_level("debug");
        assert_eq!(config.api_url, "https://images.example.com");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/history"));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.level().unwrap(), LogLevel::Debug);
    }
}
