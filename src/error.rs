use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Generation error: {0}")]
    Generation(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Download error: {0}")]
    Download(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("A generation request is already in flight")]
    Busy,
}

impl From<reqwest::Error> for StudioError {
    fn from(e: reqwest::Error) -> Self {
        StudioError::Network(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
