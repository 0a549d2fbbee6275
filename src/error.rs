use std::io;

use thiserror::Error;

/// Failures while acquiring or decoding the dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dataset endpoint returned status {0}")]
    Status(u16),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid dataset url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("dataset has no header row")]
    MissingHeader,
}

impl LoadError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::Http(err) => crate::fetch::retry::is_retryable_network_error(err),
            LoadError::Status(code) => crate::fetch::retry::is_retryable_http_error(*code),
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: dataset is empty")]
    Empty,
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
