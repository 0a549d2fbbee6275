use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use super::parse_csv;
use crate::config::Config;
use crate::error::LoadError;
use crate::fetch::retry::{retry_async_if, RetryConfig};
use crate::logging::{log_dataset_loaded, log_load_failure, v_str, ProfileScope};
use crate::record::Transaction;

/// Where the raw delimited text comes from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch_text(&self) -> Result<String, LoadError>;
    fn describe(&self) -> String;
}

pub struct HttpSource {
    client: Client,
    url: Url,
    retry: RetryConfig,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration, retry: RetryConfig) -> Result<Self, LoadError> {
        let url = Url::parse(url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url, retry })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, LoadError> {
        Self::new(
            &cfg.dataset_url,
            Duration::from_secs(cfg.fetch_timeout_secs),
            cfg.retry(),
        )
    }

    async fn fetch_once(&self) -> Result<String, LoadError> {
        let resp = self.client.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch_text(&self) -> Result<String, LoadError> {
        retry_async_if(
            &self.retry,
            "fetch_dataset",
            || self.fetch_once(),
            LoadError::is_retryable,
        )
        .await
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch_text(&self) -> Result<String, LoadError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Picks a source for an explicit location, falling back to the configured
/// path, then the configured URL.
pub fn source_for(
    location: Option<&str>,
    cfg: &Config,
) -> Result<Box<dyn DatasetSource>, LoadError> {
    match location {
        Some(loc) if loc.starts_with("http://") || loc.starts_with("https://") => {
            let mut cfg = cfg.clone();
            cfg.dataset_url = loc.to_string();
            Ok(Box::new(HttpSource::from_config(&cfg)?))
        }
        Some(loc) => Ok(Box::new(FileSource::new(loc))),
        None => match &cfg.dataset_path {
            Some(path) => Ok(Box::new(FileSource::new(path.clone()))),
            None => Ok(Box::new(HttpSource::from_config(cfg)?)),
        },
    }
}

/// Fetches and decodes the dataset, surfacing every failure.
pub async fn fetch_dataset(source: &dyn DatasetSource) -> Result<Vec<Transaction>, LoadError> {
    let scope =
        ProfileScope::with_context("fetch_dataset", &[("source", v_str(&source.describe()))]);
    let text = source.fetch_text().await?;
    let records = parse_csv(&text)?;
    log_dataset_loaded(&source.describe(), records.len(), scope.elapsed_ms());
    Ok(records)
}

/// Like [`fetch_dataset`] but never fails: errors are logged and the caller
/// gets an empty dataset, which every aggregation handles.
pub async fn load_dataset(source: &dyn DatasetSource) -> Vec<Transaction> {
    match fetch_dataset(source).await {
        Ok(records) => records,
        Err(err) => {
            log_load_failure(&source.describe(), &err.to_string());
            Vec::new()
        }
    }
}
