use std::path::PathBuf;

use crate::fetch::retry::RetryConfig;

/// Published 500-row sample the dashboard was built around.
pub const DEFAULT_DATASET_URL: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/fraud_dataset_500-3SVzIenA0A9O7PFQWj2KKilY2CKcAq.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_url: String,
    /// Local CSV; takes precedence over `dataset_url` when set.
    pub dataset_path: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
    pub fetch_max_retries: u32,
    pub fetch_retry_base_ms: u64,
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            dataset_path: None,
            fetch_timeout_secs: 30,
            fetch_max_retries: 3,
            fetch_retry_base_ms: 200,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Self {
            dataset_url: lookup("DATASET_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(d.dataset_url),
            dataset_path: lookup("DATASET_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            fetch_timeout_secs: lookup("FETCH_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.fetch_timeout_secs),
            fetch_max_retries: lookup("FETCH_MAX_RETRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.fetch_max_retries),
            fetch_retry_base_ms: lookup("FETCH_RETRY_BASE_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.fetch_retry_base_ms),
            export_dir: lookup("EXPORT_DIR").map(PathBuf::from).unwrap_or(d.export_dir),
        }
    }

    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.fetch_max_retries,
            base_delay_ms: self.fetch_retry_base_ms,
            ..RetryConfig::default()
        }
    }
}
