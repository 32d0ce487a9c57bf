//! Client configuration from the environment.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LOW_STOCK_THRESHOLD: u64 = stockhub_reports::dashboard::DEFAULT_LOW_STOCK_THRESHOLD;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be an http(s) URL, got '{value}'")]
    InvalidUrl { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend API, without trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request, if set.
    pub token: Option<String>,
    pub timeout: Duration,
    pub low_stock_threshold: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl ClientConfig {
    /// Read `STOCKHUB_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = match get("STOCKHUB_API_URL") {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidUrl {
                        key: "STOCKHUB_API_URL",
                        value: url,
                    });
                }
                url
            }
            None => {
                tracing::warn!("STOCKHUB_API_URL not set; using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            }
        };

        let number = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(key) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                    key,
                    value: raw,
                }),
                None => Ok(default),
            }
        };

        Ok(Self {
            api_url,
            token: get("STOCKHUB_API_TOKEN").map(|t| t.trim().to_string()),
            timeout: Duration::from_secs(number("STOCKHUB_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?),
            low_stock_threshold: number("STOCKHUB_LOW_STOCK_THRESHOLD", DEFAULT_LOW_STOCK_THRESHOLD)?,
        })
    }
}
