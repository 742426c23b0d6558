//! Application configuration
//!
//! Read once at startup from the process environment.

use crate::error::{AppError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1/";
pub const DEFAULT_DATA_DIR: &str = ".stockwatch";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Finnhub API key sent as the `token` query parameter
    pub api_key: String,
    /// Base URL all endpoints are joined onto (must end with `/`)
    pub base_url: String,
    /// Directory holding the preferences database
    pub data_dir: PathBuf,
    /// Request timeout; `None` keeps the transport default
    pub http_timeout: Option<Duration>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sandbox = lookup("FINNHUB_SANDBOX")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let key_var = if sandbox {
            "FINNHUB_SANDBOX_API_KEY"
        } else {
            "FINNHUB_API_KEY"
        };

        let api_key = lookup(key_var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Config(format!("{} is not set", key_var)))?;

        let mut base_url = lookup("FINNHUB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let data_dir = lookup("STOCKWATCH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let http_timeout = match lookup("STOCKWATCH_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    AppError::Config(format!("Invalid STOCKWATCH_HTTP_TIMEOUT_SECS '{}': {}", raw, e))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_key,
            base_url,
            data_dir,
            http_timeout,
        })
    }

    /// Path of the preferences database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("preferences.db")
    }
}
