// Configuration management

use crate::error::{Result, SentryError};
use std::time::Duration;

pub const DEFAULT_WG_EASY_URL: &str = "http://localhost:1228";
pub const DEFAULT_CONTAINER_NAME: &str = "wg-easy";
pub const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub admin_id: i64,
    pub wg_easy_url: String,
    pub container_name: String,
    pub monitor_interval: Duration,
}

impl Config {
    /// Load configuration from the environment, validating required values.
    /// Missing or malformed required variables are a startup failure.
    pub fn from_env() -> Result<Self> {
        let telegram_token = require_env("TELEGRAM_TOKEN")?;

        let admin_id = require_env("ADMIN_ID")?
            .parse::<i64>()
            .map_err(|_| SentryError::Config("ADMIN_ID must be a numeric chat id".to_string()))?;

        let wg_easy_url =
            std::env::var("WG_EASY_URL").unwrap_or_else(|_| DEFAULT_WG_EASY_URL.to_string());

        let container_name =
            std::env::var("CONTAINER_NAME").unwrap_or_else(|_| DEFAULT_CONTAINER_NAME.to_string());

        let interval_secs = match std::env::var("MONITOR_INTERVAL") {
            Ok(raw) => raw.parse::<u64>().ok().filter(|v| *v > 0).ok_or_else(|| {
                SentryError::Config(
                    "MONITOR_INTERVAL must be a positive number of seconds".to_string(),
                )
            })?,
            Err(_) => DEFAULT_MONITOR_INTERVAL_SECS,
        };

        Ok(Self {
            telegram_token,
            admin_id,
            wg_easy_url,
            container_name,
            monitor_interval: Duration::from_secs(interval_secs),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SentryError::Config(format!("{} is not set", name)).into()),
    }
}
