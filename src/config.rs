use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "https://data-governance.onrender.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
const DEFAULT_PROGRESS_TICK_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the analysis service, without a trailing slash.
    pub service_url: String,
    pub request_timeout: Duration,
    pub progress_tick: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            progress_tick: Duration::from_millis(DEFAULT_PROGRESS_TICK_MS),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_url = lookup("DATA_GUARDIAN_SERVICE_URL")
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

        let timeout_secs = match lookup("DATA_GUARDIAN_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid DATA_GUARDIAN_REQUEST_TIMEOUT_SECS: {}", raw))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let tick_ms = match lookup("DATA_GUARDIAN_PROGRESS_TICK_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid DATA_GUARDIAN_PROGRESS_TICK_MS: {}", raw))?,
            None => DEFAULT_PROGRESS_TICK_MS,
        };
        if tick_ms == 0 {
            anyhow::bail!("DATA_GUARDIAN_PROGRESS_TICK_MS must be greater than zero");
        }

        Ok(Config {
            service_url: service_url.trim().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(timeout_secs),
            progress_tick: Duration::from_millis(tick_ms),
        })
    }

    pub fn upload_url(&self) -> String {
        format!("{}/api/upload", self.service_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.upload_url(), "https://data-governance.onrender.com/api/upload");
        assert_eq!(config.request_timeout, Duration::from_secs(600));
        assert_eq!(config.progress_tick, Duration::from_millis(500));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = Config::from_lookup(lookup(&[(
            "DATA_GUARDIAN_SERVICE_URL",
            "http://localhost:8000/",
        )]))
        .unwrap();
        assert_eq!(config.upload_url(), "http://localhost:8000/api/upload");
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(Config::from_lookup(lookup(&[("DATA_GUARDIAN_REQUEST_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DATA_GUARDIAN_PROGRESS_TICK_MS", "0")])).is_err());
    }
}
