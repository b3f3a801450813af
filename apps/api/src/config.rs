use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::enrichment::DEFAULT_ENRICH_LIMIT;
use crate::github::{FetchSettings, DEFAULT_API_URL};

/// Application configuration loaded from environment variables.
/// Every variable is optional; a present but unparsable value is a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub github_api_url: String,
    /// How many repositories get deep enrichment per request.
    pub enrich_limit: usize,
    pub file_timeout_ms: u64,
    pub contributors_timeout_ms: u64,
    pub max_file_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = FetchSettings::default();
        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            github_api_url: lookup("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            enrich_limit: parse_or(&lookup, "ENRICH_LIMIT", DEFAULT_ENRICH_LIMIT)?,
            file_timeout_ms: parse_or(
                &lookup,
                "GITHUB_FILE_TIMEOUT_MS",
                defaults.file_timeout.as_millis() as u64,
            )?,
            contributors_timeout_ms: parse_or(
                &lookup,
                "GITHUB_CONTRIBUTORS_TIMEOUT_MS",
                defaults.contributors_timeout.as_millis() as u64,
            )?,
            max_file_bytes: parse_or(&lookup, "GITHUB_MAX_FILE_BYTES", defaults.max_file_bytes)?,
        })
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            file_timeout: Duration::from_millis(self.file_timeout_ms),
            contributors_timeout: Duration::from_millis(self.contributors_timeout_ms),
            max_file_bytes: self.max_file_bytes,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
