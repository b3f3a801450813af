//! GitHub REST client. Every call goes through [`GitHubClient`].
//!
//! Callers pass the user's token explicitly on every call; the client never
//! stores it. Enrichment-level fetches (files, contributors, languages) fail
//! open and return absent values. Listing and profile calls return errors,
//! because a request cannot proceed without them.
use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub mod content;
pub mod contributors;
pub mod handlers;
pub mod profile;
pub mod repos;

#[cfg(test)]
pub(crate) mod mock;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("gitresume-api/", env!("CARGO_PKG_VERSION"));

/// Page size for every paginated endpoint.
pub const PER_PAGE: usize = 100;
/// Hard cap on pages fetched from any paginated endpoint.
pub const MAX_PAGES: u32 = 3;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub returned status {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Request to {path} timed out after {timeout_ms}ms")]
    Timeout { path: String, timeout_ms: u128 },

    #[error("A GitHub access token is required")]
    MissingCredential,

    #[error("A GitHub username is required")]
    MissingUsername,

    #[error("No repositories found for '{0}'")]
    NoRepositories(String),
}

/// Timeouts and size ceilings applied to individual requests.
#[derive(Debug, Clone, Copy)]
pub struct FetchSettings {
    pub file_timeout: Duration,
    pub contributors_timeout: Duration,
    pub max_file_bytes: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            file_timeout: Duration::from_millis(5_000),
            contributors_timeout: Duration::from_millis(10_000),
            max_file_bytes: 1024 * 1024,
        }
    }
}

/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    settings: FetchSettings,
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, settings: FetchSettings) -> Result<Self, GitHubError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings,
        })
    }

    pub fn settings(&self) -> FetchSettings {
        self.settings
    }

    /// GETs `path` and deserializes the JSON body. The whole exchange (send +
    /// body) runs under `timeout`; expiry drops the in-flight request.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &str,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, GitHubError> {
        let request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(credential)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .query(query);

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(GitHubError::Status {
                    status: status.as_u16(),
                    path: path.to_string(),
                });
            }
            Ok::<T, GitHubError>(response.json::<T>().await?)
        };

        let result = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| GitHubError::Timeout {
                path: path.to_string(),
                timeout_ms: timeout.as_millis(),
            })?;

        if let Err(e) = &result {
            debug!("GitHub request failed: {e}");
        }
        result
    }
}

/// Rejects blank credentials before any request is made.
pub(crate) fn require_credential(credential: &str) -> Result<(), GitHubError> {
    if credential.trim().is_empty() {
        return Err(GitHubError::MissingCredential);
    }
    Ok(())
}
