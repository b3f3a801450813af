use crate::config::Config;
use crate::github::GitHubClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds no credentials; each handler passes the caller's token through.
    pub github: GitHubClient,
    pub config: Config,
}
