//! Repository listing with public-only fallback, dedup, and a relevance
//! pre-filter that drops low-signal forks.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::github::{require_credential, GitHubClient, GitHubError, MAX_PAGES, PER_PAGE};
use crate::models::repository::RepositorySummary;

/// Own forks are kept only with at least this many stars...
const FORK_MIN_STARS: u64 = 20;
/// ...or at least this many forks of their own.
const FORK_MIN_FORKS: u64 = 10;

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RepoPayload {
    id: u64,
    name: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    owner: Option<OwnerPayload>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    watchers_count: u64,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pushed_at: Option<DateTime<Utc>>,
}

impl From<RepoPayload> for RepositorySummary {
    fn from(p: RepoPayload) -> Self {
        let owner = p
            .owner
            .map(|o| o.login)
            .or_else(|| p.full_name.split_once('/').map(|(o, _)| o.to_string()))
            .unwrap_or_default();
        RepositorySummary {
            id: p.id,
            owner,
            name: p.name,
            full_name: p.full_name,
            private: p.private,
            html_url: p.html_url,
            description: p.description,
            fork: p.fork,
            language: p.language,
            topics: p.topics,
            size: p.size,
            stargazers_count: p.stargazers_count,
            forks_count: p.forks_count,
            watchers_count: p.watchers_count,
            created_at: p.created_at,
            updated_at: p.updated_at,
            pushed_at: p.pushed_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingSource {
    /// `/user/repos`: everything the token can see, private included.
    Authenticated,
    /// `/users/{username}/repos`: public repositories only.
    Public,
}

impl ListingSource {
    fn path(self, username: &str) -> String {
        match self {
            ListingSource::Authenticated => "/user/repos".to_string(),
            ListingSource::Public => format!("/users/{username}/repos"),
        }
    }

    fn query(self, page: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
        ];
        if self == ListingSource::Authenticated {
            query.push((
                "affiliation",
                "owner,collaborator,organization_member".to_string(),
            ));
        }
        query
    }
}

impl GitHubClient {
    /// Lists the user's repositories, most recently updated first, then
    /// applies [`prefilter_repositories`].
    ///
    /// If the first authenticated page fails the listing switches to the
    /// public endpoint. If that first page fails too, its error is returned.
    /// A failure on any later page ends pagination with what was collected
    /// so far.
    pub async fn list_repositories(
        &self,
        credential: &str,
        username: &str,
    ) -> Result<Vec<RepositorySummary>, GitHubError> {
        require_credential(credential)?;
        let username = username.trim();
        if username.is_empty() {
            return Err(GitHubError::MissingUsername);
        }

        let mut source = ListingSource::Authenticated;
        let mut collected: Vec<RepositorySummary> = Vec::new();
        let mut page = 1;

        while page <= MAX_PAGES {
            let result: Result<Vec<Value>, GitHubError> = self
                .get_json(
                    credential,
                    &source.path(username),
                    &source.query(page),
                    self.settings().file_timeout,
                )
                .await;

            let entries = match result {
                Ok(entries) => entries,
                Err(e) if page == 1 && source == ListingSource::Authenticated => {
                    warn!("Authenticated repository listing failed ({e}); falling back to public repositories");
                    source = ListingSource::Public;
                    continue;
                }
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    warn!("Repository listing stopped at page {page}: {e}");
                    break;
                }
            };

            let page_len = entries.len();
            collected.extend(entries.into_iter().filter_map(|entry| {
                serde_json::from_value::<RepoPayload>(entry)
                    .map_err(|e| debug!("Skipping malformed repository entry: {e}"))
                    .ok()
                    .map(RepositorySummary::from)
            }));

            if page_len < PER_PAGE {
                break;
            }
            page += 1;
        }

        let repositories = dedup_by_id(collected);
        if repositories.is_empty() {
            return Err(GitHubError::NoRepositories(username.to_string()));
        }

        let listed = repositories.len();
        let kept = prefilter_repositories(repositories, username);
        info!(
            "Listed {listed} repositories for {username} ({source:?}), {} kept after pre-filter",
            kept.len()
        );
        Ok(kept)
    }
}

/// Dedup by repository id. A later duplicate replaces the earlier entry but
/// keeps its position.
fn dedup_by_id(repositories: Vec<RepositorySummary>) -> Vec<RepositorySummary> {
    let mut positions: HashMap<u64, usize> = HashMap::new();
    let mut out: Vec<RepositorySummary> = Vec::with_capacity(repositories.len());
    for repo in repositories {
        match positions.get(&repo.id) {
            Some(&idx) => out[idx] = repo,
            None => {
                positions.insert(repo.id, out.len());
                out.push(repo);
            }
        }
    }
    out
}

/// Removes entries without an owner/name separator, forks owned by someone
/// else, and the user's own forks that have not gathered real traction.
/// Every non-fork the user owns is kept, however quiet it is.
pub fn prefilter_repositories(
    repositories: Vec<RepositorySummary>,
    username: &str,
) -> Vec<RepositorySummary> {
    repositories
        .into_iter()
        .filter(|repo| {
            if !repo.has_valid_full_name() {
                debug!("Dropping malformed repository {:?}", repo.full_name);
                return false;
            }
            if !repo.fork {
                return true;
            }
            repo.is_owned_by(username)
                && (repo.stargazers_count >= FORK_MIN_STARS || repo.forks_count >= FORK_MIN_FORKS)
        })
        .collect()
}
