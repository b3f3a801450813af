//! Commit attribution and language breakdown for a single repository.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::github::{GitHubClient, GitHubError, MAX_PAGES, PER_PAGE};
use crate::models::repository::LanguageBytes;

/// Repository-wide commit total and the requesting user's share of it.
/// `{0, 0}` means "unknown", not "no commits".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorAggregate {
    pub commit_count: u64,
    pub user_commit_count: u64,
}

#[derive(Debug, Deserialize)]
struct ContributorPayload {
    #[serde(default)]
    login: Option<String>,
    #[serde(default)]
    contributions: u64,
}

impl GitHubClient {
    /// Sums contributions across up to three pages of contributors.
    ///
    /// Any failure, on any page, collapses to `{0, 0}`.
    pub async fn fetch_contributor_aggregate(
        &self,
        credential: &str,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> ContributorAggregate {
        match self
            .try_contributor_aggregate(credential, owner, repo, username)
            .await
        {
            Ok(aggregate) => aggregate,
            Err(e) => {
                debug!("Contributor aggregation for {owner}/{repo} failed: {e}");
                ContributorAggregate::default()
            }
        }
    }

    async fn try_contributor_aggregate(
        &self,
        credential: &str,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> Result<ContributorAggregate, GitHubError> {
        let path = format!("/repos/{owner}/{repo}/contributors");
        let username = username.trim();
        let mut aggregate = ContributorAggregate::default();

        for page in 1..=MAX_PAGES {
            let contributors: Vec<ContributorPayload> = self
                .get_json(
                    credential,
                    &path,
                    &[("per_page", PER_PAGE.to_string()), ("page", page.to_string())],
                    self.settings().contributors_timeout,
                )
                .await?;

            for contributor in &contributors {
                aggregate.commit_count += contributor.contributions;
                let is_user = contributor
                    .login
                    .as_deref()
                    .is_some_and(|login| login.eq_ignore_ascii_case(username));
                if is_user {
                    aggregate.user_commit_count += contributor.contributions;
                }
            }

            // A short page is the last one; no further page can mention the user.
            if contributors.len() < PER_PAGE {
                break;
            }
        }

        Ok(aggregate)
    }

    /// Bytes of code per language. `None` on any failure.
    pub async fn fetch_languages(
        &self,
        credential: &str,
        owner: &str,
        repo: &str,
    ) -> Option<LanguageBytes> {
        let path = format!("/repos/{owner}/{repo}/languages");
        self.get_json(credential, &path, &[], self.settings().file_timeout)
            .await
            .ok()
    }
}
