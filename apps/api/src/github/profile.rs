use tracing::info;

use crate::github::{require_credential, GitHubClient, GitHubError};
use crate::models::profile::UserProfile;

impl GitHubClient {
    /// Looks up the user the token belongs to. Unlike enrichment fetches this
    /// fails loudly: a bad token means the request cannot proceed.
    pub async fn fetch_authenticated_user(
        &self,
        credential: &str,
    ) -> Result<UserProfile, GitHubError> {
        require_credential(credential)?;
        let profile: UserProfile = self
            .get_json(credential, "/user", &[], self.settings().file_timeout)
            .await?;
        info!("Resolved authenticated GitHub user {}", profile.login);
        Ok(profile)
    }
}
