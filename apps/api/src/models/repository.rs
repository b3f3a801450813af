use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::enrichment::EnrichmentRecord;

/// A repository as listed by GitHub, reduced to the fields the ranking needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: u64,
    pub owner: String,
    pub name: String,
    /// `owner/name`, as reported by GitHub.
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Repository size in KB.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

impl RepositorySummary {
    /// Case-insensitive, whitespace-trimmed owner comparison.
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner.trim().eq_ignore_ascii_case(username.trim())
    }

    /// Whether `full_name` carries an owner/name separator.
    pub fn has_valid_full_name(&self) -> bool {
        matches!(
            self.full_name.split_once('/'),
            Some((owner, name)) if !owner.is_empty() && !name.is_empty()
        )
    }

    /// Most recent activity timestamp: push time if known, else update time.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        match (self.pushed_at, self.updated_at) {
            (Some(p), Some(u)) => Some(p.max(u)),
            (p, u) => p.or(u),
        }
    }
}

/// A repository with its (optional) enrichment and relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRepository {
    #[serde(flatten)]
    pub repository: RepositorySummary,
    #[serde(default)]
    pub enrichment: Option<EnrichmentRecord>,
    #[serde(default)]
    pub score: i64,
}

impl ScoredRepository {
    pub fn unscored(repository: RepositorySummary, enrichment: Option<EnrichmentRecord>) -> Self {
        Self {
            repository,
            enrichment,
            score: 0,
        }
    }
}

/// Language name → bytes of code, as returned by the languages endpoint.
pub type LanguageBytes = BTreeMap<String, u64>;

#[cfg(test)]
pub(crate) fn sample_repository(owner: &str, name: &str) -> RepositorySummary {
    RepositorySummary {
        id: 1,
        owner: owner.to_string(),
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        private: false,
        html_url: format!("https://github.com/{owner}/{name}"),
        description: None,
        fork: false,
        language: None,
        topics: vec![],
        size: 0,
        stargazers_count: 0,
        forks_count: 0,
        watchers_count: 0,
        created_at: None,
        updated_at: None,
        pushed_at: None,
    }
}
