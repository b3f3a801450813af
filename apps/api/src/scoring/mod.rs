//! Relevance scoring and filtering of repositories for one user.
//!
//! Scores come from the ordered tables in [`rules`]. Repositories the user did
//! not meaningfully contribute to get [`rules::SENTINEL_SCORE`] and are then
//! dropped by [`filter_and_rank`].

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::enrichment::EnrichmentRecord;
use crate::models::repository::{RepositorySummary, ScoredRepository};

pub mod rules;

use rules::{
    apply_rules, first_gate, GateOutcome, GateTier, RepoFacts, FALLBACK_RULES, FOREIGN_REPO_GATES,
    OWNED_FORK_GATES, PENALTY_RULES, REMOVAL_THRESHOLD, SENTINEL_SCORE, SIGNAL_RULES,
};

/// Scores, filters and sorts `repositories` for `username`, using the current
/// time for recency.
pub fn score_repositories(
    repositories: Vec<ScoredRepository>,
    username: &str,
) -> Vec<ScoredRepository> {
    score_repositories_at(repositories, username, Utc::now())
}

/// Same as [`score_repositories`] with an explicit clock.
pub fn score_repositories_at(
    repositories: Vec<ScoredRepository>,
    username: &str,
    now: DateTime<Utc>,
) -> Vec<ScoredRepository> {
    let total = repositories.len();
    let scored: Vec<ScoredRepository> = repositories
        .into_iter()
        .map(|mut entry| {
            entry.score = score_repository(
                &entry.repository,
                entry.enrichment.as_ref(),
                username,
                now,
            );
            entry
        })
        .collect();

    let ranked = filter_and_rank(scored, username);
    info!("Scored {total} repositories for {username}, kept {}", ranked.len());
    ranked
}

/// Score for a single repository. Any previous score is ignored, so scoring
/// twice gives the same result.
pub fn score_repository(
    repo: &RepositorySummary,
    enrichment: Option<&EnrichmentRecord>,
    username: &str,
    now: DateTime<Utc>,
) -> i64 {
    let facts = repo_facts(repo, enrichment, username, now);

    if enrichment.is_none() {
        return apply_rules(FALLBACK_RULES, &facts).max(0);
    }

    let gates: &[GateTier] = match (facts.owned, facts.fork) {
        (false, _) => FOREIGN_REPO_GATES,
        (true, true) => OWNED_FORK_GATES,
        (true, false) => &[],
    };

    let mut score = 0;
    if let Some(tier) = first_gate(gates, &facts) {
        debug!("{} gated: {}", repo.full_name, tier.name);
        match tier.outcome {
            GateOutcome::Remove => return SENTINEL_SCORE,
            GateOutcome::Penalty(delta) => score += delta,
        }
    }

    score += apply_rules(SIGNAL_RULES, &facts);
    score += apply_rules(PENALTY_RULES, &facts);
    score
}

/// Drops sentinel-scored repositories, keeps positive scores and owned
/// repositories at zero, then sorts by score descending. The sort is stable:
/// equal scores keep their input order.
pub fn filter_and_rank(
    repositories: Vec<ScoredRepository>,
    username: &str,
) -> Vec<ScoredRepository> {
    let mut kept: Vec<ScoredRepository> = repositories
        .into_iter()
        .filter(|entry| {
            if entry.score < REMOVAL_THRESHOLD {
                return false;
            }
            entry.score > 0 || (entry.score == 0 && entry.repository.is_owned_by(username))
        })
        .collect();
    kept.sort_by(|a, b| b.score.cmp(&a.score));
    kept
}

fn repo_facts(
    repo: &RepositorySummary,
    enrichment: Option<&EnrichmentRecord>,
    username: &str,
    now: DateTime<Utc>,
) -> RepoFacts {
    let mut facts = RepoFacts {
        owned: repo.is_owned_by(username),
        fork: repo.fork,
        public: !repo.private,
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        days_since_update: repo
            .last_activity()
            .map(|at| (now - at).num_days().max(0)),
        contribution_ratio: 1.0,
        ..Default::default()
    };

    if let Some(record) = enrichment {
        let readme = record.readme.as_ref();
        facts.user_commits = record.user_commit_count;
        facts.contribution_ratio = record.contribution_ratio();
        facts.code_size_kb = record.code_size_kb();
        facts.language_count = record.language_count();
        facts.readme_length = record.readme_length();
        facts.complexity = readme.map(|r| r.complexity);
        facts.has_test_script = record.has_script("test");
        facts.has_build_script = record.has_script("build");
        facts.has_lint_script = record.has_script("lint");
        facts.has_docs = readme.is_some_and(|r| r.has_docs);
        facts.has_demo = readme.is_some_and(|r| r.has_demo);
        facts.has_metrics = readme.is_some_and(|r| r.has_metrics);
        facts.technology_count = record.detected_technologies.len();
    }
    facts
}
