//! Enrichment orchestrator. Per repository, fetch manifests, README,
//! contributor totals and languages in parallel, then parse everything into
//! one immutable [`EnrichmentRecord`].
//!
//! Fan-out happens in two waves. Wave one is fixed. Wave two is chosen from
//! [`plan::ECOSYSTEM_MANIFESTS`] once languages are known, so no request is
//! spent on an ecosystem the repository does not use.

use std::collections::BTreeSet;

use futures::future::join_all;
use tracing::{debug, info, warn, Instrument};

use crate::analysis::readme::analyze_readme;
use crate::github::content::FetchOptions;
use crate::github::contributors::ContributorAggregate;
use crate::github::GitHubClient;
use crate::manifests::{bounded_unique, ManifestKind, ParsedManifest, MAX_ENTRIES};
use crate::models::enrichment::EnrichmentRecord;
use crate::models::repository::{LanguageBytes, RepositorySummary, ScoredRepository};

pub mod plan;

use plan::{ManifestFile, FIRST_WAVE, README_CANDIDATES};

pub const DEFAULT_ENRICH_LIMIT: usize = 20;
const MAX_TECHNOLOGIES: usize = 200;

/// Enriches the first `limit` repositories concurrently.
///
/// Callers pre-sort: the listing already arrives most-recently-updated first.
/// Repositories past `limit` are returned without enrichment. One
/// repository misbehaving never fails the batch; its task just yields no
/// record. Output order matches input order.
pub async fn enrich_repositories(
    client: &GitHubClient,
    credential: &str,
    repositories: Vec<RepositorySummary>,
    username: &str,
    limit: usize,
) -> Vec<ScoredRepository> {
    let split = limit.min(repositories.len());
    let mut repositories = repositories;
    let rest = repositories.split_off(split);

    let handles = repositories.iter().map(|repo| {
        let client = client.clone();
        let credential = credential.to_string();
        let username = username.to_string();
        let repo = repo.clone();
        let span = tracing::debug_span!("enrich", repo = %repo.full_name);
        tokio::spawn(
            async move { enrich_repository(&client, &credential, &repo, &username).await }
                .instrument(span),
        )
    });
    let results = join_all(handles).await;

    let mut enriched = 0;
    let mut out: Vec<ScoredRepository> = repositories
        .into_iter()
        .zip(results)
        .map(|(repo, result)| {
            let record = match result {
                Ok(record) => {
                    enriched += 1;
                    Some(record)
                }
                Err(e) => {
                    warn!("Enrichment of {} aborted: {e}", repo.full_name);
                    None
                }
            };
            ScoredRepository::unscored(repo, record)
        })
        .collect();

    info!(
        "Enriched {enriched}/{} repositories ({} left unenriched past limit {limit})",
        out.len(),
        rest.len()
    );

    out.extend(rest.into_iter().map(|repo| ScoredRepository::unscored(repo, None)));
    out
}

/// Builds the enrichment record for one repository.
pub async fn enrich_repository(
    client: &GitHubClient,
    credential: &str,
    repo: &RepositorySummary,
    username: &str,
) -> EnrichmentRecord {
    let owner = repo.owner.as_str();
    let name = repo.name.as_str();
    let defaults = client.default_fetch_options();

    let (first_wave, readmes, contributors, languages) = tokio::join!(
        fetch_manifests(client, credential, owner, name, FIRST_WAVE, defaults),
        join_all(README_CANDIDATES.iter().map(|path| {
            client.fetch_file_content(credential, owner, name, path, defaults)
        })),
        client.fetch_contributor_aggregate(credential, owner, name, username),
        client.fetch_languages(credential, owner, name),
    );

    let detected = detected_languages(repo, languages.as_ref());
    let second = plan::second_wave(&detected);
    debug!(
        "Languages {:?} select {} second-wave manifests",
        detected,
        second.len()
    );
    let second_wave = fetch_manifests(client, credential, owner, name, &second, defaults).await;

    let readme = readmes.into_iter().flatten().next();

    assemble_record(
        repo,
        first_wave.into_iter().chain(second_wave),
        readme.as_deref(),
        contributors,
        languages,
    )
}

/// Fetches `files` in parallel, pairing each body with its parser kind.
async fn fetch_manifests(
    client: &GitHubClient,
    credential: &str,
    owner: &str,
    repo: &str,
    files: &[ManifestFile],
    defaults: FetchOptions,
) -> Vec<(ManifestKind, Option<String>)> {
    join_all(files.iter().map(|file| async move {
        let options = FetchOptions {
            max_size_bytes: file.max_size_bytes.unwrap_or(defaults.max_size_bytes),
            ..defaults
        };
        let text = client
            .fetch_file_content(credential, owner, repo, file.path, options)
            .await;
        (file.kind, text)
    }))
    .await
}

/// Language keys from the byte breakdown plus the listing's primary language.
fn detected_languages(
    repo: &RepositorySummary,
    languages: Option<&LanguageBytes>,
) -> BTreeSet<String> {
    languages
        .into_iter()
        .flat_map(|langs| langs.keys().cloned())
        .chain(repo.language.clone())
        .collect()
}

/// Parses fetched files and folds everything into a finished record.
fn assemble_record(
    repo: &RepositorySummary,
    manifests: impl IntoIterator<Item = (ManifestKind, Option<String>)>,
    readme: Option<&str>,
    contributors: ContributorAggregate,
    languages: Option<LanguageBytes>,
) -> EnrichmentRecord {
    let mut record = EnrichmentRecord {
        readme: readme.map(analyze_readme),
        languages,
        commit_count: contributors.commit_count,
        user_commit_count: contributors.user_commit_count,
        ..Default::default()
    };

    for (kind, text) in manifests {
        if let Some(parsed) = text.as_deref().and_then(|t| kind.parse(t)) {
            absorb(&mut record, parsed);
        }
    }

    record.detected_technologies = collect_technologies(repo, &record);
    record
}

fn absorb(record: &mut EnrichmentRecord, parsed: ParsedManifest) {
    match parsed {
        ParsedManifest::Package(pkg) => record.package_json = Some(pkg),
        ParsedManifest::Python(names) => merge_names(&mut record.python_dependencies, names),
        ParsedManifest::Go(names) => merge_names(&mut record.go_modules, names),
        ParsedManifest::Cargo(names) => merge_names(&mut record.cargo_dependencies, names),
        ParsedManifest::Maven(names) => merge_names(&mut record.maven_dependencies, names),
        ParsedManifest::Gradle(names) => merge_names(&mut record.gradle_dependencies, names),
        ParsedManifest::Gems(names) => merge_names(&mut record.gems, names),
        ParsedManifest::CMake(names) => merge_names(&mut record.cmake_packages, names),
        ParsedManifest::Notebook(insights) => {
            record.notebook = Some(match record.notebook.take() {
                None => insights,
                Some(mut existing) => {
                    existing.imports = bounded_unique(
                        existing.imports.iter().chain(&insights.imports),
                        MAX_ENTRIES,
                    );
                    existing.is_ml_project |= insights.is_ml_project;
                    existing.is_data_science |= insights.is_data_science;
                    existing
                }
            });
        }
    }
}

/// Several files can feed one list (requirements + pyproject + setup.py);
/// the merged list is re-bounded.
fn merge_names(slot: &mut Option<Vec<String>>, names: Vec<String>) {
    let merged = match slot.take() {
        None => names,
        Some(existing) => {
            bounded_unique(existing.iter().chain(&names), MAX_ENTRIES)
        }
    };
    *slot = Some(merged);
}

/// Union of languages (largest first), dependencies, notebook imports, README
/// mentions and topics, deduplicated and capped.
fn collect_technologies(repo: &RepositorySummary, record: &EnrichmentRecord) -> Vec<String> {
    let mut languages: Vec<(&String, &u64)> = record
        .languages
        .as_ref()
        .map(|l| l.iter().collect())
        .unwrap_or_default();
    languages.sort_by(|a, b| b.1.cmp(a.1));

    let dependency_lists = [
        &record.python_dependencies,
        &record.go_modules,
        &record.cargo_dependencies,
        &record.maven_dependencies,
        &record.gradle_dependencies,
        &record.gems,
        &record.cmake_packages,
    ];

    let names = languages
        .into_iter()
        .map(|(name, _)| name.as_str())
        .chain(repo.language.as_deref())
        .chain(
            record
                .package_json
                .iter()
                .flat_map(|p| p.dependencies.iter().chain(&p.dev_dependencies))
                .map(String::as_str),
        )
        .chain(
            dependency_lists
                .into_iter()
                .flatten()
                .flatten()
                .map(String::as_str),
        )
        .chain(
            record
                .notebook
                .iter()
                .flat_map(|n| n.imports.iter())
                .map(String::as_str),
        )
        .chain(
            record
                .readme
                .iter()
                .flat_map(|r| r.mentions.iter())
                .map(String::as_str),
        )
        .chain(repo.topics.iter().map(String::as_str));

    bounded_unique(names, MAX_TECHNOLOGIES)
}
