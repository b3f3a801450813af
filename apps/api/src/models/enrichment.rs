use serde::{Deserialize, Serialize};

use crate::analysis::readme::ReadmeInsights;
use crate::manifests::notebook::NotebookInsights;
use crate::manifests::package_json::PackageManifest;
use crate::models::repository::LanguageBytes;

/// Deep-inspection data gathered for a single repository.
///
/// A `None` sub-field means that fetch or parse came back empty; there is no
/// retry and no partial value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    #[serde(default)]
    pub package_json: Option<PackageManifest>,
    #[serde(default)]
    pub python_dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub go_modules: Option<Vec<String>>,
    #[serde(default)]
    pub cargo_dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub maven_dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub gradle_dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub gems: Option<Vec<String>>,
    #[serde(default)]
    pub cmake_packages: Option<Vec<String>>,
    #[serde(default)]
    pub notebook: Option<NotebookInsights>,
    #[serde(default)]
    pub readme: Option<ReadmeInsights>,
    #[serde(default)]
    pub languages: Option<LanguageBytes>,
    /// Commits across all contributors (0 when unknown).
    #[serde(default)]
    pub commit_count: u64,
    /// Commits attributed to the requesting user (0 when unknown).
    #[serde(default)]
    pub user_commit_count: u64,
    #[serde(default)]
    pub detected_technologies: Vec<String>,
}

impl EnrichmentRecord {
    /// Share of commits attributed to the user, capped at 1.0.
    ///
    /// A zero repository total, or a user count above the total, counts as a
    /// full contribution: contributor pagination caps make the totals
    /// unreliable in both directions.
    pub fn contribution_ratio(&self) -> f64 {
        if self.commit_count == 0 || self.user_commit_count >= self.commit_count {
            return 1.0;
        }
        self.user_commit_count as f64 / self.commit_count as f64
    }

    /// Total code size across all languages, in KB.
    pub fn code_size_kb(&self) -> u64 {
        self.languages
            .as_ref()
            .map(|langs| langs.values().sum::<u64>() / 1024)
            .unwrap_or(0)
    }

    pub fn language_count(&self) -> usize {
        self.languages.as_ref().map(|l| l.len()).unwrap_or(0)
    }

    pub fn readme_length(&self) -> usize {
        self.readme.as_ref().map(|r| r.length).unwrap_or(0)
    }

    /// Whether any package script name contains `needle` (e.g. "test").
    pub fn has_script(&self, needle: &str) -> bool {
        self.package_json
            .as_ref()
            .map(|pkg| pkg.scripts.iter().any(|s| s.to_lowercase().contains(needle)))
            .unwrap_or(false)
    }
}
