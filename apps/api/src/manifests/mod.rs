//! Manifest parsers: pure `text → names` extractors, one per ecosystem.
//!
//! Every parser rejects input above its own length ceiling and returns a
//! deduplicated list no longer than [`MAX_ENTRIES`]. The caps bound payload
//! size handed to the LLM regardless of what a repository contains.

use std::collections::HashSet;

pub mod cargo_toml;
pub mod cmake;
pub mod gemfile;
pub mod go_mod;
pub mod jvm;
pub mod notebook;
pub mod package_json;
pub mod python;

/// Default cap on names extracted from a single manifest.
pub const MAX_ENTRIES: usize = 100;

/// Names longer than this are treated as garbage and skipped.
pub const MAX_NAME_LEN: usize = 100;

/// Collects `names` in first-seen order, dropping blanks, over-long names and
/// case-insensitive duplicates, stopping at `cap`.
pub fn bounded_unique<I, S>(names: I, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        if out.len() >= cap {
            break;
        }
        let name = name.as_ref().trim();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            continue;
        }
        if seen.insert(name.to_lowercase()) {
            out.push(name.to_string());
        }
    }
    out
}

/// Which parser a fetched manifest file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    PackageJson,
    Requirements,
    Pyproject,
    SetupPy,
    GoMod,
    CargoToml,
    PomXml,
    Gradle,
    Gemfile,
    CMakeLists,
    Notebook,
}

/// Parsed output of one manifest, tagged by the field it fills.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedManifest {
    Package(package_json::PackageManifest),
    Python(Vec<String>),
    Go(Vec<String>),
    Cargo(Vec<String>),
    Maven(Vec<String>),
    Gradle(Vec<String>),
    Gems(Vec<String>),
    CMake(Vec<String>),
    Notebook(notebook::NotebookInsights),
}

impl ManifestKind {
    /// Runs the matching parser. `None` when nothing useful was extracted.
    pub fn parse(self, text: &str) -> Option<ParsedManifest> {
        let parsed = match self {
            ManifestKind::PackageJson => {
                return package_json::parse_package_json(text).map(ParsedManifest::Package)
            }
            ManifestKind::Notebook => {
                return notebook::parse_notebook(text).map(ParsedManifest::Notebook)
            }
            ManifestKind::Requirements => ParsedManifest::Python(python::parse_requirements(text)),
            ManifestKind::Pyproject => ParsedManifest::Python(python::parse_pyproject(text)),
            ManifestKind::SetupPy => ParsedManifest::Python(python::parse_setup_py(text)),
            ManifestKind::GoMod => ParsedManifest::Go(go_mod::parse_go_mod(text)),
            ManifestKind::CargoToml => ParsedManifest::Cargo(cargo_toml::parse_cargo_toml(text)),
            ManifestKind::PomXml => ParsedManifest::Maven(jvm::parse_pom_xml(text)),
            ManifestKind::Gradle => ParsedManifest::Gradle(jvm::parse_gradle(text)),
            ManifestKind::Gemfile => ParsedManifest::Gems(gemfile::parse_gemfile(text)),
            ManifestKind::CMakeLists => ParsedManifest::CMake(cmake::parse_cmake(text)),
        };
        match &parsed {
            ParsedManifest::Python(v)
            | ParsedManifest::Go(v)
            | ParsedManifest::Cargo(v)
            | ParsedManifest::Maven(v)
            | ParsedManifest::Gradle(v)
            | ParsedManifest::Gems(v)
            | ParsedManifest::CMake(v)
                if v.is_empty() =>
            {
                None
            }
            _ => Some(parsed),
        }
    }
}
