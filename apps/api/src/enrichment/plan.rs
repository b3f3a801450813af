//! Which files to fetch for a repository, as data rather than control flow.

use std::collections::BTreeSet;

use crate::manifests::notebook::MAX_NOTEBOOK_LEN;
use crate::manifests::ManifestKind;

/// A repository file and the parser it is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestFile {
    pub path: &'static str,
    pub kind: ManifestKind,
    /// Overrides the client's default size ceiling.
    pub max_size_bytes: Option<usize>,
}

const fn file(path: &'static str, kind: ManifestKind) -> ManifestFile {
    ManifestFile {
        path,
        kind,
        max_size_bytes: None,
    }
}

/// Ecosystem-specific manifests, fetched only when one of `languages` is
/// detected in the repository.
pub struct EcosystemManifests {
    pub languages: &'static [&'static str],
    pub files: &'static [ManifestFile],
}

/// Fetched for every repository, alongside README, contributors and languages.
pub const FIRST_WAVE: &[ManifestFile] = &[
    file("package.json", ManifestKind::PackageJson),
    file("requirements.txt", ManifestKind::Requirements),
];

pub const README_CANDIDATES: &[&str] = &["README.md", "readme.md"];

pub const ECOSYSTEM_MANIFESTS: &[EcosystemManifests] = &[
    EcosystemManifests {
        languages: &["Go"],
        files: &[file("go.mod", ManifestKind::GoMod)],
    },
    EcosystemManifests {
        languages: &["Rust"],
        files: &[file("Cargo.toml", ManifestKind::CargoToml)],
    },
    EcosystemManifests {
        languages: &["Java", "Kotlin"],
        files: &[
            file("pom.xml", ManifestKind::PomXml),
            file("build.gradle", ManifestKind::Gradle),
        ],
    },
    EcosystemManifests {
        languages: &["Ruby"],
        files: &[file("Gemfile", ManifestKind::Gemfile)],
    },
    EcosystemManifests {
        languages: &["C", "C++", "CMake"],
        files: &[file("CMakeLists.txt", ManifestKind::CMakeLists)],
    },
    EcosystemManifests {
        languages: &["Python", "Jupyter Notebook"],
        files: &[
            file("pyproject.toml", ManifestKind::Pyproject),
            file("setup.py", ManifestKind::SetupPy),
            ManifestFile {
                path: "main.ipynb",
                kind: ManifestKind::Notebook,
                max_size_bytes: Some(MAX_NOTEBOOK_LEN),
            },
            ManifestFile {
                path: "notebook.ipynb",
                kind: ManifestKind::Notebook,
                max_size_bytes: Some(MAX_NOTEBOOK_LEN),
            },
        ],
    },
];

/// Second-wave files for the detected languages, in table order, without
/// duplicates. Language names compare case-insensitively.
pub fn second_wave(languages: &BTreeSet<String>) -> Vec<ManifestFile> {
    let mut files: Vec<ManifestFile> = Vec::new();
    for ecosystem in ECOSYSTEM_MANIFESTS {
        let detected = ecosystem
            .languages
            .iter()
            .any(|lang| languages.iter().any(|l| l.eq_ignore_ascii_case(lang)));
        if !detected {
            continue;
        }
        for manifest in ecosystem.files {
            if !files.iter().any(|f| f.path == manifest.path) {
                files.push(*manifest);
            }
        }
    }
    files
}
