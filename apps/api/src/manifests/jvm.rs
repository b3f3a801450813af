//! JVM build descriptors: Maven `pom.xml` and Gradle `build.gradle`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{bounded_unique, MAX_ENTRIES};

const MAX_POM_LEN: usize = 500 * 1024;
const MAX_GRADLE_LEN: usize = 200 * 1024;

static DEPENDENCY_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<dependency>(.*?)</dependency>").expect("valid dependency block regex")
});
static ARTIFACT_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<artifactId>\s*([^<\s]+)\s*</artifactId>").expect("valid artifactId regex")
});
static GRADLE_COORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\b(?:implementation|compile|api|testImplementation)\s*\(?\s*['"]([^:'"\s]+):([^:'"\s]+)(?::[^'"]*)?['"]"#,
    )
    .expect("valid gradle coordinate regex")
});

/// Parses `pom.xml`, returning the `artifactId` of every `<dependency>`.
///
/// The project's own `artifactId` sits outside any dependency block and is
/// not reported.
pub fn parse_pom_xml(text: &str) -> Vec<String> {
    if text.len() > MAX_POM_LEN {
        return Vec::new();
    }
    let names = DEPENDENCY_BLOCK_RE
        .captures_iter(text)
        .filter_map(|block| block.get(1))
        .filter_map(|block| ARTIFACT_ID_RE.captures(block.as_str()))
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());
    bounded_unique(names, MAX_ENTRIES)
}

/// Parses Gradle build scripts (Groovy or Kotlin DSL), returning the artifact
/// part of `group:artifact:version` coordinates.
pub fn parse_gradle(text: &str) -> Vec<String> {
    if text.len() > MAX_GRADLE_LEN {
        return Vec::new();
    }
    let names = GRADLE_COORD_RE
        .captures_iter(text)
        .filter_map(|c| c.get(2))
        .map(|m| m.as_str());
    bounded_unique(names, MAX_ENTRIES)
}
