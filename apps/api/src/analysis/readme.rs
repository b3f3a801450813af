//! README heuristics: project type, complexity tier, capability flags and
//! technology mentions, all from keyword and regex matching.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Regexes only ever see this many bytes of a README.
pub const MAX_README_SCAN: usize = 50 * 1024;
const MAX_MENTIONS: usize = 50;

const COMPLEX_WORDS: usize = 1500;
const MODERATE_WORDS: usize = 500;
const COMPLEX_HEADERS: usize = 10;
const MODERATE_HEADERS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    #[default]
    Application,
    Library,
    Api,
    CliTool,
    Dashboard,
    MobileApp,
    Website,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    #[default]
    Simple,
    Moderate,
    Complex,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadmeInsights {
    /// Length of the full README in bytes, before truncation.
    pub length: usize,
    pub word_count: usize,
    pub project_type: ProjectType,
    pub has_demo: bool,
    pub has_docs: bool,
    pub has_metrics: bool,
    pub complexity: Complexity,
    pub mentions: Vec<String>,
}

/// Evaluated in order; the last rule that matches decides the project type.
static PROJECT_TYPE_RULES: Lazy<Vec<(ProjectType, Regex)>> = Lazy::new(|| {
    [
        (ProjectType::Library, r"\b(?:library|package|sdk|framework|crate|module)\b"),
        (ProjectType::Api, r"\b(?:api|rest|graphql|endpoints?|backend|microservices?)\b"),
        (ProjectType::CliTool, r"\b(?:cli|command[- ]line|terminal)\b"),
        (ProjectType::Dashboard, r"\b(?:dashboard|admin panel|analytics)\b"),
        (ProjectType::MobileApp, r"\b(?:mobile|ios|android|react native|flutter)\b"),
        (ProjectType::Website, r"\b(?:website|landing page|portfolio|blog)\b"),
    ]
    .into_iter()
    .map(|(kind, pattern)| {
        let re = Regex::new(&format!("(?i){pattern}")).expect("valid project type regex");
        (kind, re)
    })
    .collect()
});

static DEMO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:demo|live (?:site|version|preview)|deployed|try it|screenshots?)\b")
        .expect("valid demo regex")
});
static DOCS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:documentation|docs|usage|installation|getting started|api reference)\b")
        .expect("valid docs regex")
});
static METRICS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d[\d,.]*[km]?\+?\s*(?:users|requests|downloads|stars|contributors|companies)\b",
    )
    .expect("valid metrics regex")
});
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{2,3}\s+\S").expect("valid header regex"));
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)!\[[^\]]*\]\([^)]+\)|<img\s").expect("valid image regex"));

/// Technology vocabulary matched against README text. Entries are lower-case.
const TECH_VOCABULARY: &[&str] = &[
    // languages
    "rust", "go", "golang", "python", "java", "kotlin", "swift", "ruby", "php", "c++", "c#",
    "typescript", "javascript", "scala", "elixir", "haskell", "dart",
    // frameworks
    "react", "next.js", "vue", "angular", "svelte", "node.js", "express", "django", "flask",
    "fastapi", "spring", "rails", "laravel", "actix", "axum", "tokio", "flutter", "tailwind",
    "graphql", "pytorch", "tensorflow",
    // clouds and infrastructure
    "aws", "gcp", "azure", "vercel", "netlify", "heroku", "docker", "kubernetes", "terraform",
    // databases
    "postgresql", "postgres", "mysql", "sqlite", "mongodb", "redis", "elasticsearch", "kafka",
    "supabase", "firebase", "dynamodb",
    // ci
    "github actions", "gitlab ci", "jenkins", "circleci", "travis",
];

/// One matcher per vocabulary entry. Boundaries are "not alphanumeric" so that
/// terms with punctuation (`c++`, `node.js`) still match cleanly.
static TECH_MATCHERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    TECH_VOCABULARY
        .iter()
        .map(|term| {
            let pattern = format!(r"(?:^|[^a-z0-9]){}(?:$|[^a-z0-9+#])", regex::escape(term));
            (*term, Regex::new(&pattern).expect("valid tech vocabulary regex"))
        })
        .collect()
});

/// Analyses a README. The text is cut to [`MAX_README_SCAN`] bytes (on a char
/// boundary) before any pattern runs.
pub fn analyze_readme(text: &str) -> ReadmeInsights {
    let scanned = truncate_on_char_boundary(text, MAX_README_SCAN);
    let lowered = scanned.to_lowercase();

    let word_count = scanned.split_whitespace().count();
    let header_count = HEADER_RE.find_iter(scanned).count();
    let has_images = IMAGE_RE.is_match(scanned);

    let project_type = PROJECT_TYPE_RULES
        .iter()
        .filter(|(_, re)| re.is_match(scanned))
        .map(|(kind, _)| *kind)
        .last()
        .unwrap_or_default();

    ReadmeInsights {
        length: text.len(),
        word_count,
        project_type,
        has_demo: DEMO_RE.is_match(scanned),
        has_docs: DOCS_RE.is_match(scanned),
        has_metrics: METRICS_RE.is_match(scanned),
        complexity: classify_complexity(word_count, header_count, has_images),
        mentions: technology_mentions(&lowered),
    }
}

fn classify_complexity(word_count: usize, header_count: usize, has_images: bool) -> Complexity {
    if word_count > COMPLEX_WORDS || header_count > COMPLEX_HEADERS {
        Complexity::Complex
    } else if word_count > MODERATE_WORDS || header_count > MODERATE_HEADERS || has_images {
        Complexity::Moderate
    } else {
        Complexity::Simple
    }
}

fn technology_mentions(lowered: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TECH_MATCHERS
        .iter()
        .filter(|(_, re)| re.is_match(lowered))
        .map(|(term, _)| term.to_string())
        .filter(|term| seen.insert(term.clone()))
        .take(MAX_MENTIONS)
        .collect()
}

fn truncate_on_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["lorem"; n].join(" ")
    }

    #[test]
    fn test_long_readme_with_many_headers_is_complex() {
        let mut text = words(1800);
        for i in 0..12 {
            text.push_str(&format!("\n## Section {i}\n"));
        }
        assert_eq!(analyze_readme(&text).complexity, Complexity::Complex);
    }

    #[test]
    fn test_headers_alone_can_make_complex() {
        let text: String = (0..11).map(|i| format!("### Part {i}\nshort\n")).collect();
        assert_eq!(analyze_readme(&text).complexity, Complexity::Complex);
    }

    #[test]
    fn test_image_makes_short_readme_moderate() {
        let text = "# Tool\n\n![screenshot](docs/shot.png)\n";
        assert_eq!(analyze_readme(text).complexity, Complexity::Moderate);
        assert_eq!(analyze_readme("# Tool\nTiny.").complexity, Complexity::Simple);
        assert_eq!(analyze_readme(&words(600)).complexity, Complexity::Moderate);
    }

    #[test]
    fn test_last_matching_project_type_wins() {
        // library then cli-tool: cli-tool is later in the rule order
        let text = "A small library with a command-line interface.";
        assert_eq!(analyze_readme(text).project_type, ProjectType::CliTool);

        let text = "An analytics dashboard, also shipped as an Android app.";
        assert_eq!(analyze_readme(text).project_type, ProjectType::MobileApp);
    }

    #[test]
    fn test_default_project_type_is_application() {
        assert_eq!(
            analyze_readme("Just some words here.").project_type,
            ProjectType::Application
        );
    }

    #[test]
    fn test_capability_flags() {
        let text = "See the live demo. Installation: cargo install. Used by 10,000+ users.";
        let insights = analyze_readme(text);
        assert!(insights.has_demo);
        assert!(insights.has_docs);
        assert!(insights.has_metrics);

        let plain = analyze_readme("A thing I made.");
        assert!(!plain.has_demo && !plain.has_docs && !plain.has_metrics);
    }

    #[test]
    fn test_metrics_needs_a_number() {
        assert!(!analyze_readme("Loved by users everywhere").has_metrics);
        assert!(analyze_readme("Over 500 downloads per week").has_metrics);
    }

    #[test]
    fn test_mentions_are_lowercased_and_bounded_by_vocabulary() {
        let text = "Built with React, Node.js and PostgreSQL on AWS. React again. Deployed with Docker; tested with GitHub Actions. Written in C++.";
        let insights = analyze_readme(text);
        assert_eq!(
            insights.mentions,
            vec!["c++", "react", "node.js", "aws", "docker", "postgresql", "github actions"]
        );
    }

    #[test]
    fn test_mentions_do_not_match_inside_words() {
        let insights = analyze_readme("Gopher goes to the store. Rusty nails.");
        assert!(insights.mentions.is_empty());
    }

    #[test]
    fn test_length_reports_full_input_but_scan_is_truncated() {
        let mut text = "é".repeat(MAX_README_SCAN);
        text.push_str(" redis");
        let insights = analyze_readme(&text);
        assert_eq!(insights.length, text.len());
        assert!(!insights.mentions.contains(&"redis".to_string()));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "aé";
        assert_eq!(truncate_on_char_boundary(text, 2), "a");
        assert_eq!(truncate_on_char_boundary(text, 3), "aé");
    }
}
