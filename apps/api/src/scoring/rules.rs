//! Scoring rule tables. Each table is evaluated top to bottom; every matching
//! rule adds its delta. Tiered signals use disjoint ranges so that exactly one
//! tier of a family can fire.

use crate::analysis::readme::Complexity;

/// Score assigned to repositories the user did not meaningfully contribute
/// to. Anything below [`REMOVAL_THRESHOLD`] is dropped by the filter.
pub const SENTINEL_SCORE: i64 = -9999;
pub const REMOVAL_THRESHOLD: i64 = -1000;

/// Flat snapshot of everything a rule can look at.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RepoFacts {
    pub owned: bool,
    pub fork: bool,
    pub public: bool,
    pub stars: u64,
    pub forks: u64,
    pub days_since_update: Option<i64>,
    pub user_commits: u64,
    pub contribution_ratio: f64,
    pub code_size_kb: u64,
    pub language_count: usize,
    pub readme_length: usize,
    pub complexity: Option<Complexity>,
    pub has_test_script: bool,
    pub has_build_script: bool,
    pub has_lint_script: bool,
    pub has_docs: bool,
    pub has_demo: bool,
    pub has_metrics: bool,
    pub technology_count: usize,
}

impl RepoFacts {
    fn updated_within(&self, low: i64, high: i64) -> bool {
        self.days_since_update
            .is_some_and(|d| d >= low && d <= high)
    }
}

pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&RepoFacts) -> bool,
    pub delta: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Force the sentinel score; no other rule is evaluated.
    Remove,
    Penalty(i64),
}

pub struct GateTier {
    pub name: &'static str,
    pub applies: fn(&RepoFacts) -> bool,
    pub outcome: GateOutcome,
}

/// Repositories without enrichment data.
pub const FALLBACK_RULES: &[Rule] = &[
    Rule { name: "stars >= 100", applies: |f| f.stars >= 100, delta: 40 },
    Rule { name: "stars 10-99", applies: |f| (10..100).contains(&f.stars), delta: 20 },
    Rule { name: "stars 1-9", applies: |f| (1..10).contains(&f.stars), delta: 5 },
    Rule { name: "forks >= 10", applies: |f| f.forks >= 10, delta: 15 },
    Rule { name: "forks 1-9", applies: |f| (1..10).contains(&f.forks), delta: 5 },
    Rule { name: "updated within 30 days", applies: |f| f.updated_within(0, 30), delta: 15 },
    Rule { name: "updated within 180 days", applies: |f| f.updated_within(31, 180), delta: 8 },
    Rule { name: "owned by user", applies: |f| f.owned, delta: 20 },
    Rule { name: "fork", applies: |f| f.fork, delta: -50 },
];

/// Gates for repositories owned by someone else. First match wins.
pub const FOREIGN_REPO_GATES: &[GateTier] = &[
    GateTier {
        name: "no attributed commits",
        applies: |f| f.user_commits == 0,
        outcome: GateOutcome::Remove,
    },
    GateTier {
        name: "fewer than 3 commits",
        applies: |f| f.user_commits < 3,
        outcome: GateOutcome::Penalty(-300),
    },
    GateTier {
        name: "fewer than 10 commits or at most 10% of commits",
        applies: |f| f.user_commits < 10 || f.contribution_ratio <= 0.10,
        outcome: GateOutcome::Penalty(-200),
    },
    GateTier {
        name: "fewer than 20 commits or at most 25% of commits",
        applies: |f| f.user_commits < 20 || f.contribution_ratio <= 0.25,
        outcome: GateOutcome::Penalty(-100),
    },
];

/// Gates for the user's own forks. First match wins.
pub const OWNED_FORK_GATES: &[GateTier] = &[
    GateTier {
        name: "no attributed commits",
        applies: |f| f.user_commits == 0,
        outcome: GateOutcome::Remove,
    },
    GateTier {
        name: "fewer than 10 commits",
        applies: |f| f.user_commits < 10,
        outcome: GateOutcome::Penalty(-250),
    },
    GateTier {
        name: "fewer than 30 commits",
        applies: |f| f.user_commits < 30,
        outcome: GateOutcome::Penalty(-150),
    },
];

/// Positive signals for enriched repositories.
pub const SIGNAL_RULES: &[Rule] = &[
    // commit volume
    Rule { name: "commits >= 100", applies: |f| f.user_commits >= 100, delta: 30 },
    Rule { name: "commits 50-99", applies: |f| (50..100).contains(&f.user_commits), delta: 20 },
    Rule { name: "commits 20-49", applies: |f| (20..50).contains(&f.user_commits), delta: 10 },
    Rule { name: "commits 5-19", applies: |f| (5..20).contains(&f.user_commits), delta: 5 },
    // code size
    Rule { name: "code >= 1000 KB", applies: |f| f.code_size_kb >= 1000, delta: 20 },
    Rule { name: "code 100-999 KB", applies: |f| (100..1000).contains(&f.code_size_kb), delta: 10 },
    Rule { name: "code 10-99 KB", applies: |f| (10..100).contains(&f.code_size_kb), delta: 5 },
    // breadth
    Rule { name: "4+ languages", applies: |f| f.language_count >= 4, delta: 15 },
    Rule { name: "2-3 languages", applies: |f| (2..4).contains(&f.language_count), delta: 8 },
    // readme
    Rule { name: "readme >= 5000 chars", applies: |f| f.readme_length >= 5000, delta: 15 },
    Rule { name: "readme 1000-4999 chars", applies: |f| (1000..5000).contains(&f.readme_length), delta: 8 },
    Rule { name: "readme 300-999 chars", applies: |f| (300..1000).contains(&f.readme_length), delta: 3 },
    Rule { name: "complex project", applies: |f| f.complexity == Some(Complexity::Complex), delta: 20 },
    Rule { name: "moderate project", applies: |f| f.complexity == Some(Complexity::Moderate), delta: 10 },
    // engineering hygiene
    Rule { name: "test script", applies: |f| f.has_test_script, delta: 10 },
    Rule { name: "build script", applies: |f| f.has_build_script, delta: 5 },
    Rule { name: "lint script", applies: |f| f.has_lint_script, delta: 5 },
    Rule { name: "has docs", applies: |f| f.has_docs, delta: 8 },
    Rule { name: "has demo", applies: |f| f.has_demo, delta: 10 },
    Rule { name: "has metrics", applies: |f| f.has_metrics, delta: 12 },
    // technology breadth
    Rule { name: "15+ technologies", applies: |f| f.technology_count >= 15, delta: 15 },
    Rule { name: "5-14 technologies", applies: |f| (5..15).contains(&f.technology_count), delta: 8 },
    Rule { name: "1-4 technologies", applies: |f| (1..5).contains(&f.technology_count), delta: 3 },
    // recency
    Rule { name: "updated within 30 days", applies: |f| f.updated_within(0, 30), delta: 15 },
    Rule { name: "updated within 180 days", applies: |f| f.updated_within(31, 180), delta: 8 },
    Rule { name: "updated within a year", applies: |f| f.updated_within(181, 365), delta: 3 },
    // popularity, public repositories only
    Rule { name: "public, stars >= 100", applies: |f| f.public && f.stars >= 100, delta: 40 },
    Rule { name: "public, stars 20-99", applies: |f| f.public && (20..100).contains(&f.stars), delta: 25 },
    Rule { name: "public, stars 5-19", applies: |f| f.public && (5..20).contains(&f.stars), delta: 10 },
    Rule { name: "public, stars 1-4", applies: |f| f.public && (1..5).contains(&f.stars), delta: 3 },
    Rule { name: "public, forks >= 20", applies: |f| f.public && f.forks >= 20, delta: 20 },
    Rule { name: "public, forks 5-19", applies: |f| f.public && (5..20).contains(&f.forks), delta: 10 },
    Rule { name: "public, forks 1-4", applies: |f| f.public && (1..5).contains(&f.forks), delta: 3 },
    Rule { name: "owned by user", applies: |f| f.owned, delta: 20 },
];

/// Minor penalties. The low-commit rule only touches owned non-forks, which
/// the gates never see, so nothing is penalised twice.
pub const PENALTY_RULES: &[Rule] = &[
    Rule { name: "empty readme", applies: |f| f.readme_length == 0, delta: -20 },
    Rule {
        name: "owned non-fork with < 5 commits",
        applies: |f| f.owned && !f.fork && f.user_commits < 5,
        delta: -20,
    },
];

/// First gate tier that matches, if any.
pub fn first_gate<'a>(tiers: &'a [GateTier], facts: &RepoFacts) -> Option<&'a GateTier> {
    tiers.iter().find(|tier| (tier.applies)(facts))
}

/// Sum of deltas of every matching rule.
pub fn apply_rules(rules: &[Rule], facts: &RepoFacts) -> i64 {
    rules
        .iter()
        .filter(|rule| (rule.applies)(facts))
        .inspect(|rule| tracing::trace!(rule = rule.name, delta = rule.delta, "rule matched"))
        .map(|rule| rule.delta)
        .sum()
}
