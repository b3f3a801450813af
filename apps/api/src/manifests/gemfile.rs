use once_cell::sync::Lazy;
use regex::Regex;

use super::{bounded_unique, MAX_ENTRIES};

const MAX_INPUT_LEN: usize = 100 * 1024;

static GEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*gem\s+(?:'([^']+)'|"([^"]+)")"#).expect("valid gem regex")
});

/// Parses a `Gemfile` for `gem 'name'` / `gem "name"` lines.
pub fn parse_gemfile(text: &str) -> Vec<String> {
    if text.len() > MAX_INPUT_LEN {
        return Vec::new();
    }
    let names = GEM_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str());
    bounded_unique(names, MAX_ENTRIES)
}
