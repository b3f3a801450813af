use once_cell::sync::Lazy;
use regex::Regex;

use super::{bounded_unique, MAX_ENTRIES};

const MAX_INPUT_LEN: usize = 200 * 1024;

static FIND_PACKAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfind_package\s*\(\s*([A-Za-z0-9_.+-]+)").expect("valid find_package regex")
});

/// Parses `CMakeLists.txt` for `find_package(NAME ...)` calls.
pub fn parse_cmake(text: &str) -> Vec<String> {
    if text.len() > MAX_INPUT_LEN {
        return Vec::new();
    }
    let names = FIND_PACKAGE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());
    bounded_unique(names, MAX_ENTRIES)
}
