//! Python dependency extraction: `requirements.txt`, `pyproject.toml`, `setup.py`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{bounded_unique, MAX_ENTRIES};

const MAX_INPUT_LEN: usize = 100 * 1024;

/// Leading distribution name, before extras or any version operator.
static REQ_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)").expect("valid requirement name regex")
});
static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("valid quoted string regex"));
static INSTALL_REQUIRES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"install_requires\s*=\s*\[((?:[^\]"']|"[^"]*"|'[^']*')*)\]"#)
        .expect("valid install_requires regex")
});

fn requirement_name(spec: &str) -> Option<&str> {
    REQ_NAME_RE
        .captures(spec)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn quoted_strings(text: &str) -> impl Iterator<Item = &str> {
    QUOTED_RE.captures_iter(text).filter_map(|c| {
        c.get(1)
            .or_else(|| c.get(2))
            .map(|m| m.as_str())
    })
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map(|(head, _)| head).unwrap_or(line)
}

/// Parses a pip requirements file.
///
/// Option lines (`-r`, `-e`, `--index-url`) and URL requirements are skipped.
pub fn parse_requirements(text: &str) -> Vec<String> {
    if text.len() > MAX_INPUT_LEN {
        return Vec::new();
    }
    let names = text
        .lines()
        .map(|line| strip_comment(line).trim())
        .filter(|line| !line.is_empty() && !line.starts_with('-') && !line.contains("://"))
        .filter_map(requirement_name);
    bounded_unique(names, MAX_ENTRIES)
}

/// Parses `pyproject.toml` for PEP 621 dependency arrays and Poetry
/// dependency tables.
pub fn parse_pyproject(text: &str) -> Vec<String> {
    if text.len() > MAX_INPUT_LEN {
        return Vec::new();
    }

    let mut names: Vec<String> = Vec::new();
    let mut section = String::new();
    let mut in_array = false;

    for raw in text.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if in_array {
            names.extend(quoted_strings(line).filter_map(requirement_name).map(String::from));
            if QUOTED_RE.replace_all(line, "").contains(']') {
                in_array = false;
            }
            continue;
        }

        if line.starts_with('[') {
            section = line.trim_matches(|c| c == '[' || c == ']').trim().to_string();
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().trim_matches('"');
        let value = value.trim_start();

        let is_pep621_array = (section == "project" && key == "dependencies")
            || section == "project.optional-dependencies";
        let is_poetry_table = section.starts_with("tool.poetry") && section.ends_with("dependencies");

        if is_pep621_array && value.starts_with('[') {
            names.extend(quoted_strings(value).filter_map(requirement_name).map(String::from));
            in_array = !QUOTED_RE.replace_all(value, "").contains(']');
        } else if is_poetry_table && !key.eq_ignore_ascii_case("python") {
            names.push(key.to_string());
        }
    }

    bounded_unique(names, MAX_ENTRIES)
}

/// Parses the `install_requires=[...]` list of a `setup.py`.
pub fn parse_setup_py(text: &str) -> Vec<String> {
    if text.len() > MAX_INPUT_LEN {
        return Vec::new();
    }
    let names = INSTALL_REQUIRES_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .flat_map(|body| quoted_strings(body.as_str()))
        .filter_map(requirement_name);
    bounded_unique(names, MAX_ENTRIES)
}
