use super::{bounded_unique, MAX_ENTRIES};

const MAX_INPUT_LEN: usize = 100 * 1024;

/// Parses `go.mod`, taking the last path segment of each required module.
///
/// Handles both `require path v1.2.3` and `require ( ... )` blocks. A major
/// version suffix (`/v2`) is skipped so `github.com/org/pkg/v2` yields `pkg`.
pub fn parse_go_mod(text: &str) -> Vec<String> {
    if text.len() > MAX_INPUT_LEN {
        return Vec::new();
    }

    let mut names = Vec::new();
    let mut in_block = false;

    for raw in text.lines() {
        let line = raw.split("//").next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        if in_block {
            if line.starts_with(')') {
                in_block = false;
                continue;
            }
            if let Some(name) = line.split_whitespace().next().and_then(module_name) {
                names.push(name);
            }
            continue;
        }

        let Some(rest) = line.strip_prefix("require") else {
            continue;
        };
        let rest = rest.trim_start();
        if rest.starts_with('(') {
            in_block = true;
        } else if let Some(name) = rest.split_whitespace().next().and_then(module_name) {
            names.push(name);
        }
    }

    bounded_unique(names, MAX_ENTRIES)
}

fn module_name(path: &str) -> Option<&str> {
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let last = segments.next()?;
    if is_major_version(last) {
        segments.next().or(Some(last))
    } else {
        Some(last)
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}
