use super::{bounded_unique, MAX_ENTRIES};

const MAX_INPUT_LEN: usize = 100 * 1024;

/// Parses `Cargo.toml` dependency tables line by line.
///
/// Any table whose header ends in `dependencies]` (plain, dev, build,
/// workspace or target-specific) switches capture on; any other header
/// switches it off. The dotted form `[dependencies.serde]` yields `serde`.
pub fn parse_cargo_toml(text: &str) -> Vec<String> {
    if text.len() > MAX_INPUT_LEN {
        return Vec::new();
    }

    let mut names = Vec::new();
    let mut in_deps = false;
    let mut open_inline_table = false;

    for raw in text.lines() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        if open_inline_table {
            open_inline_table = !line.contains('}');
            continue;
        }

        if line.starts_with('[') {
            let header = line.trim_matches(|c| c == '[' || c == ']').trim();
            in_deps = header.ends_with("dependencies");
            if !in_deps {
                if let Some((_, name)) = header.split_once("dependencies.") {
                    names.push(name.trim_matches('"').to_string());
                }
            }
            continue;
        }

        if !in_deps {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            names.push(key.trim().trim_matches('"').to_string());
            open_inline_table = value.contains('{') && !value.contains('}');
        }
    }

    bounded_unique(names, MAX_ENTRIES)
}
