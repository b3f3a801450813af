use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{bounded_unique, MAX_ENTRIES};

const MAX_INPUT_LEN: usize = 500 * 1024;
const MAX_SCRIPTS: usize = 50;
const MAX_DESCRIPTION_CHARS: usize = 500;

/// Summary of a `package.json`: dependency names, script names, description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub dev_dependencies: Vec<String>,
    #[serde(default)]
    pub scripts: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parses `package.json`, reading keys (never versions) of `dependencies`,
/// `devDependencies` and `scripts`. Non-object or malformed JSON yields `None`.
pub fn parse_package_json(text: &str) -> Option<PackageManifest> {
    if text.len() > MAX_INPUT_LEN {
        return None;
    }
    let root = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        _ => return None,
    };

    let description = root
        .get("description")
        .and_then(Value::as_str)
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(|d| d.chars().take(MAX_DESCRIPTION_CHARS).collect());

    Some(PackageManifest {
        dependencies: object_keys(&root, "dependencies", MAX_ENTRIES),
        dev_dependencies: object_keys(&root, "devDependencies", MAX_ENTRIES),
        scripts: object_keys(&root, "scripts", MAX_SCRIPTS),
        description,
    })
}

fn object_keys(root: &Map<String, Value>, field: &str, cap: usize) -> Vec<String> {
    match root.get(field) {
        Some(Value::Object(map)) => bounded_unique(map.keys(), cap),
        _ => Vec::new(),
    }
}
