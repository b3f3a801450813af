//! Jupyter notebook scanning: import roots and ML / data-science flags.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{bounded_unique, MAX_ENTRIES};

/// Notebooks embed outputs, so they get a wider ceiling than text manifests.
pub const MAX_NOTEBOOK_LEN: usize = 5 * 1024 * 1024;

const ML_MODULES: &[&str] = &[
    "tensorflow",
    "torch",
    "keras",
    "sklearn",
    "xgboost",
    "lightgbm",
    "catboost",
    "transformers",
    "jax",
    "pytorch_lightning",
];

const DATA_SCIENCE_MODULES: &[&str] = &[
    "pandas",
    "numpy",
    "matplotlib",
    "seaborn",
    "scipy",
    "plotly",
    "statsmodels",
    "polars",
];

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:import|from)\s+([A-Za-z_][A-Za-z0-9_]*)").expect("valid import regex")
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookInsights {
    /// Top-level module roots imported by code cells.
    pub imports: Vec<String>,
    pub is_ml_project: bool,
    pub is_data_science: bool,
}

/// Parses an `.ipynb` document. Only code cells are scanned; markdown cells
/// that mention `import` are ignored. `None` for malformed notebooks or
/// notebooks without any import.
pub fn parse_notebook(text: &str) -> Option<NotebookInsights> {
    if text.len() > MAX_NOTEBOOK_LEN {
        return None;
    }
    let doc: Value = serde_json::from_str(text).ok()?;
    let cells = doc.get("cells")?.as_array()?;

    let mut roots = Vec::new();
    for cell in cells {
        if cell.get("cell_type").and_then(Value::as_str) != Some("code") {
            continue;
        }
        let source = match cell.get("source") {
            Some(Value::String(s)) => s.clone(),
            // list entries already carry their own trailing newlines
            Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect(),
            _ => continue,
        };
        roots.extend(
            IMPORT_RE
                .captures_iter(&source)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
        );
    }

    // Flags look at every import root; only the reported list is capped.
    let matches_any = |set: &[&str]| {
        roots
            .iter()
            .any(|root| set.iter().any(|m| m.eq_ignore_ascii_case(root)))
    };
    let is_ml_project = matches_any(ML_MODULES);
    let is_data_science = matches_any(DATA_SCIENCE_MODULES);

    let imports = bounded_unique(roots, MAX_ENTRIES);
    if imports.is_empty() {
        return None;
    }

    Some(NotebookInsights {
        imports,
        is_ml_project,
        is_data_science,
    })
}
