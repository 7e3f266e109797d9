//! Reading batches from files
//!
//! A batch file holds either one batch or a parametrization set of several.
//! Each batch in a set yields its own collection, the way each entry of a
//! parametrized fixture yields its own test instance.
//!
//! | Format | One batch              | Several batches                   |
//! |--------|------------------------|-----------------------------------|
//! | TOML   | top-level table        | `[[batches]]` array of tables     |
//! | YAML   | top-level mapping      | top-level sequence                |
//! | JSON   | top-level object       | top-level array                   |

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::RequestBatch;
use crate::core::RepokitError;

/// Key holding a parametrization set in TOML documents.
const BATCHES_KEY: &str = "batches";

/// Document formats accepted for batch files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchFormat {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl BatchFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(RepokitError::BatchParseError {
                file: path.display().to_string(),
                reason: "expected a .toml, .yaml, .yml or .json file".to_string(),
            }
            .into()),
        }
    }
}

/// Reads every batch declared in `path`.
pub fn load_batches(path: &Path) -> Result<Vec<RequestBatch>> {
    let format = BatchFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;
    parse_batches(&content, format, &path.display().to_string())
}

/// Parses the batches of a document. `label` names the source in errors.
pub fn parse_batches(content: &str, format: BatchFormat, label: &str) -> Result<Vec<RequestBatch>> {
    let parse_error = |reason: String| RepokitError::BatchParseError {
        file: label.to_string(),
        reason,
    };

    let document: Value = match format {
        BatchFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        BatchFormat::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        BatchFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
    };

    let items = match document {
        Value::Array(items) => items,
        Value::Object(map) if map.len() == 1 && map.get(BATCHES_KEY).is_some_and(Value::is_array) => map
            .into_iter()
            .flat_map(|(_, set)| match set {
                Value::Array(items) => items,
                _ => Vec::new(),
            })
            .collect(),
        other => vec![other],
    };

    items.into_iter().map(RequestBatch::from_value).collect()
}
