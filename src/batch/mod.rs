//! Declarative repository batches
//!
//! A batch is what a test author writes into a parametrization: a mapping
//! from resource kind to either one options table or a list of them, plus an
//! optional top-level `distro` directive.
//!
//! ```toml
//! distro = "rhel7"
//! SatelliteToolsRepository = {}
//! RHELAnsibleEngineRepository = { cdn = true }
//!
//! [[YumRepository]]
//! url = "http://example.com/yum_0"
//!
//! [[YumRepository]]
//! url = "http://example.com/yum_6"
//! ```
//!
//! The same batch in YAML or JSON is accepted too (see [`io`]). Document
//! order is preserved and defines the order of the normalized requests.
//!
//! # Modules
//!
//! - [`normalize`] - flattens a [`RequestBatch`] into a [`NormalizedBatch`]
//! - [`option_value`] - classification of literal and indirect option values
//! - [`io`] - reading batches from files

pub mod io;
pub mod normalize;
pub mod option_value;


use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::core::RepokitError;

pub use normalize::{NormalizedBatch, normalize};
pub use option_value::OptionValue;

/// Options of one batch item. Keys are unique; their order carries no meaning.
pub type Options = serde_json::Map<String, Value>;

/// Value declared for one kind in a batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    /// One item of this kind (or the scalar value of the `distro` directive)
    Single(Value),
    /// N items of this kind, in list order
    Many(Vec<Value>),
}

impl BatchEntry {
    /// Wraps a declared value: arrays become [`BatchEntry::Many`].
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Many(items),
            other => Self::Single(other),
        }
    }
}

/// Ordered sequence of `(kind, entry)` pairs
///
/// Parsed documents have unique keys, but batches assembled with
/// [`RequestBatch::push`] may repeat a kind; normalization decides whether a
/// repetition is legal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBatch {
    entries: Vec<(String, BatchEntry)>,
}

impl RequestBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, kind: impl Into<String>, entry: BatchEntry) -> &mut Self {
        self.entries.push((kind.into(), entry));
        self
    }

    /// Builder form of [`push`](Self::push) taking a raw declared value.
    #[must_use]
    pub fn with(mut self, kind: impl Into<String>, value: Value) -> Self {
        self.entries.push((kind.into(), BatchEntry::from_value(value)));
        self
    }

    /// Builds a batch from a document value whose top level must be a mapping.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                entries: map.into_iter().map(|(k, v)| (k, BatchEntry::from_value(v))).collect(),
            }),
            Value::Null => Ok(Self::new()),
            other => Err(RepokitError::ConfigurationError {
                message: format!("a batch must be a mapping of resource kinds, got {}", kind_of(&other)),
            }
            .into()),
        }
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[(String, BatchEntry)] {
        &self.entries
    }

    /// Number of declared kinds (not items).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch declares nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One requested resource after normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRequest {
    /// Kind tag used to look up the factory
    pub kind: String,
    /// The item's options
    pub options: Options,
}

impl ResourceRequest {
    /// Creates a request.
    pub fn new(kind: impl Into<String>, options: Options) -> Self {
        Self {
            kind: kind.into(),
            options,
        }
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_preserves_document_order() {
        let batch = RequestBatch::from_value(json!({
            "YumRepository": {"url": "http://a"},
            "distro": "rhel8",
            "DockerRepository": {},
        }))
        .unwrap();

        let kinds: Vec<&str> = batch.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(kinds, vec!["YumRepository", "distro", "DockerRepository"]);
    }

    #[test]
    fn test_from_value_rejects_non_mapping() {
        let err = RequestBatch::from_value(json!(["YumRepository"])).unwrap_err();
        assert!(err.to_string().contains("got a list"));
    }

    #[test]
    fn test_null_is_empty_batch() {
        assert!(RequestBatch::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_push_allows_repeated_kinds() {
        let mut batch = RequestBatch::new();
        batch
            .push("distro", BatchEntry::Single(json!("rhel7")))
            .push("distro", BatchEntry::Single(json!("rhel8")));
        assert_eq!(batch.len(), 2);
    }
}
