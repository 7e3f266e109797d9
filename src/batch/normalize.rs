//! Batch normalization
//!
//! Flattens a [`RequestBatch`] into one [`ResourceRequest`] per requested
//! item and extracts the shared `distro` directive.
//!
//! ```text
//! { distro: rhel7, SatelliteToolsRepository: {}, YumRepository: [{url: a}, {url: b}] }
//!
//! => distro = Some("rhel7")
//!    [ (SatelliteToolsRepository, {}),
//!      (YumRepository, {url: a}),
//!      (YumRepository, {url: b}) ]
//! ```

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{BatchEntry, Options, RequestBatch, ResourceRequest, kind_of};
use crate::constants::DISTRO_KEY;
use crate::core::RepokitError;

/// Output of [`normalize`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedBatch {
    /// The batch-wide distro directive, if declared
    pub distro: Option<String>,
    /// One request per item, in declaration order
    pub requests: Vec<ResourceRequest>,
}

/// Flattens `batch` into ordered requests and the shared directive.
///
/// List entries expand to one request per element (an empty list contributes
/// nothing). The `distro` directive may appear once and must be a string.
/// Every other item must be an options table.
///
/// # Errors
///
/// [`RepokitError::ConfigurationError`] when the directive is repeated or not
/// a string, or when an item is not a table.
pub fn normalize(batch: &RequestBatch) -> Result<NormalizedBatch> {
    let mut flattened: Vec<(&str, &Value)> = Vec::new();
    for (kind, entry) in batch.entries() {
        match entry {
            BatchEntry::Many(items) => {
                flattened.extend(items.iter().map(|item| (kind.as_str(), item)));
            }
            BatchEntry::Single(value) => flattened.push((kind.as_str(), value)),
        }
    }

    let mut directives = flattened.iter().filter(|(kind, _)| *kind == DISTRO_KEY);
    let directive = directives.next().map(|(_, value)| *value);
    if directives.next().is_some() {
        return Err(RepokitError::ConfigurationError {
            message: format!("duplicate '{DISTRO_KEY}' directive in batch"),
        }
        .into());
    }

    let distro = match directive {
        None => None,
        Some(Value::String(distro)) => Some(distro.clone()),
        Some(other) => {
            return Err(RepokitError::ConfigurationError {
                message: format!("'{DISTRO_KEY}' directive must be a string, got {}", kind_of(other)),
            }
            .into());
        }
    };

    let mut requests = Vec::with_capacity(flattened.len());
    for (kind, value) in flattened.into_iter().filter(|(kind, _)| *kind != DISTRO_KEY) {
        let options = as_options(kind, value)?;
        debug!("Normalized request {} with {} option(s)", kind, options.len());
        requests.push(ResourceRequest::new(kind, options));
    }

    Ok(NormalizedBatch {
        distro,
        requests,
    })
}

fn as_options(kind: &str, value: &Value) -> Result<Options> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        // `YumRepository:` with no body in YAML
        Value::Null => Ok(Options::new()),
        other => Err(RepokitError::ConfigurationError {
            message: format!("options for '{kind}' must be a table, got {}", kind_of(other)),
        }
        .into()),
    }
}
