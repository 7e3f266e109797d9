//! Resolution of indirect option values
//!
//! Runs after normalization and before building: every option classified as
//! [`OptionValue::Indirect`] is replaced by the value bound in the
//! [`InvocationContext`]. Options that are absent stay absent; nothing is
//! defaulted here.

use anyhow::{Context, Result};
use tracing::debug;

use super::{FixtureScope, InvocationContext};
use crate::batch::{OptionValue, Options, ResourceRequest};

/// Resolves the indirect values of one item's options.
///
/// `scope` is the scope of the fixture building the collection and limits
/// which bindings are visible. `indirection_keys` are the keys honouring the
/// `key = "key"` sentinel.
///
/// # Errors
///
/// [`RepokitError::MissingFixtureValue`](crate::core::RepokitError::MissingFixtureValue)
/// when an indirect value names a parameter that is not visible.
pub fn resolve_options<S: AsRef<str>>(
    options: &Options,
    ctx: &InvocationContext,
    scope: FixtureScope,
    indirection_keys: &[S],
) -> Result<Options> {
    let mut resolved = Options::new();
    for (key, raw) in options {
        let value = match OptionValue::classify(key, raw, indirection_keys) {
            OptionValue::Literal(value) => value,
            OptionValue::Indirect {
                param,
            } => {
                let value = ctx.require(&param, scope)?.clone();
                debug!("Resolved option '{}' from parameter '{}' to {}", key, param, value);
                value
            }
        };
        resolved.insert(key.clone(), value);
    }
    Ok(resolved)
}

/// Applies [`resolve_options`] to every request, keeping order.
pub fn resolve_requests<S: AsRef<str>>(
    requests: Vec<ResourceRequest>,
    ctx: &InvocationContext,
    scope: FixtureScope,
    indirection_keys: &[S],
) -> Result<Vec<ResourceRequest>> {
    requests
        .into_iter()
        .enumerate()
        .map(|(index, request)| {
            let options = resolve_options(&request.options, ctx, scope, indirection_keys)
                .with_context(|| format!("Failed to resolve options of {} (item {index})", request.kind))?;
            Ok(ResourceRequest {
                kind: request.kind,
                options,
            })
        })
        .collect()
}
