//! The repository-collection fixture pipeline
//!
//! Ties the three stages together the way a test fixture uses them:
//!
//! ```text
//! RequestBatch --normalize--> (distro, requests)
//!              --resolve----> requests with indirect values replaced
//!              --build------> RepositoryCollection
//!              --bind-------> (optional) setup_content(org, lce)
//! ```
//!
//! Two presets mirror the usual fixtures:
//!
//! - [`CollectionFixture::function`]: function scope; the distro falls back
//!   to the invocation's `distro` parameter and is required.
//! - [`CollectionFixture::module`]: module scope; function-scoped parameters
//!   are invisible and the distro may stay unset.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use super::{CollectionBuilder, FactoryRegistry, RepositoryCollection};
use crate::backend::ContentBackend;
use crate::batch::{NormalizedBatch, RequestBatch, kind_of, normalize};
use crate::constants::{DEFAULT_INDIRECTION_KEYS, DISTRO_KEY};
use crate::context::{FixtureScope, InvocationContext, resolve_requests};
use crate::core::RepokitError;

/// Settings for assembling collections at one fixture scope
#[derive(Debug, Clone)]
pub struct CollectionFixture<'a> {
    registry: &'a FactoryRegistry,
    scope: FixtureScope,
    indirection_keys: Vec<String>,
    require_distro: bool,
}

impl<'a> CollectionFixture<'a> {
    /// Creates a fixture at `scope` with the default indirection keys.
    #[must_use]
    pub fn new(registry: &'a FactoryRegistry, scope: FixtureScope) -> Self {
        Self {
            registry,
            scope,
            indirection_keys: DEFAULT_INDIRECTION_KEYS.iter().map(ToString::to_string).collect(),
            require_distro: false,
        }
    }

    /// Function-scoped preset: distro required.
    #[must_use]
    pub fn function(registry: &'a FactoryRegistry) -> Self {
        Self::new(registry, FixtureScope::Function).require_distro(true)
    }

    /// Module-scoped preset: distro optional.
    #[must_use]
    pub fn module(registry: &'a FactoryRegistry) -> Self {
        Self::new(registry, FixtureScope::Module)
    }

    /// Replaces the keys honouring the `key = "key"` sentinel.
    #[must_use]
    pub fn indirection_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indirection_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a missing distro is an error.
    #[must_use]
    pub fn require_distro(mut self, required: bool) -> Self {
        self.require_distro = required;
        self
    }

    /// Scope the fixture resolves parameters from.
    pub fn scope(&self) -> FixtureScope {
        self.scope
    }

    /// Whether [`assemble`](Self::assemble) fails without a distro.
    pub fn requires_distro(&self) -> bool {
        self.require_distro
    }

    /// Normalizes and resolves `batch` without invoking any factory.
    ///
    /// The returned distro is the batch's directive or, when it has none,
    /// the `distro` parameter visible from this fixture's scope.
    ///
    /// # Errors
    ///
    /// Normalizer and resolver errors, plus
    /// [`RepokitError::ConfigurationError`] when the fallback `distro`
    /// parameter is bound to something other than a string.
    pub fn resolve(&self, batch: &RequestBatch, ctx: &InvocationContext) -> Result<NormalizedBatch> {
        let normalized = normalize(batch)?;
        let requests = resolve_requests(normalized.requests, ctx, self.scope, self.indirection_keys.as_slice())?;

        let distro = match normalized.distro {
            Some(distro) => Some(distro),
            None => {
                let fallback = self.context_distro(ctx)?;
                debug!("Batch has no distro, falling back to context value {:?}", fallback);
                fallback
            }
        };
        Ok(NormalizedBatch {
            distro,
            requests,
        })
    }

    fn context_distro(&self, ctx: &InvocationContext) -> Result<Option<String>> {
        match ctx.lookup(DISTRO_KEY, self.scope) {
            None => Ok(None),
            Some(Value::String(distro)) => Ok(Some(distro.clone())),
            Some(other) => Err(RepokitError::ConfigurationError {
                message: format!(
                    "parameter '{DISTRO_KEY}' visible from {} scope must be a string, got {}",
                    self.scope,
                    kind_of(other)
                ),
            }
            .into()),
        }
    }

    /// Normalizes, resolves and builds `batch`.
    pub fn assemble(&self, batch: &RequestBatch, ctx: &InvocationContext) -> Result<RepositoryCollection> {
        let resolved = self.resolve(batch, ctx)?;
        CollectionBuilder::new(self.registry)
            .distro(resolved.distro)
            .require_distro(self.require_distro)
            .build(&resolved.requests)
    }

    /// [`assemble`](Self::assemble) followed by
    /// [`setup_content`](RepositoryCollection::setup_content).
    pub fn assemble_with_setup(
        &self,
        batch: &RequestBatch,
        ctx: &InvocationContext,
        backend: &mut dyn ContentBackend,
        org_id: u64,
        lce_id: u64,
    ) -> Result<RepositoryCollection> {
        let mut collection = self.assemble(batch, ctx)?;
        collection.setup_content(backend, org_id, lce_id)?;
        Ok(collection)
    }
}
