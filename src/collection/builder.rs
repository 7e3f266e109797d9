//! Turning resolved requests into a [`RepositoryCollection`]

use anyhow::Result;
use tracing::{debug, info};

use super::{FactoryRegistry, RepositoryCollection};
use crate::batch::ResourceRequest;
use crate::core::RepokitError;

/// Builds a collection from resolved requests
///
/// ```rust
/// use repokit_cli::batch::ResourceRequest;
/// use repokit_cli::collection::{CollectionBuilder, FactoryRegistry};
/// use serde_json::json;
///
/// # fn main() -> anyhow::Result<()> {
/// let registry = FactoryRegistry::with_builtin_kinds()?;
/// let options = json!({"url": "http://a"}).as_object().cloned().unwrap();
/// let collection = CollectionBuilder::new(&registry)
///     .distro(Some("rhel7".to_string()))
///     .build(&[ResourceRequest::new("YumRepository", options)])?;
/// assert_eq!(collection.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CollectionBuilder<'a> {
    registry: &'a FactoryRegistry,
    distro: Option<String>,
    fallback_distro: Option<String>,
    require_distro: bool,
}

impl<'a> CollectionBuilder<'a> {
    /// Creates a builder using `registry` for factory lookups.
    #[must_use]
    pub fn new(registry: &'a FactoryRegistry) -> Self {
        Self {
            registry,
            distro: None,
            fallback_distro: None,
            require_distro: false,
        }
    }

    /// The batch's own distro directive.
    #[must_use]
    pub fn distro(mut self, distro: Option<String>) -> Self {
        self.distro = distro;
        self
    }

    /// Distro supplied by the caller's context, used when the batch has none.
    #[must_use]
    pub fn fallback_distro(mut self, distro: Option<String>) -> Self {
        self.fallback_distro = distro;
        self
    }

    /// Fail with [`RepokitError::MissingDistro`] when no distro is available.
    #[must_use]
    pub fn require_distro(mut self, required: bool) -> Self {
        self.require_distro = required;
        self
    }

    /// Validates every kind, then invokes the factories in order.
    ///
    /// No factory runs unless every kind is registered and the distro
    /// requirement is met. A factory error aborts the build unchanged.
    pub fn build(self, requests: &[ResourceRequest]) -> Result<RepositoryCollection> {
        for request in requests {
            self.registry.check_kind(&request.kind)?;
        }

        let distro = self.distro.or(self.fallback_distro);
        if distro.is_none() && self.require_distro {
            return Err(RepokitError::MissingDistro {
                context: "repository collection".to_string(),
            }
            .into());
        }

        let mut handles = Vec::with_capacity(requests.len());
        for request in requests {
            debug!("Building {} handle", request.kind);
            handles.push(self.registry.create(&request.kind, &request.options)?);
        }

        info!(
            "Built repository collection with {} handle(s), distro {}",
            handles.len(),
            distro.as_deref().unwrap_or("<none>")
        );
        Ok(RepositoryCollection::new(distro, handles))
    }
}
