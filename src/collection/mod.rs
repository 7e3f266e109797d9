//! Repository collections
//!
//! A [`RepositoryCollection`] owns the handles built from one batch plus the
//! batch's distro. It is exclusively owned by the fixture scope that built it
//! and moves through two states:
//!
//! ```text
//! Built --setup_content(org, lce)--> ContentBound
//! ```
//!
//! There is no way back; a new scope builds a new collection. Once bound,
//! [`RepositoryCollection::setup_virtual_machine`] registers content hosts
//! against the collection without changing its state.
//!
//! # Modules
//!
//! - [`registry`] - [`FactoryRegistry`] mapping kind tags to constructors
//! - [`repositories`] - built-in custom and Red Hat repository handles
//! - [`builder`] - [`CollectionBuilder`]
//! - [`fixture`] - [`CollectionFixture`], the normalize/resolve/build pipeline

pub mod builder;
pub mod fixture;
pub mod registry;
pub mod repositories;


use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::backend::{ActivationKeyRequest, ContentBackend, EntityRef, HostRegistration, RepositoryInfo};
use crate::core::{ProvisionTarget, RepokitError, RepositoryOrigin, ResourceHandle};

pub use builder::CollectionBuilder;
pub use fixture::CollectionFixture;
pub use registry::{Factory, FactoryRegistry};
pub use repositories::{CustomRepository, RedHatRepository};

/// Lifecycle state of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionState {
    /// Handles constructed, nothing created remotely
    Built,
    /// Bound to an organization and lifecycle environment
    ContentBound,
}

/// Identifiers recorded by [`RepositoryCollection::setup_content`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupContentData {
    /// Organization the collection is bound to
    pub org_id: u64,
    /// Lifecycle environment the content was promoted to
    pub lce: EntityRef,
    /// Custom product holding the custom repositories
    pub product: Option<EntityRef>,
    /// One entry per handle, in collection order
    pub repositories: Vec<RepositoryInfo>,
    /// Content view holding every repository
    pub content_view: EntityRef,
    /// Published and promoted version
    pub content_view_version: EntityRef,
    /// Activation key registering hosts to the content
    pub activation_key: EntityRef,
}

/// Ordered repository handles plus the batch's distro
#[derive(Debug)]
pub struct RepositoryCollection {
    distro: Option<String>,
    handles: Vec<Box<dyn ResourceHandle>>,
    setup: Option<SetupContentData>,
}

impl RepositoryCollection {
    pub(crate) fn new(distro: Option<String>, handles: Vec<Box<dyn ResourceHandle>>) -> Self {
        Self {
            distro,
            handles,
            setup: None,
        }
    }

    /// Distro of the whole collection.
    pub fn distro(&self) -> Option<&str> {
        self.distro.as_deref()
    }

    /// Handles in batch order.
    pub fn handles(&self) -> &[Box<dyn ResourceHandle>] {
        &self.handles
    }

    /// Number of handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the collection has no handles.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Current state.
    pub fn state(&self) -> CollectionState {
        if self.setup.is_some() {
            CollectionState::ContentBound
        } else {
            CollectionState::Built
        }
    }

    /// Data recorded by [`setup_content`](Self::setup_content), once bound.
    pub fn setup_content_data(&self) -> Option<&SetupContentData> {
        self.setup.as_ref()
    }

    /// Whether any handle lives in a custom product.
    pub fn has_custom_repositories(&self) -> bool {
        self.handles.iter().any(|h| h.origin() == RepositoryOrigin::Custom)
    }

    /// Binds the collection to `org_id` and `lce_id` on the remote platform.
    ///
    /// Creates a custom product when needed, provisions every handle in
    /// order (create or enable, then sync), creates and publishes a content
    /// view with all repositories, promotes it to `lce_id` and creates an
    /// activation key.
    ///
    /// # Errors
    ///
    /// - [`RepokitError::CollectionAlreadyBound`] when called twice
    /// - [`RepokitError::MissingDistro`] when a Red Hat repository has no distro
    /// - any backend error, unchanged; the collection then stays `Built`
    ///   and entities created before the failure are left in place
    pub fn setup_content(
        &mut self,
        backend: &mut dyn ContentBackend,
        org_id: u64,
        lce_id: u64,
    ) -> Result<&SetupContentData> {
        if let Some(existing) = &self.setup {
            return Err(RepokitError::CollectionAlreadyBound {
                org_id: existing.org_id,
                lce_id: existing.lce.id,
            }
            .into());
        }

        let product = if self.has_custom_repositories() {
            Some(backend.create_product(org_id, &unique_name("repokit-product"))?)
        } else {
            None
        };

        let target = ProvisionTarget {
            org_id,
            product: product.as_ref(),
            distro: self.distro.as_deref(),
        };
        let mut repositories = Vec::with_capacity(self.handles.len());
        for handle in &self.handles {
            let info = handle.provision(backend, &target)?;
            debug!("Provisioned {} as repository {} ({})", info.kind, info.id, info.name);
            repositories.push(info);
        }

        let repository_ids: Vec<u64> = repositories.iter().map(|r| r.id).collect();
        let content_view =
            backend.create_content_view(org_id, &unique_name("repokit-cv"), &repository_ids)?;
        let content_view_version = backend.publish_content_view(content_view.id)?;
        let lce = backend.promote_content_view_version(content_view_version.id, lce_id)?;
        let activation_key = backend.create_activation_key(&ActivationKeyRequest {
            org_id,
            name: unique_name("repokit-ak"),
            content_view_id: content_view.id,
            lce_id,
        })?;

        info!(
            "Bound {} repositories to organization {} / lifecycle environment {} (activation key {})",
            repositories.len(),
            org_id,
            lce.name,
            activation_key.name
        );
        Ok(self.setup.insert(SetupContentData {
            org_id,
            lce,
            product,
            repositories,
            content_view,
            content_view_version,
            activation_key,
        }))
    }

    /// Registers `hostname` with the collection's activation key, then
    /// enables every repository of the collection on it, in collection order.
    ///
    /// # Errors
    ///
    /// - [`RepokitError::CollectionNotBound`] while the collection is `Built`
    /// - any backend error, unchanged
    pub fn setup_virtual_machine(
        &self,
        backend: &mut dyn ContentBackend,
        hostname: &str,
    ) -> Result<EntityRef> {
        let setup = self.setup.as_ref().ok_or_else(|| RepokitError::CollectionNotBound {
            operation: format!("set up content host {hostname}"),
        })?;

        let host = backend.register_host(&HostRegistration {
            hostname: hostname.to_string(),
            org_id: setup.org_id,
            activation_key: setup.activation_key.name.clone(),
        })?;
        for repository in &setup.repositories {
            backend.enable_host_repository(host.id, &repository.name)?;
        }

        info!(
            "Registered host {} with activation key {} ({} repositories enabled)",
            host.name,
            setup.activation_key.name,
            setup.repositories.len()
        );
        Ok(host)
    }
}

/// `prefix` followed by eight random hex characters.
pub(crate) fn unique_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &id[..8])
}
