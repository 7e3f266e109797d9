//! Seam to the remote content platform
//!
//! Binding a collection creates organization-scoped entities on the product
//! under test; setting up a content host registers it with the resulting
//! activation key. Those calls go through [`ContentBackend`], implemented by the
//! client layer of the surrounding harness. Calls are blocking and made one
//! at a time; timeouts and retries belong to the implementation.
//!
//! [`RecordingBackend`] is an in-memory implementation that hands out ids and
//! records every call. Tests use it to assert call order, and the CLI uses it
//! to print the calls a binding would make.

pub mod memory;

use anyhow::Result;
use serde::Serialize;

use crate::core::{ContentType, RepositoryOrigin};

pub use memory::{BackendCall, BackendOperation, RecordingBackend};

/// Identity of an entity created on the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    /// Platform id
    pub id: u64,
    /// Display name
    pub name: String,
}

impl EntityRef {
    /// Creates a reference.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A custom repository to create inside a product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryDraft {
    /// Product receiving the repository
    pub product_id: u64,
    /// Repository name
    pub name: String,
    /// Content type
    pub content_type: ContentType,
    /// Feed URL
    pub url: Option<String>,
}

/// A Red Hat repository to enable from the organization's manifest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedHatRepositoryRequest {
    /// Organization owning the manifest
    pub org_id: u64,
    /// Repository set key (e.g. `"rhst"`)
    pub reposet: String,
    /// Distro selecting the repository inside the set
    pub distro: String,
    /// Serve content from the CDN instead of a local mirror
    pub cdn: bool,
}

/// An activation key to create for the bound content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationKeyRequest {
    /// Owning organization
    pub org_id: u64,
    /// Key name
    pub name: String,
    /// Content view the key registers hosts to
    pub content_view_id: u64,
    /// Lifecycle environment the key registers hosts to
    pub lce_id: u64,
}

/// A content host to register against bound content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRegistration {
    /// Host name as known to the platform
    pub hostname: String,
    /// Organization the host registers to
    pub org_id: u64,
    /// Activation key used for registration
    pub activation_key: String,
}

/// What a handle reports after provisioning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryInfo {
    /// Kind tag of the handle
    pub kind: String,
    /// Platform id
    pub id: u64,
    /// Repository name
    pub name: String,
    /// Content type
    pub content_type: ContentType,
    /// Custom or Red Hat
    pub origin: RepositoryOrigin,
    /// Feed URL for custom repositories
    pub url: Option<String>,
    /// Distro used for Red Hat repositories
    pub distro: Option<String>,
}

/// Client operations needed to bind a collection
///
/// Errors are returned to the caller unchanged; nothing in this crate wraps
/// or retries them.
pub trait ContentBackend {
    /// Creates a custom product in `org_id`.
    fn create_product(&mut self, org_id: u64, name: &str) -> Result<EntityRef>;

    /// Creates a custom repository.
    fn create_repository(&mut self, draft: &RepositoryDraft) -> Result<EntityRef>;

    /// Enables a Red Hat repository.
    fn enable_redhat_repository(&mut self, request: &RedHatRepositoryRequest) -> Result<EntityRef>;

    /// Synchronizes a repository, blocking until the sync task finishes.
    fn sync_repository(&mut self, repository_id: u64) -> Result<()>;

    /// Creates a content view holding `repository_ids`.
    fn create_content_view(
        &mut self,
        org_id: u64,
        name: &str,
        repository_ids: &[u64],
    ) -> Result<EntityRef>;

    /// Publishes a content view and returns the new version.
    fn publish_content_view(&mut self, content_view_id: u64) -> Result<EntityRef>;

    /// Promotes a content view version to a lifecycle environment and
    /// returns that environment.
    fn promote_content_view_version(&mut self, version_id: u64, lce_id: u64) -> Result<EntityRef>;

    /// Creates an activation key.
    fn create_activation_key(&mut self, request: &ActivationKeyRequest) -> Result<EntityRef>;

    /// Registers a content host with an activation key.
    fn register_host(&mut self, registration: &HostRegistration) -> Result<EntityRef>;

    /// Enables `repository` on a registered host.
    fn enable_host_repository(&mut self, host_id: u64, repository: &str) -> Result<()>;
}
