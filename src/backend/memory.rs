//! In-memory [`ContentBackend`] that records calls

use anyhow::{Result, bail};
use serde::Serialize;
use std::fmt;
use tracing::trace;

use super::{
    ActivationKeyRequest, ContentBackend, EntityRef, HostRegistration, RedHatRepositoryRequest,
    RepositoryDraft,
};

/// Operation names, used to select an injected failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendOperation {
    /// [`ContentBackend::create_product`]
    CreateProduct,
    /// [`ContentBackend::create_repository`]
    CreateRepository,
    /// [`ContentBackend::enable_redhat_repository`]
    EnableRedHatRepository,
    /// [`ContentBackend::sync_repository`]
    SyncRepository,
    /// [`ContentBackend::create_content_view`]
    CreateContentView,
    /// [`ContentBackend::publish_content_view`]
    PublishContentView,
    /// [`ContentBackend::promote_content_view_version`]
    PromoteContentViewVersion,
    /// [`ContentBackend::create_activation_key`]
    CreateActivationKey,
    /// [`ContentBackend::register_host`]
    RegisterHost,
    /// [`ContentBackend::enable_host_repository`]
    EnableHostRepository,
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateProduct => "create_product",
            Self::CreateRepository => "create_repository",
            Self::EnableRedHatRepository => "enable_redhat_repository",
            Self::SyncRepository => "sync_repository",
            Self::CreateContentView => "create_content_view",
            Self::PublishContentView => "publish_content_view",
            Self::PromoteContentViewVersion => "promote_content_view_version",
            Self::CreateActivationKey => "create_activation_key",
            Self::RegisterHost => "register_host",
            Self::EnableHostRepository => "enable_host_repository",
        };
        f.write_str(name)
    }
}

/// One recorded call with its arguments
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BackendCall {
    /// Product creation
    CreateProduct {
        /// Organization
        org_id: u64,
        /// Product name
        name: String,
    },
    /// Custom repository creation
    CreateRepository(RepositoryDraft),
    /// Red Hat repository enablement
    EnableRedHatRepository(RedHatRepositoryRequest),
    /// Repository sync
    SyncRepository {
        /// Repository id
        repository_id: u64,
    },
    /// Content view creation
    CreateContentView {
        /// Organization
        org_id: u64,
        /// Content view name
        name: String,
        /// Repositories in the view
        repository_ids: Vec<u64>,
    },
    /// Content view publish
    PublishContentView {
        /// Content view id
        content_view_id: u64,
    },
    /// Version promotion
    PromoteContentViewVersion {
        /// Version id
        version_id: u64,
        /// Target lifecycle environment
        lce_id: u64,
    },
    /// Activation key creation
    CreateActivationKey(ActivationKeyRequest),
    /// Content host registration
    RegisterHost(HostRegistration),
    /// Repository enabled on a host
    EnableHostRepository {
        /// Host id
        host_id: u64,
        /// Repository name
        repository: String,
    },
}

impl BackendCall {
    /// The operation this call performed.
    pub fn operation(&self) -> BackendOperation {
        match self {
            Self::CreateProduct {
                ..
            } => BackendOperation::CreateProduct,
            Self::CreateRepository(_) => BackendOperation::CreateRepository,
            Self::EnableRedHatRepository(_) => BackendOperation::EnableRedHatRepository,
            Self::SyncRepository {
                ..
            } => BackendOperation::SyncRepository,
            Self::CreateContentView {
                ..
            } => BackendOperation::CreateContentView,
            Self::PublishContentView {
                ..
            } => BackendOperation::PublishContentView,
            Self::PromoteContentViewVersion {
                ..
            } => BackendOperation::PromoteContentViewVersion,
            Self::CreateActivationKey(_) => BackendOperation::CreateActivationKey,
            Self::RegisterHost(_) => BackendOperation::RegisterHost,
            Self::EnableHostRepository {
                ..
            } => BackendOperation::EnableHostRepository,
        }
    }
}

/// Backend that assigns sequential ids and records calls in order
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    next_id: u64,
    fail_on: Option<(BackendOperation, usize)>,
}

impl RecordingBackend {
    /// Creates an empty backend. Ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `nth` (0-based) call of `operation` fail.
    #[must_use]
    pub fn failing_on(mut self, operation: BackendOperation, nth: usize) -> Self {
        self.fail_on = Some((operation, nth));
        self
    }

    /// Calls recorded so far, including a failed one.
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Operations recorded so far, in order.
    pub fn operations(&self) -> Vec<BackendOperation> {
        self.calls.iter().map(BackendCall::operation).collect()
    }

    fn record(&mut self, call: BackendCall) -> Result<u64> {
        let operation = call.operation();
        trace!("Recording backend call {}", operation);
        let seen = self.calls.iter().filter(|c| c.operation() == operation).count();
        self.calls.push(call);
        if self.fail_on == Some((operation, seen)) {
            bail!("{operation} failed on the remote platform");
        }
        self.next_id += 1;
        Ok(self.next_id)
    }
}

impl ContentBackend for RecordingBackend {
    fn create_product(&mut self, org_id: u64, name: &str) -> Result<EntityRef> {
        let id = self.record(BackendCall::CreateProduct {
            org_id,
            name: name.to_string(),
        })?;
        Ok(EntityRef::new(id, name))
    }

    fn create_repository(&mut self, draft: &RepositoryDraft) -> Result<EntityRef> {
        let id = self.record(BackendCall::CreateRepository(draft.clone()))?;
        Ok(EntityRef::new(id, &draft.name))
    }

    fn enable_redhat_repository(&mut self, request: &RedHatRepositoryRequest) -> Result<EntityRef> {
        let id = self.record(BackendCall::EnableRedHatRepository(request.clone()))?;
        Ok(EntityRef::new(id, format!("{}-{}", request.reposet, request.distro)))
    }

    fn sync_repository(&mut self, repository_id: u64) -> Result<()> {
        self.record(BackendCall::SyncRepository {
            repository_id,
        })?;
        Ok(())
    }

    fn create_content_view(
        &mut self,
        org_id: u64,
        name: &str,
        repository_ids: &[u64],
    ) -> Result<EntityRef> {
        let id = self.record(BackendCall::CreateContentView {
            org_id,
            name: name.to_string(),
            repository_ids: repository_ids.to_vec(),
        })?;
        Ok(EntityRef::new(id, name))
    }

    fn publish_content_view(&mut self, content_view_id: u64) -> Result<EntityRef> {
        let id = self.record(BackendCall::PublishContentView {
            content_view_id,
        })?;
        Ok(EntityRef::new(id, "1.0"))
    }

    fn promote_content_view_version(&mut self, version_id: u64, lce_id: u64) -> Result<EntityRef> {
        self.record(BackendCall::PromoteContentViewVersion {
            version_id,
            lce_id,
        })?;
        Ok(EntityRef::new(lce_id, format!("lce-{lce_id}")))
    }

    fn create_activation_key(&mut self, request: &ActivationKeyRequest) -> Result<EntityRef> {
        let id = self.record(BackendCall::CreateActivationKey(request.clone()))?;
        Ok(EntityRef::new(id, &request.name))
    }

    fn register_host(&mut self, registration: &HostRegistration) -> Result<EntityRef> {
        let id = self.record(BackendCall::RegisterHost(registration.clone()))?;
        Ok(EntityRef::new(id, &registration.hostname))
    }

    fn enable_host_repository(&mut self, host_id: u64, repository: &str) -> Result<()> {
        self.record(BackendCall::EnableHostRepository {
            host_id,
            repository: repository.to_string(),
        })?;
        Ok(())
    }
}
