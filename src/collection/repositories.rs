//! Built-in repository handles
//!
//! Two families exist on the platform:
//!
//! - **custom** repositories live in a custom product and are synced from a
//!   feed `url` (`YumRepository`, `DockerRepository`, ...);
//! - **Red Hat** repositories are enabled from a repository set of the
//!   organization's subscription manifest, picked by distro, optionally from
//!   the CDN (`SatelliteToolsRepository`, `RHELAnsibleEngineRepository`, ...).

use anyhow::Result;
use serde_json::Value;

use super::unique_name;
use crate::backend::{
    ContentBackend, RedHatRepositoryRequest, RepositoryDraft, RepositoryInfo,
};
use crate::batch::{Options, kind_of};
use crate::constants::{CDN_KEY, DISTRO_KEY, URL_KEY};
use crate::core::{ContentType, ProvisionTarget, RepokitError, RepositoryOrigin, ResourceHandle};

/// Built-in custom repository kinds.
pub const CUSTOM_KINDS: &[(&str, ContentType)] = &[
    ("YumRepository", ContentType::Yum),
    ("DockerRepository", ContentType::Docker),
    ("FileRepository", ContentType::File),
    ("AnsibleRepository", ContentType::AnsibleCollection),
];

/// Built-in Red Hat repository kinds and their repository set keys.
pub const REDHAT_KINDS: &[(&str, &str)] = &[
    ("SatelliteToolsRepository", "rhst"),
    ("SatelliteCapsuleRepository", "rhsc"),
    ("RHELAnsibleEngineRepository", "rhae"),
    ("RHELRepository", "rhel"),
];

/// Option naming the repository explicitly.
const NAME_KEY: &str = "name";

/// A repository created in the collection's custom product
#[derive(Debug, Clone)]
pub struct CustomRepository {
    kind: String,
    options: Options,
    content_type: ContentType,
    url: String,
    name: Option<String>,
    distro: Option<String>,
}

impl CustomRepository {
    /// Builds the handle; `url` is required.
    pub fn from_options(kind: &str, content_type: ContentType, options: &Options) -> Result<Self> {
        let url = string_option(kind, options, URL_KEY)?.ok_or_else(|| RepokitError::InvalidOptions {
            kind: kind.to_string(),
            reason: format!("missing '{URL_KEY}'"),
        })?;

        Ok(Self {
            kind: kind.to_string(),
            options: options.clone(),
            content_type,
            url,
            name: string_option(kind, options, NAME_KEY)?,
            distro: string_option(kind, options, DISTRO_KEY)?,
        })
    }
}

impl ResourceHandle for CustomRepository {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn content_type(&self) -> ContentType {
        self.content_type
    }

    fn origin(&self) -> RepositoryOrigin {
        RepositoryOrigin::Custom
    }

    fn url(&self) -> Option<&str> {
        Some(&self.url)
    }

    fn distro(&self) -> Option<&str> {
        self.distro.as_deref()
    }

    fn provision(
        &self,
        backend: &mut dyn ContentBackend,
        target: &ProvisionTarget<'_>,
    ) -> Result<RepositoryInfo> {
        let product = target.product.ok_or_else(|| RepokitError::Other {
            message: format!("{} needs a custom product but none was created", self.kind),
        })?;

        let draft = RepositoryDraft {
            product_id: product.id,
            name: self.name.clone().unwrap_or_else(|| unique_name(&self.kind.to_lowercase())),
            content_type: self.content_type,
            url: Some(self.url.clone()),
        };
        let repository = backend.create_repository(&draft)?;
        backend.sync_repository(repository.id)?;

        Ok(RepositoryInfo {
            kind: self.kind.clone(),
            id: repository.id,
            name: repository.name,
            content_type: self.content_type,
            origin: RepositoryOrigin::Custom,
            url: Some(self.url.clone()),
            distro: self.distro.clone(),
        })
    }
}

/// A repository enabled from a Red Hat repository set
#[derive(Debug, Clone)]
pub struct RedHatRepository {
    kind: String,
    options: Options,
    reposet: String,
    cdn: bool,
    distro: Option<String>,
}

impl RedHatRepository {
    /// Builds the handle; `cdn` must be a boolean when given.
    pub fn from_options(kind: &str, reposet: &str, options: &Options) -> Result<Self> {
        let cdn = match options.get(CDN_KEY) {
            None => false,
            Some(Value::Bool(cdn)) => *cdn,
            Some(other) => {
                return Err(RepokitError::InvalidOptions {
                    kind: kind.to_string(),
                    reason: format!("'{CDN_KEY}' must be a boolean, got {}", kind_of(other)),
                }
                .into());
            }
        };

        Ok(Self {
            kind: kind.to_string(),
            options: options.clone(),
            reposet: reposet.to_string(),
            cdn,
            distro: string_option(kind, options, DISTRO_KEY)?,
        })
    }

    /// Repository set key.
    pub fn reposet(&self) -> &str {
        &self.reposet
    }

    /// Whether content comes from the CDN.
    pub fn cdn(&self) -> bool {
        self.cdn
    }
}

impl ResourceHandle for RedHatRepository {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn content_type(&self) -> ContentType {
        ContentType::Yum
    }

    fn origin(&self) -> RepositoryOrigin {
        RepositoryOrigin::RedHat
    }

    fn distro(&self) -> Option<&str> {
        self.distro.as_deref()
    }

    fn provision(
        &self,
        backend: &mut dyn ContentBackend,
        target: &ProvisionTarget<'_>,
    ) -> Result<RepositoryInfo> {
        let distro = self.distro.as_deref().or(target.distro).ok_or_else(|| {
            RepokitError::MissingDistro {
                context: format!("{} repository", self.kind),
            }
        })?;

        let request = RedHatRepositoryRequest {
            org_id: target.org_id,
            reposet: self.reposet.clone(),
            distro: distro.to_string(),
            cdn: self.cdn,
        };
        let repository = backend.enable_redhat_repository(&request)?;
        backend.sync_repository(repository.id)?;

        Ok(RepositoryInfo {
            kind: self.kind.clone(),
            id: repository.id,
            name: repository.name,
            content_type: ContentType::Yum,
            origin: RepositoryOrigin::RedHat,
            url: None,
            distro: Some(distro.to_string()),
        })
    }
}

fn string_option(kind: &str, options: &Options, key: &str) -> Result<Option<String>> {
    match options.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(RepokitError::InvalidOptions {
            kind: kind.to_string(),
            reason: format!("'{key}' must be a string, got {}", kind_of(other)),
        }
        .into()),
    }
}
