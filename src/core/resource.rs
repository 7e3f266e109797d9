//! Resource abstractions for repokit
//!
//! A batch item is turned into a [`ResourceHandle`]: the in-memory
//! representation of one repository that a test wants on the remote
//! platform. Handles are created by factories (see
//! [`FactoryRegistry`](crate::collection::FactoryRegistry)) and provisioned
//! through a [`ContentBackend`] when their collection is bound.
//!
//! # Core Types
//!
//! - [`ContentType`] - Repository content type understood by the platform
//! - [`RepositoryOrigin`] - Whether a repository is custom or a Red Hat repository
//! - [`ResourceHandle`] - Trait implemented by every constructed handle
//!
//! # Examples
//!
//! ```rust
//! use repokit_cli::core::ContentType;
//!
//! let yum: ContentType = "yum".parse().unwrap();
//! assert_eq!(yum, ContentType::Yum);
//! assert_eq!(ContentType::AnsibleCollection.to_string(), "ansible_collection");
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::backend::{ContentBackend, EntityRef, RepositoryInfo};
use crate::batch::Options;

/// Content type of a repository on the remote platform
///
/// Serialized in `snake_case` (`"yum"`, `"ansible_collection"`), which is
/// also the spelling accepted in `[kinds]` entries of `repokit.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// RPM content
    Yum,
    /// Container images
    Docker,
    /// Arbitrary files
    File,
    /// Ansible collections
    AnsibleCollection,
    /// Debian packages
    Deb,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yum => write!(f, "yum"),
            Self::Docker => write!(f, "docker"),
            Self::File => write!(f, "file"),
            Self::AnsibleCollection => write!(f, "ansible_collection"),
            Self::Deb => write!(f, "deb"),
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = crate::core::RepokitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yum" | "rpm" => Ok(Self::Yum),
            "docker" | "container" => Ok(Self::Docker),
            "file" => Ok(Self::File),
            "ansible_collection" | "ansible" => Ok(Self::AnsibleCollection),
            "deb" => Ok(Self::Deb),
            _ => Err(crate::core::RepokitError::ConfigError {
                message: format!("unknown content type '{s}'"),
            }),
        }
    }
}

/// Where a repository's content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryOrigin {
    /// Created inside a custom product from a feed URL
    Custom,
    /// Enabled from a Red Hat repository set of the organization's manifest
    RedHat,
}

impl fmt::Display for RepositoryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom => write!(f, "custom"),
            Self::RedHat => write!(f, "red_hat"),
        }
    }
}

/// Organization-level placement handed to [`ResourceHandle::provision`]
#[derive(Debug, Clone, Copy)]
pub struct ProvisionTarget<'a> {
    /// Organization receiving the repository
    pub org_id: u64,
    /// Custom product created for the collection, if any handle needs one
    pub product: Option<&'a EntityRef>,
    /// Distro of the enclosing collection
    pub distro: Option<&'a str>,
}

/// One constructed repository handle
///
/// Handles are owned by the [`RepositoryCollection`](crate::collection::RepositoryCollection)
/// that built them. Provisioning creates (or enables) the repository on the
/// remote platform and syncs it; errors from the backend are returned as-is.
pub trait ResourceHandle: fmt::Debug {
    /// The kind tag this handle was built for (e.g. `"YumRepository"`)
    fn kind(&self) -> &str;

    /// Resolved options the factory received
    fn options(&self) -> &Options;

    /// Content type of the repository
    fn content_type(&self) -> ContentType;

    /// Whether the repository lives in a custom product
    fn origin(&self) -> RepositoryOrigin;

    /// Feed URL for custom repositories
    fn url(&self) -> Option<&str> {
        None
    }

    /// Distro set on this item itself, overriding the collection's
    fn distro(&self) -> Option<&str> {
        None
    }

    /// Create or enable the repository and sync it
    fn provision(
        &self,
        backend: &mut dyn ContentBackend,
        target: &ProvisionTarget<'_>,
    ) -> Result<RepositoryInfo>;
}
