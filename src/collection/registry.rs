//! Factory registry: kind tag -> handle constructor
//!
//! Kinds are registered explicitly and validated when registered, so a typo
//! in a batch is reported as an unknown kind (with close matches) before any
//! handle is built.

use anyhow::Result;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use strsim::levenshtein;
use tracing::debug;

use super::repositories::{CUSTOM_KINDS, CustomRepository, REDHAT_KINDS, RedHatRepository};
use crate::batch::Options;
use crate::constants::{DISTRO_KEY, MAX_SUGGESTIONS, SIMILARITY_THRESHOLD_PERCENT};
use crate::core::{ContentType, RepokitError, ResourceHandle};

/// Kind tags are CamelCase identifiers (`YumRepository`).
const KIND_NAME_PATTERN: &str = r"^[A-Z][A-Za-z0-9]*$";

static KIND_NAME: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(KIND_NAME_PATTERN));

/// Constructor for one kind: takes resolved options, returns a handle.
pub type Factory = Box<dyn Fn(&Options) -> Result<Box<dyn ResourceHandle>>>;

/// Registered factories, listed in name order
#[derive(Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, Factory>,
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry").field("kinds", &self.kinds()).finish()
    }
}

impl FactoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in repository kind.
    pub fn with_builtin_kinds() -> Result<Self> {
        let mut registry = Self::new();
        for &(kind, content_type) in CUSTOM_KINDS {
            registry.register_custom_kind(kind, content_type)?;
        }
        for &(kind, reposet) in REDHAT_KINDS {
            registry.register(kind, move |options: &Options| {
                Ok(Box::new(RedHatRepository::from_options(kind, reposet, options)?)
                    as Box<dyn ResourceHandle>)
            })?;
        }
        Ok(registry)
    }

    /// Registers `factory` for `kind`.
    ///
    /// # Errors
    ///
    /// [`RepokitError::RegistrationError`] when the name is not a CamelCase
    /// identifier, is the reserved directive key, or is already registered.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn(&Options) -> Result<Box<dyn ResourceHandle>> + 'static,
    {
        let kind = kind.into();
        let reject = |reason: &str| RepokitError::RegistrationError {
            kind: kind.clone(),
            reason: reason.to_string(),
        };

        if kind == DISTRO_KEY {
            return Err(reject("'distro' is reserved for the batch directive").into());
        }
        let pattern = KIND_NAME.as_ref().map_err(|e| reject(&e.to_string()))?;
        if !pattern.is_match(&kind) {
            return Err(reject("kind names must be CamelCase identifiers").into());
        }
        if self.factories.contains_key(&kind) {
            return Err(reject("already registered").into());
        }

        debug!("Registered resource kind {}", kind);
        self.factories.insert(kind, Box::new(factory));
        Ok(())
    }

    /// Registers a custom repository kind with a fixed content type.
    pub fn register_custom_kind(&mut self, kind: &str, content_type: ContentType) -> Result<()> {
        let tag = kind.to_string();
        self.register(kind, move |options: &Options| {
            Ok(Box::new(CustomRepository::from_options(&tag, content_type, options)?)
                as Box<dyn ResourceHandle>)
        })
    }

    /// Whether `kind` has a factory.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds in name order.
    pub fn kinds(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Fails with [`RepokitError::UnknownResourceKind`] if `kind` is not registered.
    pub fn check_kind(&self, kind: &str) -> Result<()> {
        if self.contains(kind) {
            return Ok(());
        }
        Err(RepokitError::UnknownResourceKind {
            kind: kind.to_string(),
            suggestions: self.similar_kinds(kind),
        }
        .into())
    }

    /// Invokes the factory registered for `kind`.
    pub fn create(&self, kind: &str, options: &Options) -> Result<Box<dyn ResourceHandle>> {
        let factory = self.factories.get(kind).ok_or_else(|| RepokitError::UnknownResourceKind {
            kind: kind.to_string(),
            suggestions: self.similar_kinds(kind),
        })?;
        factory(options)
    }

    fn similar_kinds(&self, target: &str) -> Vec<String> {
        let mut scored: Vec<_> =
            self.factories.keys().map(|kind| (kind, levenshtein(target, kind))).collect();
        scored.sort_by_key(|(_, dist)| *dist);
        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(MAX_SUGGESTIONS)
            .map(|(kind, _)| kind.clone())
            .collect()
    }
}
