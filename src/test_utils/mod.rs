//! Test utilities for repokit
//!
//! Helpers shared by unit tests and the integration suite (enable the
//! `test-utils` feature to use them outside this crate):
//!
//! - [`init_test_logging`] - once-guarded tracing subscriber for tests
//! - [`RecordingFactory`] - stub factory that records every invocation
//! - [`BatchFixture`] - sample batch documents
//!
//! # Example
//!
//! ```rust,no_run
//! use repokit_cli::collection::FactoryRegistry;
//! use repokit_cli::test_utils::RecordingFactory;
//!
//! let factory = RecordingFactory::new();
//! let mut registry = FactoryRegistry::new();
//! factory.register(&mut registry, "YumRepository").unwrap();
//! assert_eq!(factory.call_count(), 0);
//! ```

pub mod fixtures;

pub use fixtures::BatchFixture;

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::backend::{ContentBackend, RepositoryDraft, RepositoryInfo};
use crate::batch::Options;
use crate::collection::FactoryRegistry;
use crate::core::{ContentType, ProvisionTarget, RepositoryOrigin, ResourceHandle};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` if set, otherwise installs
/// nothing.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Stub factory recording `(kind, options)` for every invocation
///
/// Clones share the same log, so the registry can own one clone while the
/// test keeps another to inspect.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    calls: Rc<RefCell<Vec<(String, Options)>>>,
}

impl RecordingFactory {
    /// Creates a factory with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers this factory for `kind`; the handles it returns are [`StubHandle`]s.
    pub fn register(&self, registry: &mut FactoryRegistry, kind: &str) -> Result<()> {
        let calls = Rc::clone(&self.calls);
        let tag = kind.to_string();
        registry.register(kind, move |options: &Options| {
            calls.borrow_mut().push((tag.clone(), options.clone()));
            Ok(Box::new(StubHandle {
                kind: tag.clone(),
                options: options.clone(),
            }) as Box<dyn ResourceHandle>)
        })
    }

    /// Registers a factory for `kind` that records the call and then fails.
    pub fn register_failing(&self, registry: &mut FactoryRegistry, kind: &str) -> Result<()> {
        let calls = Rc::clone(&self.calls);
        let tag = kind.to_string();
        registry.register(kind, move |options: &Options| {
            calls.borrow_mut().push((tag.clone(), options.clone()));
            Err(anyhow!("factory for {tag} refused {options:?}"))
        })
    }

    /// Every recorded invocation, in order.
    pub fn calls(&self) -> Vec<(String, Options)> {
        self.calls.borrow().clone()
    }

    /// Number of recorded invocations.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

/// Handle produced by [`RecordingFactory`]: a yum repository in the custom product
#[derive(Debug, Clone)]
pub struct StubHandle {
    kind: String,
    options: Options,
}

impl ResourceHandle for StubHandle {
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
        RepositoryOrigin::Custom
    }

    fn url(&self) -> Option<&str> {
        self.options.get("url").and_then(|v| v.as_str())
    }

    fn provision(
        &self,
        backend: &mut dyn ContentBackend,
        target: &ProvisionTarget<'_>,
    ) -> Result<RepositoryInfo> {
        let product = target.product.ok_or_else(|| anyhow!("stub needs a product"))?;
        let draft = RepositoryDraft {
            product_id: product.id,
            name: format!("stub-{}", self.kind.to_lowercase()),
            content_type: ContentType::Yum,
            url: self.url().map(str::to_string),
        };
        let repository = backend.create_repository(&draft)?;
        backend.sync_repository(repository.id)?;
        Ok(RepositoryInfo {
            kind: self.kind.clone(),
            id: repository.id,
            name: repository.name,
            content_type: ContentType::Yum,
            origin: RepositoryOrigin::Custom,
            url: draft.url,
            distro: None,
        })
    }
}
