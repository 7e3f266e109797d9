//! repokit - parametrized repository collections for content platform tests
//!
//! End-to-end tests of a systems-management product need repositories in an
//! organization before they can exercise anything else. Tests describe the
//! repositories they want declaratively, as a *batch*, and the fixture
//! pipeline in this crate turns the batch into a collection of repository
//! handles and, on request, into real content on the platform.
//!
//! # Pipeline
//!
//! ```text
//! batch file / RequestBatch
//!     │ normalize           (batch)       one optional distro + ordered requests
//!     ▼
//! Vec<ResourceRequest>
//!     │ resolve             (context)     indirect options read scoped parameters
//!     ▼
//! Vec<ResourceRequest>
//!     │ build               (collection)  one factory call per request, in order
//!     ▼
//! RepositoryCollection (Built)
//!     │ setup_content       (backend)     product, repos, content view, activation key
//!     ▼
//! RepositoryCollection (ContentBound)
//! ```
//!
//! # Batches
//!
//! A batch maps resource kinds to one options table or a list of them. The
//! reserved top-level key `distro` applies to the whole collection:
//!
//! ```toml
//! distro = "rhel8"
//! SatelliteToolsRepository = {}
//! RHELAnsibleEngineRepository = { cdn = "cdn" }
//!
//! [[YumRepository]]
//! url = { from_param = "yum_url" }
//! ```
//!
//! `cdn = "cdn"` (the legacy sentinel, allowed on `cdn` and `distro`) and
//! `{ from_param = "..." }` (allowed on any key) take their value from a
//! parameter bound by the test run.
//!
//! # Modules
//!
//! - [`batch`] - batch model, normalization and batch files
//! - [`context`] - scoped parameter bindings and option resolution
//! - [`collection`] - factory registry, built-in repository kinds, builder
//!   and `setup_content`
//! - [`backend`] - the content platform seam and an in-memory recorder
//! - [`config`] - `repokit.toml`
//! - [`core`] - errors and the resource handle trait
//! - [`cli`] - the `repokit` command line
//!
//! # Example
//!
//! ```rust
//! use repokit_cli::backend::RecordingBackend;
//! use repokit_cli::batch::RequestBatch;
//! use repokit_cli::collection::{CollectionFixture, FactoryRegistry};
//! use repokit_cli::context::{FixtureScope, InvocationContext};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = FactoryRegistry::with_builtin_kinds()?;
//! let batch = RequestBatch::from_value(json!({
//!     "RHELAnsibleEngineRepository": {"cdn": "cdn"},
//!     "YumRepository": {"url": "http://example.com/yum"},
//! }))?;
//! let ctx = InvocationContext::new()
//!     .with_param(FixtureScope::Function, "distro", json!("rhel8"))
//!     .with_param(FixtureScope::Function, "cdn", json!(true));
//!
//! let mut collection = CollectionFixture::function(&registry).assemble(&batch, &ctx)?;
//! assert_eq!(collection.distro(), Some("rhel8"));
//!
//! let mut backend = RecordingBackend::new();
//! let data = collection.setup_content(&mut backend, 1, 2)?;
//! assert_eq!(data.repositories.len(), 2);
//! # Ok(())
//! # }
//! ```

// Pipeline
pub mod batch;
pub mod collection;
pub mod context;

// Remote platform seam
pub mod backend;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
