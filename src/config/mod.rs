//! Configuration for repokit
//!
//! A single optional TOML file supplies run-wide defaults: parameters bound at
//! session scope, extra custom repository kinds and the keys that honour the
//! legacy indirection sentinel.
//!
//! # Modules
//!
//! - `global` - [`RepokitConfig`] loading and application
//!
//! # Configuration File
//!
//! ```toml
//! # Distro used when neither the batch nor a parameter names one
//! default_distro = "rhel8"
//!
//! # Keys where `key = "key"` means "take the parameter of that name"
//! indirection_keys = ["cdn", "distro"]
//!
//! # Session-scope parameter bindings
//! [params]
//! cdn = true
//!
//! # Extra custom repository kinds
//! [kinds.DebRepository]
//! content_type = "deb"
//! ```
//!
//! # Configuration Priority
//!
//! 1. `--config <PATH>` on the command line
//! 2. `REPOKIT_CONFIG` environment variable
//! 3. `./repokit.toml`
//! 4. `~/.repokit/config.toml`
//! 5. Default values
//!
//! An explicitly named file (1 or 2) must exist; the discovered locations
//! (3 and 4) are skipped when absent.

pub mod global;

pub use global::{KindConfig, RepokitConfig};
