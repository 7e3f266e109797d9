//! Integration test suite for repokit
//!
//! Drives the `repokit` binary against batch files written to a temporary
//! project directory.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **plan**: collection planning and dry-run setup
//! - **validate**: validation command and exit status
//! - **kinds**: kind listing
//! - **config**: configuration discovery and application

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod config;
mod kinds;
mod plan;
mod validate;
