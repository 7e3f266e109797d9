//! Core types and functionality for repokit
//!
//! This module holds the pieces every other module leans on:
//!
//! - `error` - [`RepokitError`], [`ErrorContext`] and [`user_friendly_error`]
//! - `resource` - [`ContentType`], [`RepositoryOrigin`] and the
//!   [`ResourceHandle`] trait implemented by constructed repositories
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use repokit_cli::core::{RepokitError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(RepokitError::MissingDistro {
//!         context: "example".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;
pub mod resource;

pub use error::{ErrorContext, RepokitError, user_friendly_error};
pub use resource::{ContentType, ProvisionTarget, RepositoryOrigin, ResourceHandle};
