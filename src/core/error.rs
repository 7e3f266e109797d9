//! Error handling for repokit
//!
//! This module provides the error taxonomy for batch normalization, context
//! resolution and collection building, plus user-friendly error reporting for
//! the CLI. The error system follows two principles:
//! 1. **Strongly-typed errors** so fixture code can match on the exact failure
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`RepokitError`] - Enumerated error types for every failure this crate raises
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion for display
//!
//! Library functions return [`anyhow::Result`] with a [`RepokitError`] at the
//! root of the chain, so callers can `downcast_ref::<RepokitError>()`.
//! Failures raised by a [`ContentBackend`](crate::backend::ContentBackend) are
//! never wrapped: they reach the caller exactly as the backend produced them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use repokit_cli::core::{RepokitError, user_friendly_error};
//!
//! let error = RepokitError::MissingDistro {
//!     context: "repository collection".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for repokit operations
///
/// None of these errors are retried. They all surface while a fixture is
/// being set up, before the test body runs.
///
/// # Error Categories
///
/// ## Batch and context errors
/// - [`ConfigurationError`] - Malformed batch (e.g. duplicate distro directive)
/// - [`BatchParseError`] - Batch document could not be parsed
/// - [`MissingFixtureValue`] - Indirection names a parameter that is not bound
///
/// ## Collection errors
/// - [`UnknownResourceKind`] - No factory registered for a kind
/// - [`RegistrationError`] - Factory registration rejected
/// - [`InvalidOptions`] - A factory rejected an item's options
/// - [`MissingDistro`] - No distro available when one is required
/// - [`CollectionAlreadyBound`] - `setup_content` called twice
/// - [`CollectionNotBound`] - host setup requested before `setup_content`
///
/// ## Environment
/// - [`ConfigError`] - Configuration file problems
/// - [`IoError`] - Standard I/O errors from [`std::io::Error`]
///
/// [`ConfigurationError`]: RepokitError::ConfigurationError
/// [`BatchParseError`]: RepokitError::BatchParseError
/// [`MissingFixtureValue`]: RepokitError::MissingFixtureValue
/// [`UnknownResourceKind`]: RepokitError::UnknownResourceKind
/// [`RegistrationError`]: RepokitError::RegistrationError
/// [`InvalidOptions`]: RepokitError::InvalidOptions
/// [`MissingDistro`]: RepokitError::MissingDistro
/// [`CollectionAlreadyBound`]: RepokitError::CollectionAlreadyBound
/// [`CollectionNotBound`]: RepokitError::CollectionNotBound
/// [`ConfigError`]: RepokitError::ConfigError
/// [`IoError`]: RepokitError::IoError
#[derive(Error, Debug)]
pub enum RepokitError {
    /// The batch is structurally invalid
    ///
    /// Raised before any remote call is made, for example when the `distro`
    /// directive appears more than once, or when the directive or a `distro`
    /// parameter used in its place is not a string.
    #[error("Invalid batch configuration: {message}")]
    ConfigurationError {
        /// What is wrong with the batch
        message: String,
    },

    /// A batch document could not be parsed
    #[error("Failed to parse batch {file}: {reason}")]
    BatchParseError {
        /// Path (or label) of the document
        file: String,
        /// Parser message
        reason: String,
    },

    /// An indirect option names a parameter that is not bound
    ///
    /// This is a test-authoring bug: the parametrization is missing, or the
    /// value is bound at a narrower scope than the fixture resolving it.
    #[error("No value bound for parameter '{param}' visible from {scope} scope")]
    MissingFixtureValue {
        /// The parameter the option asked for
        param: String,
        /// Scope of the fixture performing the lookup
        scope: String,
    },

    /// The batch references a kind with no registered factory
    #[error("Unknown resource kind '{kind}'")]
    UnknownResourceKind {
        /// The unregistered kind
        kind: String,
        /// Registered kinds with a similar spelling
        suggestions: Vec<String>,
    },

    /// A factory registration was rejected
    #[error("Cannot register resource kind '{kind}': {reason}")]
    RegistrationError {
        /// Kind being registered
        kind: String,
        /// Reason for rejection
        reason: String,
    },

    /// A factory rejected the options of one item
    #[error("Invalid options for {kind}: {reason}")]
    InvalidOptions {
        /// Kind of the rejected item
        kind: String,
        /// Reason for rejection
        reason: String,
    },

    /// No distro is available from the batch or the caller
    #[error("No distro available for {context}")]
    MissingDistro {
        /// What needed the distro
        context: String,
    },

    /// The collection is already bound to an organization and environment
    #[error("Collection is already bound to organization {org_id} and lifecycle environment {lce_id}")]
    CollectionAlreadyBound {
        /// Organization of the existing binding
        org_id: u64,
        /// Lifecycle environment of the existing binding
        lce_id: u64,
    },

    /// An operation needs bound content but the collection is still `Built`
    #[error("Cannot {operation}: collection is not bound to an organization yet")]
    CollectionNotBound {
        /// What was attempted
        operation: String,
    },

    /// Configuration file error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for RepokitError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigurationError {
                message,
            } => Self::ConfigurationError {
                message: message.clone(),
            },
            Self::BatchParseError {
                file,
                reason,
            } => Self::BatchParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::MissingFixtureValue {
                param,
                scope,
            } => Self::MissingFixtureValue {
                param: param.clone(),
                scope: scope.clone(),
            },
            Self::UnknownResourceKind {
                kind,
                suggestions,
            } => Self::UnknownResourceKind {
                kind: kind.clone(),
                suggestions: suggestions.clone(),
            },
            Self::RegistrationError {
                kind,
                reason,
            } => Self::RegistrationError {
                kind: kind.clone(),
                reason: reason.clone(),
            },
            Self::InvalidOptions {
                kind,
                reason,
            } => Self::InvalidOptions {
                kind: kind.clone(),
                reason: reason.clone(),
            },
            Self::MissingDistro {
                context,
            } => Self::MissingDistro {
                context: context.clone(),
            },
            Self::CollectionAlreadyBound {
                org_id,
                lce_id,
            } => Self::CollectionAlreadyBound {
                org_id: *org_id,
                lce_id: *lce_id,
            },
            Self::CollectionNotBound {
                operation,
            } => Self::CollectionNotBound {
                operation: operation.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // io::Error is not Clone
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Pairs a [`RepokitError`] with optional details (why it happened) and an
/// optional suggestion (what to do about it). The CLI prints it with
/// [`ErrorContext::display`].
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: RepokitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: RepokitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`]
///
/// [`RepokitError`] variants get tailored suggestions. Anything else,
/// including backend failures, is shown with its message untouched and the
/// rest of the `anyhow` chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(repokit_error) = error.downcast_ref::<RepokitError>() {
        return create_error_context(repokit_error.clone());
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(RepokitError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your repokit.toml file");
    }

    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let ctx = ErrorContext::new(RepokitError::Other {
        message: error.to_string(),
    });
    if causes.is_empty() {
        ctx
    } else {
        ctx.with_details(causes.join(": "))
    }
}

fn create_error_context(error: RepokitError) -> ErrorContext {
    match &error {
        RepokitError::ConfigurationError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion(
                "Declare 'distro' at most once per batch and give it a string value, in the batch or as a parameter",
            )
            .with_details("The batch is rejected before any repository is created"),

        RepokitError::BatchParseError {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "A batch is a mapping of resource kind to an options table or a list of options tables",
        ),

        RepokitError::MissingFixtureValue {
            param,
            scope,
        } => {
            let suggestion = format!(
                "Bind '{param}' with --param/--module-param/--session-param, or in [params] of repokit.toml"
            );
            let ctx = ErrorContext::new(error.clone()).with_suggestion(suggestion);
            if scope == "module" || scope == "session" {
                ctx.with_details(format!(
                    "A {scope}-scoped collection cannot see parameters bound at a narrower scope"
                ))
            } else {
                ctx
            }
        }

        RepokitError::UnknownResourceKind {
            suggestions,
            ..
        } => {
            let ctx = ErrorContext::new(error.clone())
                .with_details("Run 'repokit kinds' to list the registered resource kinds");
            if suggestions.is_empty() {
                ctx.with_suggestion("Register the kind under [kinds] in repokit.toml")
            } else {
                ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
            }
        }

        RepokitError::MissingDistro {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Add a top-level 'distro' to the batch, bind a 'distro' parameter, or set default_distro in repokit.toml",
        ),

        RepokitError::CollectionAlreadyBound {
            ..
        } => ErrorContext::new(error)
            .with_details("A collection is bound once; build a new collection for a new scope"),

        RepokitError::CollectionNotBound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Call setup_content with an organization and lifecycle environment first"),

        RepokitError::RegistrationError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Kind names are CamelCase identifiers and must be registered once"),

        _ => ErrorContext::new(error),
    }
}
