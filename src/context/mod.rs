//! Invocation context: parameters bound by the enclosing test run
//!
//! A parametrized test run binds named values (its `distro`, whether it uses
//! `cdn`, ...) at some fixture scope. Batches refer to those values through
//! indirect options, resolved by [`resolve_options`].
//!
//! # Scope visibility
//!
//! A lookup is made on behalf of a fixture with its own scope. It only sees
//! bindings that live at least as long as that fixture:
//!
//! | Lookup from | Sees                          |
//! |-------------|-------------------------------|
//! | function    | function, module, session     |
//! | module      | module, session               |
//! | session     | session                       |
//!
//! When a name is bound at several visible scopes the narrowest wins, so a
//! test-level parametrization overrides a session default.
//!
//! ```rust
//! use repokit_cli::context::{FixtureScope, InvocationContext};
//! use serde_json::json;
//!
//! let ctx = InvocationContext::new()
//!     .with_param(FixtureScope::Session, "distro", json!("rhel8"))
//!     .with_param(FixtureScope::Function, "distro", json!("rhel9"));
//!
//! assert_eq!(ctx.lookup("distro", FixtureScope::Function), Some(&json!("rhel9")));
//! assert_eq!(ctx.lookup("distro", FixtureScope::Module), Some(&json!("rhel8")));
//! ```

pub mod resolver;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::core::RepokitError;

pub use resolver::{resolve_options, resolve_requests};

/// Lifetime of a fixture or a parameter binding, shortest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureScope {
    /// One test function
    Function,
    /// One test module
    Module,
    /// The whole run
    Session,
}

impl fmt::Display for FixtureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => write!(f, "function"),
            Self::Module => write!(f, "module"),
            Self::Session => write!(f, "session"),
        }
    }
}

impl std::str::FromStr for FixtureScope {
    type Err = RepokitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "function" => Ok(Self::Function),
            "module" => Ok(Self::Module),
            "session" => Ok(Self::Session),
            _ => Err(RepokitError::Other {
                message: format!("unknown fixture scope '{s}' (expected function, module or session)"),
            }),
        }
    }
}

/// Named values bound for one test invocation
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    bindings: HashMap<String, BTreeMap<FixtureScope, Value>>,
}

impl InvocationContext {
    /// Creates a context with nothing bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` at `scope`, replacing an earlier binding at the same scope.
    pub fn bind(&mut self, scope: FixtureScope, name: impl Into<String>, value: Value) -> &mut Self {
        self.bindings.entry(name.into()).or_default().insert(scope, value);
        self
    }

    /// Builder form of [`bind`](Self::bind).
    #[must_use]
    pub fn with_param(mut self, scope: FixtureScope, name: impl Into<String>, value: Value) -> Self {
        self.bind(scope, name, value);
        self
    }

    /// The narrowest binding of `name` visible from a fixture of scope `from`.
    pub fn lookup(&self, name: &str, from: FixtureScope) -> Option<&Value> {
        self.bindings.get(name)?.range(from..).next().map(|(_, value)| value)
    }

    /// Like [`lookup`](Self::lookup) but fails when nothing is visible.
    ///
    /// # Errors
    ///
    /// [`RepokitError::MissingFixtureValue`] naming the parameter and scope.
    pub fn require(&self, name: &str, from: FixtureScope) -> Result<&Value> {
        self.lookup(name, from).ok_or_else(|| {
            RepokitError::MissingFixtureValue {
                param: name.to_string(),
                scope: from.to_string(),
            }
            .into()
        })
    }

    /// A string binding visible from `from`, if any.
    pub fn lookup_str(&self, name: &str, from: FixtureScope) -> Option<&str> {
        self.lookup(name, from).and_then(Value::as_str)
    }

    /// Bound names with the scopes they are bound at, sorted by name.
    pub fn bindings(&self) -> Vec<(&str, FixtureScope, &Value)> {
        let mut all: Vec<_> = self
            .bindings
            .iter()
            .flat_map(|(name, scopes)| {
                scopes.iter().map(move |(scope, value)| (name.as_str(), *scope, value))
            })
            .collect();
        all.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(&b.1)));
        all
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
