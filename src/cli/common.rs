//! Common utilities for CLI commands

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::Value;
use std::path::Path;

use crate::batch::RequestBatch;
use crate::batch::io::load_batches;
use crate::collection::{CollectionFixture, FactoryRegistry};
use crate::config::RepokitConfig;
use crate::context::{FixtureScope, InvocationContext};

/// Output format shared by `plan`, `validate` and `kinds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Scope a command assembles collections at
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Per-test fixture: sees every binding, distro required
    Function,
    /// Per-module fixture: ignores `--param`, distro optional
    Module,
}

impl From<ScopeArg> for FixtureScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Function => Self::Function,
            ScopeArg::Module => Self::Module,
        }
    }
}

/// Parameter bindings given on the command line
///
/// Values are read as JSON when they parse (`true`, `3`, `["a"]`) and as
/// plain strings otherwise, so `--param distro=rhel8` binds the string
/// `"rhel8"` and `--param cdn=true` binds a boolean.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Bind NAME=VALUE at function scope
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub function: Vec<(String, Value)>,

    /// Bind NAME=VALUE at module scope
    #[arg(long = "module-param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub module: Vec<(String, Value)>,

    /// Bind NAME=VALUE at session scope, over the configuration's [params]
    #[arg(long = "session-param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub session: Vec<(String, Value)>,
}

impl ParamArgs {
    /// Builds the invocation context: configuration first, then the flags.
    pub fn context(&self, config: &RepokitConfig) -> InvocationContext {
        let mut ctx = InvocationContext::new();
        config.apply_to(&mut ctx);

        let layers = [
            (FixtureScope::Session, &self.session),
            (FixtureScope::Module, &self.module),
            (FixtureScope::Function, &self.function),
        ];
        for (scope, bindings) in layers {
            for (name, value) in bindings {
                ctx.bind(scope, name.clone(), value.clone());
            }
        }
        ctx
    }
}

/// Parses `NAME=VALUE`.
pub fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (name, value) =
        raw.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    Ok((name.to_string(), parse_value(value)))
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Configuration plus the registry built from it
#[derive(Debug)]
pub struct CommandContext {
    /// Loaded configuration
    pub config: RepokitConfig,
    /// Built-in kinds plus the configured ones
    pub registry: FactoryRegistry,
}

impl CommandContext {
    /// Builds the registry for `config`.
    ///
    /// # Errors
    /// Returns an error if a configured kind cannot be registered
    pub fn new(config: RepokitConfig) -> Result<Self> {
        let mut registry = FactoryRegistry::with_builtin_kinds()?;
        config.register_kinds(&mut registry)?;
        Ok(Self {
            config,
            registry,
        })
    }

    /// Fixture preset for `scope` using the configured indirection keys.
    pub fn fixture(&self, scope: ScopeArg) -> CollectionFixture<'_> {
        let fixture = match scope {
            ScopeArg::Function => CollectionFixture::function(&self.registry),
            ScopeArg::Module => CollectionFixture::module(&self.registry),
        };
        fixture.indirection_keys(self.config.indirection_keys.iter().cloned())
    }
}

/// Loads every batch of a batch file.
pub fn read_batches(path: &Path) -> Result<Vec<RequestBatch>> {
    load_batches(path).with_context(|| format!("Failed to load batches from {}", path.display()))
}
