//! Run-wide configuration file
//!
//! [`RepokitConfig`] is read once per run. It never changes a batch: it only
//! contributes session-scope parameters, extra custom kinds and the set of
//! legacy indirection keys.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::batch::Options;
use crate::collection::FactoryRegistry;
use crate::constants::{CONFIG_ENV_VAR, DEFAULT_INDIRECTION_KEYS, DISTRO_KEY, PROJECT_CONFIG_FILE};
use crate::context::{FixtureScope, InvocationContext};
use crate::core::{ContentType, RepokitError};

/// A custom repository kind declared in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindConfig {
    /// Content type of repositories of this kind
    pub content_type: ContentType,
}

/// Contents of `repokit.toml`
///
/// # Examples
///
/// ```rust
/// use repokit_cli::config::RepokitConfig;
/// use repokit_cli::context::{FixtureScope, InvocationContext};
///
/// # fn example() -> anyhow::Result<()> {
/// let config: RepokitConfig = toml::from_str(r#"
///     default_distro = "rhel8"
///
///     [params]
///     cdn = true
/// "#)?;
///
/// let mut ctx = InvocationContext::new();
/// config.apply_to(&mut ctx);
/// assert_eq!(ctx.lookup_str("distro", FixtureScope::Function), Some("rhel8"));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepokitConfig {
    /// Distro bound at session scope when `[params]` has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_distro: Option<String>,

    /// Keys honouring the `key = "key"` sentinel.
    pub indirection_keys: Vec<String>,

    /// Parameters bound at session scope.
    #[serde(skip_serializing_if = "Options::is_empty")]
    pub params: Options,

    /// Extra custom repository kinds, by kind tag.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub kinds: BTreeMap<String, KindConfig>,
}

impl Default for RepokitConfig {
    fn default() -> Self {
        Self {
            default_distro: None,
            indirection_keys: DEFAULT_INDIRECTION_KEYS.iter().map(ToString::to_string).collect(),
            params: Options::new(),
            kinds: BTreeMap::new(),
        }
    }
}

impl RepokitConfig {
    /// Loads the configuration, honouring an explicit path first.
    ///
    /// See the [module docs](crate::config) for the lookup order. Returns the
    /// defaults when no file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicitly named file (flag or `REPOKIT_CONFIG`) does not exist
    /// - The file cannot be read
    /// - The file is not valid TOML or does not match the schema
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let project_dir = std::env::current_dir().context("Failed to determine current directory")?;
        let user_path = Self::default_path().ok();

        match Self::locate(explicit, from_env.as_deref(), &project_dir, user_path.as_deref())? {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Picks the configuration file to read.
    ///
    /// `explicit` and `from_env` must exist when given; `project_dir` and
    /// `user_path` are candidates only.
    pub fn locate(
        explicit: Option<&Path>,
        from_env: Option<&Path>,
        project_dir: &Path,
        user_path: Option<&Path>,
    ) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit.or(from_env) {
            if !path.is_file() {
                return Err(RepokitError::ConfigError {
                    message: format!("configuration file {} does not exist", path.display()),
                }
                .into());
            }
            return Ok(Some(path.to_path_buf()));
        }

        let project = project_dir.join(PROJECT_CONFIG_FILE);
        if project.is_file() {
            return Ok(Some(project));
        }

        Ok(user_path.filter(|p| p.is_file()).map(Path::to_path_buf))
    }

    /// Loads the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// `indirection_keys` contains the empty string.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration from {}", path.display()))?;

        if config.indirection_keys.iter().any(String::is_empty) {
            return Err(RepokitError::ConfigError {
                message: format!("{}: indirection_keys may not contain an empty key", path.display()),
            }
            .into());
        }

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// User-wide configuration path.
    ///
    /// - **Unix/macOS**: `~/.repokit/config.toml`
    /// - **Windows**: `%LOCALAPPDATA%\repokit\config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("repokit")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".repokit")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Binds `[params]` and `default_distro` at session scope.
    ///
    /// A `distro` entry in `[params]` wins over `default_distro`.
    pub fn apply_to(&self, ctx: &mut InvocationContext) {
        for (name, value) in &self.params {
            ctx.bind(FixtureScope::Session, name.clone(), value.clone());
        }

        if let Some(distro) = &self.default_distro {
            if self.params.contains_key(DISTRO_KEY) {
                warn!("Both default_distro and params.distro are set; using params.distro");
            } else {
                ctx.bind(FixtureScope::Session, DISTRO_KEY, distro.clone().into());
            }
        }
    }

    /// Registers the configured custom kinds.
    ///
    /// # Errors
    ///
    /// Fails on the first kind the registry rejects (bad name, or a name
    /// clashing with a built-in kind).
    pub fn register_kinds(&self, registry: &mut FactoryRegistry) -> Result<()> {
        for (kind, config) in &self.kinds {
            registry
                .register_custom_kind(kind, config.content_type)
                .with_context(|| format!("Failed to register kind '{kind}' from configuration"))?;
        }
        Ok(())
    }
}
