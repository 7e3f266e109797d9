//! Global constants used throughout the repokit codebase.
//!
//! The reserved keys below are part of the declarative batch contract: test
//! authors write them into parametrized batches and the normalizer and
//! resolver match on them literally.

/// Batch key carrying the shared distro directive.
///
/// At the top level of a batch it names the distro for the whole collection.
/// Inside an item's options it is also eligible for indirection.
pub const DISTRO_KEY: &str = "distro";

/// Option key selecting CDN content for Red Hat repositories.
pub const CDN_KEY: &str = "cdn";

/// Keys whose value may name a bound parameter using the legacy sentinel
/// (`distro = "distro"`).
pub const DEFAULT_INDIRECTION_KEYS: &[&str] = &[CDN_KEY, DISTRO_KEY];

/// Field of the explicit indirection form (`distro = { from_param = "distro" }`).
pub const FROM_PARAM_FIELD: &str = "from_param";

/// Option key carrying a custom repository's feed URL.
pub const URL_KEY: &str = "url";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "REPOKIT_CONFIG";

/// Project-local configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "repokit.toml";

/// Maximum Levenshtein distance, as a percentage of the target length, for
/// "did you mean" suggestions.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Maximum number of suggestions shown for an unknown kind.
pub const MAX_SUGGESTIONS: usize = 3;
