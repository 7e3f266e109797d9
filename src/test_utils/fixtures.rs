//! Sample batch documents

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A named batch document in TOML
#[derive(Clone, Debug)]
pub struct BatchFixture {
    pub content: String,
    pub name: String,
}

impl BatchFixture {
    /// Distro directive, two yum repositories, one Red Hat repository
    pub fn basic() -> Self {
        Self::toml(
            "basic",
            r#"
distro = "rhel7"
SatelliteToolsRepository = {}

[[YumRepository]]
url = "http://example.com/yum_0"

[[YumRepository]]
url = "http://example.com/yum_6"
"#,
        )
    }

    /// Options taking their values from the invocation's parameters
    pub fn indirect() -> Self {
        Self::toml(
            "indirect",
            r#"
RHELAnsibleEngineRepository = { cdn = "cdn", distro = "distro" }
YumRepository = { url = { from_param = "yum_url" } }
"#,
        )
    }

    /// No distro anywhere in the batch
    pub fn without_distro() -> Self {
        Self::toml(
            "without_distro",
            r#"
YumRepository = { url = "http://example.com/yum_0" }
"#,
        )
    }

    /// Kind that is not registered by default
    pub fn unknown_kind() -> Self {
        Self::toml(
            "unknown_kind",
            r#"
distro = "rhel8"
YumRepository = { url = "http://example.com/yum_0" }
DebRepository = { url = "http://example.com/deb" }
"#,
        )
    }

    /// Two distro directives inside a parametrization set entry
    pub fn duplicate_distro() -> Self {
        Self::toml(
            "duplicate_distro",
            r#"
distro = ["rhel7", "rhel8"]
YumRepository = { url = "http://example.com/yum_0" }
"#,
        )
    }

    /// Broken TOML
    pub fn invalid_syntax() -> Self {
        Self::toml(
            "invalid_syntax",
            r#"
YumRepository = { url = "http://example.com/yum_0"
"#,
        )
    }

    fn toml(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.trim_start().to_string(),
        }
    }

    /// Writes the fixture to `<dir>/<name>.toml` and returns the path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.toml", self.name));
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write batch fixture {}", path.display()))?;
        Ok(path)
    }
}
