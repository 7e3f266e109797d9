//! Common test utilities for repokit integration tests

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use repokit_cli::test_utils::BatchFixture;

/// Isolated working directory for running the binary
///
/// The directory doubles as `HOME`, so a user-wide configuration on the
/// machine running the tests is never picked up.
pub struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    /// Creates an empty project directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    /// Project directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes a sample batch and returns its file name.
    pub fn write_batch(&self, fixture: &BatchFixture) -> Result<String> {
        let path = fixture.write_to(self.path())?;
        Ok(file_name(&path))
    }

    /// Writes `content` to `name` inside the project.
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {name}"))?;
        Ok(path)
    }

    /// Runs `repokit` with `args` inside the project.
    pub fn run_repokit(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = assert_cmd::Command::cargo_bin("repokit")?
            .args(args)
            .current_dir(self.path())
            .env("HOME", self.path())
            .env_remove("REPOKIT_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .context("Failed to run repokit")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Captured result of one `repokit` run
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStderr: {}",
            self.code, self.stderr
        );
        self
    }

    /// Assert the command failed with exit code 1
    pub fn assert_failure(&self) -> &Self {
        assert_eq!(self.code, Some(1), "Expected exit code 1\nStdout: {}", self.stdout);
        self
    }

    /// Assert stdout contains the given text
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    /// Assert stderr contains the given text
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }

    /// Parses stdout as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}
