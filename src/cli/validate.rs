//! Check a batch file without building anything.
//!
//! Validation runs the normalizer and resolver, checks every kind against
//! the registry and, at function scope, that a distro is available. No
//! factory is invoked, so nothing a factory would reject (a missing `url`,
//! a non-boolean `cdn`) is reported here; `repokit plan` catches those.
//!
//! # Examples
//!
//! ```bash
//! repokit validate batches/ansible.toml --param distro=rhel8
//! repokit validate batches/ansible.toml --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::common::{CommandContext, OutputFormat, ParamArgs, ScopeArg, read_batches};
use crate::batch::RequestBatch;
use crate::collection::{CollectionFixture, FactoryRegistry};
use crate::context::InvocationContext;
use crate::core::{RepokitError, user_friendly_error};

/// Command to validate a batch file
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Batch file (.toml, .yaml or .json)
    #[arg(value_name = "BATCH")]
    pub file: PathBuf,

    #[command(flatten)]
    pub params: ParamArgs,

    /// Fixture scope to resolve parameters from
    #[arg(long, value_enum, default_value = "function")]
    pub scope: ScopeArg,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Outcome of validating one batch
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Position of the batch in the file, from 1
    pub batch: usize,
    /// Number of resource requests after normalization
    pub requests: usize,
    /// Distro the collection would get
    pub distro: Option<String>,
    /// Why the batch is invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Suggested fix for `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Results for a whole file, used for JSON output
#[derive(Debug, Serialize)]
pub struct ValidationResults {
    /// No batch failed
    pub valid: bool,
    /// One entry per batch
    pub batches: Vec<BatchReport>,
    /// File-level failures (unreadable, unparsable)
    pub errors: Vec<String>,
    /// Non-fatal findings
    pub warnings: Vec<String>,
}

impl ValidateCommand {
    /// Execute the validate command.
    ///
    /// Fails after printing when any batch is invalid, so the process exits
    /// with status 1.
    pub fn execute(self, ctx: &CommandContext) -> Result<()> {
        let results = self.validate(ctx);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text => print_results(&results, &self.file),
        }

        if results.valid {
            Ok(())
        } else {
            let failed = results.errors.len()
                + results.batches.iter().filter(|b| b.error.is_some()).count();
            Err(RepokitError::Other {
                message: format!("Validation failed: {failed} error(s) in {}", self.file.display()),
            }
            .into())
        }
    }

    /// Validates every batch of the file.
    pub fn validate(&self, ctx: &CommandContext) -> ValidationResults {
        let mut results = ValidationResults {
            valid: true,
            batches: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        };

        let batches = match read_batches(&self.file) {
            Ok(batches) => batches,
            Err(e) => {
                results.valid = false;
                results.errors.push(format!("{e:#}"));
                return results;
            }
        };

        let invocation = self.params.context(&ctx.config);
        let fixture = ctx.fixture(self.scope);
        for (index, batch) in batches.iter().enumerate() {
            let number = index + 1;
            let report = match check_batch(&fixture, &ctx.registry, batch, &invocation) {
                Ok((requests, distro)) => {
                    if requests == 0 {
                        results.warnings.push(format!("Batch {number} declares no repositories"));
                    }
                    BatchReport {
                        batch: number,
                        requests,
                        distro,
                        error: None,
                        suggestion: None,
                    }
                }
                Err(e) => {
                    results.valid = false;
                    let message = format!("{e:#}");
                    BatchReport {
                        batch: number,
                        requests: 0,
                        distro: None,
                        error: Some(message),
                        suggestion: user_friendly_error(e).suggestion,
                    }
                }
            };
            results.batches.push(report);
        }
        results
    }
}

fn check_batch(
    fixture: &CollectionFixture<'_>,
    registry: &FactoryRegistry,
    batch: &RequestBatch,
    invocation: &InvocationContext,
) -> Result<(usize, Option<String>)> {
    let resolved = fixture.resolve(batch, invocation)?;
    for request in &resolved.requests {
        registry.check_kind(&request.kind)?;
    }

    if resolved.distro.is_none() && fixture.requires_distro() {
        return Err(RepokitError::MissingDistro {
            context: "repository collection".to_string(),
        }
        .into());
    }
    Ok((resolved.requests.len(), resolved.distro))
}

fn print_results(results: &ValidationResults, file: &std::path::Path) {
    println!("Validating {}...", file.display());

    for error in &results.errors {
        println!("{} {}", "✗".red(), error);
    }
    for report in &results.batches {
        match &report.error {
            None => println!(
                "{} Batch {}: {} request(s), distro {}",
                "✓".green(),
                report.batch,
                report.requests,
                report.distro.as_deref().unwrap_or("none")
            ),
            Some(error) => {
                println!("{} Batch {}: {}", "✗".red(), report.batch, error);
                if let Some(suggestion) = &report.suggestion {
                    println!("  {} {}", "suggestion:".green(), suggestion);
                }
            }
        }
    }
    for warning in &results.warnings {
        println!("{} {}", "⚠".yellow(), warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepokitConfig;
    use crate::test_utils::BatchFixture;
    use serde_json::json;
    use tempfile::TempDir;

    fn command(file: PathBuf) -> ValidateCommand {
        ValidateCommand {
            file,
            params: ParamArgs::default(),
            scope: ScopeArg::Function,
            format: OutputFormat::Json,
        }
    }

    fn context() -> CommandContext {
        CommandContext::new(RepokitConfig::default()).unwrap()
    }

    #[test]
    fn test_valid_batch() {
        let temp = TempDir::new().unwrap();
        let path = BatchFixture::basic().write_to(temp.path()).unwrap();

        let results = command(path).validate(&context());
        assert!(results.valid);
        assert_eq!(results.batches[0].requests, 3);
        assert_eq!(results.batches[0].distro.as_deref(), Some("rhel7"));
    }

    #[test]
    fn test_unknown_kind_with_suggestion() {
        let temp = TempDir::new().unwrap();
        let path = BatchFixture::unknown_kind().write_to(temp.path()).unwrap();

        let results = command(path).validate(&context());
        assert!(!results.valid);
        let report = &results.batches[0];
        assert!(report.error.as_deref().unwrap().contains("DebRepository"));
        assert!(report.suggestion.is_some());
    }

    #[test]
    fn test_missing_param_reported() {
        let temp = TempDir::new().unwrap();
        let path = BatchFixture::indirect().write_to(temp.path()).unwrap();

        let mut cmd = command(path);
        cmd.params.function = vec![("distro".to_string(), json!("rhel8"))];
        let results = cmd.validate(&context());
        assert!(!results.valid);
        assert!(results.batches[0].error.as_deref().unwrap().contains("'cdn'"));
    }

    #[test]
    fn test_duplicate_distro_reported() {
        let temp = TempDir::new().unwrap();
        let path = BatchFixture::duplicate_distro().write_to(temp.path()).unwrap();

        let results = command(path).validate(&context());
        assert!(!results.valid);
        assert!(results.batches[0].error.as_deref().unwrap().contains("duplicate 'distro'"));
    }

    #[test]
    fn test_unparsable_file() {
        let temp = TempDir::new().unwrap();
        let path = BatchFixture::invalid_syntax().write_to(temp.path()).unwrap();

        let results = command(path).validate(&context());
        assert!(!results.valid);
        assert_eq!(results.errors.len(), 1);
        assert!(results.batches.is_empty());
    }

    #[test]
    fn test_module_scope_does_not_require_distro() {
        let temp = TempDir::new().unwrap();
        let path = BatchFixture::without_distro().write_to(temp.path()).unwrap();

        let mut cmd = command(path);
        assert!(!cmd.validate(&context()).valid);
        cmd.scope = ScopeArg::Module;
        assert!(cmd.validate(&context()).valid);
    }

    #[test]
    fn test_numeric_distro_param_reported_as_wrong_type() {
        let temp = TempDir::new().unwrap();
        let path = BatchFixture::without_distro().write_to(temp.path()).unwrap();

        let mut cmd = command(path);
        cmd.params.function = vec![("distro".to_string(), json!(9))];
        let results = cmd.validate(&context());
        assert!(!results.valid);
        let error = results.batches[0].error.as_deref().unwrap();
        assert!(error.contains("parameter 'distro' visible from function scope must be a string"));
        assert!(error.contains("a number"));
    }
}
