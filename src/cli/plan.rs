//! Show the collections a batch file resolves to.
//!
//! `repokit plan` runs every batch of a file through the same pipeline a
//! test fixture uses and prints the resulting handles. With `--setup` each
//! collection is also bound through the in-memory recording backend, and
//! the backend calls are printed in order, as a dry run of what a test run
//! would ask the content platform to do. Each `--host` is then registered
//! against the bound collection.
//!
//! # Examples
//!
//! ```bash
//! repokit plan batches/ansible.toml --param distro=rhel8 --param cdn=true
//! repokit plan batches/ansible.toml --scope module --format json
//! repokit plan batches/ansible.toml --param distro=rhel8 --setup --org-id 3 --lce-id 5
//! repokit plan batches/ansible.toml --param distro=rhel8 --setup --host client.example.com
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::common::{CommandContext, OutputFormat, ParamArgs, ScopeArg, read_batches};
use crate::backend::{BackendCall, EntityRef, RecordingBackend};
use crate::batch::Options;
use crate::collection::{CollectionState, RepositoryCollection, SetupContentData};
use crate::core::{ContentType, RepositoryOrigin};

/// Command to print resolved repository collections
#[derive(Args, Debug)]
pub struct PlanCommand {
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

    /// Bind each collection through the recording backend
    #[arg(long)]
    pub setup: bool,

    /// Organization id used with --setup
    #[arg(long, requires = "setup", value_name = "ID")]
    pub org_id: Option<u64>,

    /// Lifecycle environment id used with --setup
    #[arg(long, requires = "setup", value_name = "ID")]
    pub lce_id: Option<u64>,

    /// Content host to register after --setup (repeatable)
    #[arg(long = "host", requires = "setup", value_name = "HOSTNAME")]
    pub hosts: Vec<String>,
}

/// One handle as shown by `plan`
#[derive(Debug, Serialize)]
pub struct PlannedRepository {
    /// Kind tag
    pub kind: String,
    /// Custom or Red Hat
    pub origin: RepositoryOrigin,
    /// Content type
    pub content_type: ContentType,
    /// Resolved options
    pub options: Options,
}

/// Everything `plan` reports for one batch
#[derive(Debug, Serialize)]
pub struct BatchPlan {
    /// Position of the batch in the file, from 1
    pub batch: usize,
    /// Collection distro
    pub distro: Option<String>,
    /// Collection state after planning
    pub state: CollectionState,
    /// Handles in order
    pub repositories: Vec<PlannedRepository>,
    /// Recorded binding, with `--setup`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<SetupContentData>,
    /// Hosts registered with `--host`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<EntityRef>,
    /// Backend calls made by the binding, with `--setup`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<BackendCall>,
}

impl PlanCommand {
    /// Execute the plan command.
    pub fn execute(self, ctx: &CommandContext) -> Result<()> {
        let plans = self.plan(ctx)?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plans)?),
            OutputFormat::Text => {
                for plan in &plans {
                    print_plan(plan);
                }
            }
        }
        Ok(())
    }

    /// Builds (and with `--setup`, binds) one collection per batch.
    pub fn plan(&self, ctx: &CommandContext) -> Result<Vec<BatchPlan>> {
        let batches = read_batches(&self.file)?;
        let invocation = self.params.context(&ctx.config);
        let fixture = ctx.fixture(self.scope);

        let mut plans = Vec::with_capacity(batches.len());
        for (index, batch) in batches.iter().enumerate() {
            let number = index + 1;
            let mut collection = fixture
                .assemble(batch, &invocation)
                .with_context(|| format!("Batch {number} of {}", self.file.display()))?;

            let mut calls = Vec::new();
            let mut hosts = Vec::with_capacity(self.hosts.len());
            if self.setup {
                let mut backend = RecordingBackend::new();
                collection
                    .setup_content(&mut backend, self.org_id.unwrap_or(1), self.lce_id.unwrap_or(1))
                    .with_context(|| format!("Setting up batch {number}"))?;
                for hostname in &self.hosts {
                    hosts.push(
                        collection
                            .setup_virtual_machine(&mut backend, hostname)
                            .with_context(|| format!("Registering {hostname} for batch {number}"))?,
                    );
                }
                calls = backend.calls().to_vec();
            }

            let mut plan = batch_plan(number, &collection, calls);
            plan.hosts = hosts;
            plans.push(plan);
        }
        Ok(plans)
    }
}

fn batch_plan(number: usize, collection: &RepositoryCollection, calls: Vec<BackendCall>) -> BatchPlan {
    BatchPlan {
        batch: number,
        distro: collection.distro().map(str::to_string),
        state: collection.state(),
        repositories: collection
            .handles()
            .iter()
            .map(|h| PlannedRepository {
                kind: h.kind().to_string(),
                origin: h.origin(),
                content_type: h.content_type(),
                options: h.options().clone(),
            })
            .collect(),
        setup: collection.setup_content_data().cloned(),
        hosts: Vec::new(),
        calls,
    }
}

fn print_plan(plan: &BatchPlan) {
    let distro = plan.distro.as_deref().unwrap_or("none");
    println!("{} {} (distro {})", "Batch".bold(), plan.batch, distro.cyan());

    if plan.repositories.is_empty() {
        println!("  {}", "(no repositories)".dimmed());
    }
    for (i, repo) in plan.repositories.iter().enumerate() {
        let options = serde_json::Value::Object(repo.options.clone());
        println!(
            "  {}. {} [{}, {}] {}",
            i + 1,
            repo.kind.green(),
            repo.content_type,
            repo.origin,
            options
        );
    }

    if let Some(setup) = &plan.setup {
        println!(
            "  {} organization {} / lifecycle environment {}",
            "Setup".bold(),
            setup.org_id,
            setup.lce.id
        );
        for call in &plan.calls {
            println!("    {} {}", "→".blue(), call.operation());
        }
        println!("  activation key {}", setup.activation_key.name.yellow());
        for host in &plan.hosts {
            println!("  host {} registered", host.name.cyan());
        }
    }
}
