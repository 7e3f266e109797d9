//! List the registered resource kinds.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::common::{CommandContext, OutputFormat};
use crate::collection::repositories::{CUSTOM_KINDS, REDHAT_KINDS};

/// Command to list resource kinds
#[derive(Args, Debug)]
pub struct KindsCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// One registered kind
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct KindEntry {
    /// Kind tag
    pub kind: String,
    /// `builtin` or `config`
    pub source: &'static str,
    /// Content type for custom kinds, `reposet:<key>` for Red Hat kinds
    pub detail: String,
}

impl KindsCommand {
    /// Execute the kinds command.
    pub fn execute(self, ctx: &CommandContext) -> Result<()> {
        let entries = list_kinds(ctx);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
            OutputFormat::Text => {
                for entry in &entries {
                    let source = if entry.source == "config" {
                        entry.source.yellow()
                    } else {
                        entry.source.dimmed()
                    };
                    println!("{:<30} {:<22} {}", entry.kind.green(), entry.detail, source);
                }
            }
        }
        Ok(())
    }
}

/// Registered kinds in name order.
pub fn list_kinds(ctx: &CommandContext) -> Vec<KindEntry> {
    ctx.registry
        .kinds()
        .into_iter()
        .map(|kind| {
            let (source, detail) = if let Some((_, ct)) = CUSTOM_KINDS.iter().find(|(k, _)| *k == kind) {
                ("builtin", ct.to_string())
            } else if let Some((_, reposet)) = REDHAT_KINDS.iter().find(|(k, _)| *k == kind) {
                ("builtin", format!("reposet:{reposet}"))
            } else if let Some(config) = ctx.config.kinds.get(kind) {
                ("config", config.content_type.to_string())
            } else {
                ("config", String::new())
            };
            KindEntry {
                kind: kind.to_string(),
                source,
                detail,
            }
        })
        .collect()
}
