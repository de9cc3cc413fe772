//! Print what one root module pulls in.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::core::NgdepsError;
use crate::graph::{files_for, resolve, to_tree_string};

use super::CliConfig;
use super::common::Scan;
use super::validate::OutputFormat;

/// Resolve a root module's transitive dependencies.
///
/// Prints module names in load order, dependencies before dependents. With
/// `--files`, prints the file identifiers that a template region for the
/// module would receive instead.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Root module name
    module: String,

    /// Print file identifiers instead of module names
    #[arg(long)]
    files: bool,

    /// Print the dependency tree instead of the load order
    #[arg(long, conflicts_with_all = ["files", "format"])]
    tree: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ResolveCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let scan = Scan::load(config).await?;
        let graph = &scan.outcome.graph;

        // The tree marks cycles instead of failing on them
        if self.tree {
            if !graph.contains(&self.module) {
                return Err(NgdepsError::UnknownModule {
                    name: self.module,
                }
                .into());
            }
            print!("{}", to_tree_string(graph, &self.module));
            return Ok(());
        }

        let order = resolve(&self.module, graph)?;

        let files = if self.files {
            Some(files_for(&self.module, graph)?)
        } else {
            None
        };

        match self.format {
            OutputFormat::Json => {
                let output = json!({
                    "module": self.module,
                    "order": order,
                    "files": files,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                for line in files.as_ref().unwrap_or(&order) {
                    println!("{line}");
                }
            }
        }
        Ok(())
    }
}
