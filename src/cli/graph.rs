//! Graphviz export of the module graph.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::graph::to_dot;
use crate::utils::atomic_write;

use super::CliConfig;
use super::common::{Scan, print_success};

/// Export the module graph in DOT format.
#[derive(Args, Debug)]
pub struct GraphCommand {
    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl GraphCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let scan = Scan::load(config).await?;
        let dot = to_dot(&scan.outcome.graph);

        match self.output {
            Some(path) => {
                atomic_write(&path, dot.as_bytes())?;
                if !config.quiet {
                    print_success(&format!(
                        "Wrote {} module(s) to {}",
                        scan.outcome.graph.len(),
                        path.display()
                    ));
                }
            }
            None => print!("{dot}"),
        }
        Ok(())
    }
}
