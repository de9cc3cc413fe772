//! Rewrite template marker regions.

use anyhow::Result;
use clap::Args;

use crate::core::NgdepsError;
use crate::graph::{find_cycle, format_trail};
use crate::templating::{TemplateInjector, write_prepared};

use super::CliConfig;
use super::common::{Scan, print_error, print_success, print_warning};

/// Inject script tags into every configured template.
///
/// Templates are rendered in memory first. Nothing is written unless every
/// template renders.
#[derive(Args, Debug)]
pub struct InjectCommand {
    /// Fail on cycles, build issues and injection violations instead of warning
    #[arg(long)]
    strict: bool,

    /// Report which templates would change without writing them
    #[arg(long)]
    dry_run: bool,
}

impl InjectCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let scan = Scan::load(config).await?;
        let strict = scan.is_strict(self.strict);
        let report = scan.inject_report();
        let findings = scan.findings(&report);
        let cycle = find_cycle(&scan.outcome.graph);

        if strict {
            if let Some(cycle) = cycle {
                return Err(NgdepsError::CircularDependency {
                    chain: format_trail(&cycle),
                }
                .into());
            }
            if !findings.is_empty() {
                for finding in &findings {
                    print_error(finding);
                }
                return Err(NgdepsError::ValidationFailed {
                    count: findings.len(),
                }
                .into());
            }
        } else if !config.quiet {
            for finding in &findings {
                print_warning(finding);
            }
            if let Some(cycle) = cycle {
                print_warning(&format!("Circular dependency detected: {}", format_trail(&cycle)));
            }
        }

        let templates = scan.project.template_paths();
        if templates.is_empty() {
            if !config.quiet {
                println!("No templates configured");
            }
            return Ok(());
        }

        let injector = TemplateInjector::new(
            &scan.outcome.graph,
            scan.project.tag_renderer()?,
            scan.project.markers(),
        );
        let prepared = injector.prepare(&templates)?;

        if self.dry_run {
            for template in &prepared {
                let state = if template.is_changed() {
                    "would be updated"
                } else {
                    "up to date"
                };
                println!("{} {state}", template.path.display());
            }
            return Ok(());
        }

        let written = write_prepared(&prepared)?;
        if !config.quiet {
            print_success(&format!("Updated {written} of {} template(s)", prepared.len()));
        }
        Ok(())
    }
}
