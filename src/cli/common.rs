//! Steps shared by every command.

use anyhow::Result;
use colored::Colorize;

use crate::config::Project;
use crate::graph::{BuildOutcome, GraphBuilder};
use crate::utils::spinner_with_message;
use crate::validate::{InjectReport, validate_injects};

use super::CliConfig;

/// A loaded project and the graph scanned from its roots.
pub(super) struct Scan {
    pub project: Project,
    pub outcome: BuildOutcome,
}

impl Scan {
    /// Load the configuration and scan every source root.
    pub async fn load(config: &CliConfig) -> Result<Self> {
        let project = Project::load(config.config_path.as_deref())?;
        let roots = project.source_roots()?;
        tracing::debug!("Loaded configuration from {}", project.dir.display());

        let spinner = spinner_with_message(format!("Scanning {} source root(s)", roots.len()));
        let outcome = GraphBuilder::build(project.build_options(), &roots).await;
        spinner.finish_and_clear();
        let outcome = outcome?;

        tracing::info!(
            "Scanned {} file(s): {} module(s), {} issue(s)",
            outcome.files_scanned,
            outcome.graph.len(),
            outcome.issues.len()
        );

        Ok(Self {
            project,
            outcome,
        })
    }

    /// Whether `--strict` or `validation.strict` asks for findings to fail.
    pub fn is_strict(&self, flag: bool) -> bool {
        flag || self.project.config.validation.strict
    }

    /// Run injection validation with the configured provider scope.
    pub fn inject_report(&self) -> InjectReport {
        validate_injects(&self.outcome.graph, self.project.config.validation.provider_scope)
    }

    /// Build issues followed by injection violations, as messages.
    pub fn findings(&self, report: &InjectReport) -> Vec<String> {
        self.outcome
            .issues
            .iter()
            .map(ToString::to_string)
            .chain(report.violations.iter().map(ToString::to_string))
            .collect()
    }
}

pub(super) fn print_warning(message: &str) {
    println!("{} Warning: {message}", "⚠".yellow());
}

pub(super) fn print_error(message: &str) {
    println!("{} {message}", "✗".red());
}

pub(super) fn print_success(message: &str) {
    println!("{} {message}", "✓".green());
}
