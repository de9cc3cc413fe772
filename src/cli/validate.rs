//! Check the module graph and templates without writing anything.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::core::NgdepsError;
use crate::graph::{BuildIssue, find_cycle, format_trail};
use crate::templating::TemplateInjector;
use crate::validate::InjectViolation;

use super::CliConfig;
use super::common::{Scan, print_error, print_success, print_warning};

/// Report cycles, build issues, injection violations and template errors.
///
/// A dependency cycle or a template that cannot be rendered always fails
/// validation. Build issues and injection violations are warnings unless
/// `--strict` or `validation.strict` is set.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Treat build issues and injection violations as errors
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Output format shared by `validate` and `resolve`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Everything `validate` found, as printed with `--format json`.
#[derive(Debug, Default, Serialize)]
pub struct ValidationResults {
    /// No errors were found
    pub valid: bool,
    /// Modules in the graph
    pub modules: usize,
    /// Source files read
    pub files_scanned: usize,
    /// First dependency cycle, closed by repeating its first module
    pub cycle: Option<Vec<String>>,
    /// Templates checked
    pub templates: usize,
    /// Scan findings
    pub issues: Vec<BuildIssue>,
    /// Injection findings
    pub violations: Vec<InjectViolation>,
    /// Messages that fail validation
    pub errors: Vec<String>,
    /// Messages that do not
    pub warnings: Vec<String>,
}

impl ValidateCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let scan = Scan::load(config).await?;
        let strict = scan.is_strict(self.strict);
        let report = scan.inject_report();

        let mut results = ValidationResults {
            modules: scan.outcome.graph.len(),
            files_scanned: scan.outcome.files_scanned,
            ..Default::default()
        };

        if let Some(cycle) = find_cycle(&scan.outcome.graph) {
            results.errors.push(format!("Circular dependency detected: {}", format_trail(&cycle)));
            results.cycle = Some(cycle);
        }

        let findings = scan.findings(&report);
        if strict {
            results.errors.extend(findings);
        } else {
            results.warnings.extend(findings);
        }

        let templates = scan.project.template_paths();
        results.templates = templates.len();
        let injector = TemplateInjector::new(
            &scan.outcome.graph,
            scan.project.tag_renderer()?,
            scan.project.markers(),
        );
        for template in &templates {
            if let Err(e) = injector.prepare_file(template) {
                results.errors.push(format!("{e:#}"));
            }
        }

        results.issues = scan.outcome.issues;
        results.violations = report.violations;
        results.valid = results.errors.is_empty();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            OutputFormat::Text => print_text(&results, config.quiet),
        }

        if results.valid {
            Ok(())
        } else {
            Err(NgdepsError::ValidationFailed {
                count: results.errors.len(),
            }
            .into())
        }
    }
}

fn print_text(results: &ValidationResults, quiet: bool) {
    if !quiet {
        print_success(&format!(
            "Scanned {} file(s), {} module(s), {} template(s)",
            results.files_scanned, results.modules, results.templates
        ));
        for warning in &results.warnings {
            print_warning(warning);
        }
    }

    for error in &results.errors {
        print_error(error);
    }

    if results.valid && !quiet {
        print_success("No blocking problems found");
    }
}
