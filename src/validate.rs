//! Cross-module injection validation.
//!
//! A provider may only inject names registered by its own module or by a
//! module listed in its module's declared dependencies. AngularJS itself
//! resolves injections against one flat injector, so code that forgets a
//! dependency often works by accident until load order changes. This check
//! catches that statically.
//!
//! Injected names that no scanned module registers (`$http`, `$scope`,
//! third-party services) are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::ModulesStructure;

/// How a provider name registered by several modules is attributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderScope {
    /// The module scanned last owns the name. Every collision is logged.
    #[default]
    Module,
    /// Names must be unique across all modules; collisions are violations.
    Global,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InjectViolation {
    /// A provider injects a name owned by a module its module does not depend on.
    #[error(
        "module '{module}': '{provider}' injects '{inject}' from module '{owner}', which '{module}' does not depend on"
    )]
    MissingDependency {
        /// Module of the injecting provider
        module: String,
        /// Injecting provider
        provider: String,
        /// Injected name
        inject: String,
        /// Module registering the injected name
        owner: String,
    },

    /// A provider name is registered by more than one module.
    #[error("provider '{provider}' is registered by several modules: {}", .modules.join(", "))]
    GlobalProviderCollision {
        /// Provider name
        provider: String,
        /// Registering modules in scan order
        modules: Vec<String>,
    },
}

/// Findings of [`validate_injects`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InjectReport {
    /// Violations in module, provider, inject order
    pub violations: Vec<InjectViolation>,
}

impl InjectReport {
    /// Whether no violation was found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check every provider's injections against its module's dependencies.
///
/// ```rust
/// use ngdeps_cli::extractor::ProviderKind;
/// use ngdeps_cli::graph::{ModulesStructure, Provider};
/// use ngdeps_cli::validate::{ProviderScope, validate_injects};
///
/// let mut graph = ModulesStructure::new();
/// graph.declare_module("api", vec![], "api.js", 1);
/// graph.add_provider("api", Provider::new(ProviderKind::Factory, "client", vec![], "api.js"));
/// graph.declare_module("app", vec![], "app.js", 1);
/// graph.add_provider(
///     "app",
///     Provider::new(ProviderKind::Controller, "Main", vec!["client".into()], "app.js"),
/// );
///
/// let report = validate_injects(&graph, ProviderScope::Module);
/// assert_eq!(report.violations.len(), 1);
/// ```
pub fn validate_injects(graph: &ModulesStructure, scope: ProviderScope) -> InjectReport {
    let mut registrations: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for module in graph {
        for provider in module.providers().iter().filter(|p| p.kind.registers_name()) {
            registrations.entry(provider.name.as_str()).or_default().push(module.name());
        }
    }

    let mut violations = Vec::new();
    let mut owners: IndexMap<&str, &str> = IndexMap::with_capacity(registrations.len());

    for (provider, modules) in &registrations {
        let Some(last) = modules.last() else {
            continue;
        };

        if modules.len() > 1 {
            match scope {
                ProviderScope::Module => {
                    tracing::warn!(
                        "Provider '{provider}' is registered by modules {}; attributing it to '{last}'",
                        modules.join(", ")
                    );
                }
                ProviderScope::Global => {
                    violations.push(InjectViolation::GlobalProviderCollision {
                        provider: (*provider).to_string(),
                        modules: modules.iter().map(ToString::to_string).collect(),
                    });
                    continue;
                }
            }
        }

        owners.insert(*provider, *last);
    }

    for module in graph {
        for provider in module.providers() {
            for inject in &provider.injects {
                let Some(owner) = owners.get(inject.as_str()) else {
                    continue;
                };
                if *owner == module.name() || module.depends_on(owner) {
                    continue;
                }
                violations.push(InjectViolation::MissingDependency {
                    module: module.name().to_string(),
                    provider: provider.name.clone(),
                    inject: inject.clone(),
                    owner: (*owner).to_string(),
                });
            }
        }
    }

    InjectReport {
        violations,
    }
}
