//! Module graph assembled from extracted declarations.
//!
//! [`ModulesStructure`] maps every module name seen during a scan to its
//! [`Module`] record. Modules are kept in first-seen order, which makes every
//! traversal built on top of the graph (cycle detection, DOT export, issue
//! reporting) deterministic for a given file order.
//!
//! The graph is populated through three upserts that mirror the three kinds of
//! declaration found in source files:
//!
//! - [`ModulesStructure::declare_module`] for `angular.module(name, [deps])`
//! - [`ModulesStructure::reference_module`] for `angular.module(name)`
//! - [`ModulesStructure::add_provider`] for `.factory(...)`, `.service(...)`, etc.
//!
//! ```rust
//! use ngdeps_cli::graph::ModulesStructure;
//!
//! let mut graph = ModulesStructure::new();
//! graph.reference_module("core", "core/init.js", 40);
//! graph.declare_module("core", vec!["ngRoute".to_string()], "core/module.js", 120);
//!
//! let core = graph.get("core").unwrap();
//! assert_eq!(core.files(), ["core/module.js", "core/init.js"]);
//! assert_eq!(core.size(), 160);
//! assert!(core.is_declared());
//! ```

mod builder;
pub mod cycle;
pub mod export;
mod mapping;
pub mod resolve;

pub use builder::{
    BuildIssue, BuildOptions, BuildOutcome, FileNameMapper, GraphBuilder, SourceRoot,
};
pub use cycle::{find_cycle, format_trail};
pub use export::{to_dot, to_tree_string};
pub use mapping::PathMapping;
pub use resolve::{files_for, load_order, resolve};

use indexmap::IndexMap;
use serde::Serialize;

use crate::extractor::ProviderKind;

/// A named registration inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    /// Registration method
    pub kind: ProviderKind,
    /// Registered name
    pub name: String,
    /// Names injected into the constructor, empty when unknown
    pub injects: Vec<String>,
    /// File identifier where the registration was found
    pub file: String,
}

impl Provider {
    /// Create a provider record.
    pub fn new(
        kind: ProviderKind,
        name: impl Into<String>,
        injects: Vec<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            injects,
            file: file.into(),
        }
    }
}

/// Everything known about one module.
///
/// `files` has no duplicates. When the module is declared, the declaring file
/// sits at index 0 so that it loads before any file that only extends the
/// module. `size` is the byte total of the distinct files in `files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    name: String,
    dependencies: Vec<String>,
    files: Vec<String>,
    size: u64,
    providers: Vec<Provider>,
    declared: bool,
}

impl Module {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dependencies: Vec::new(),
            files: Vec::new(),
            size: 0,
            providers: Vec::new(),
            declared: false,
        }
    }

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared dependency names, possibly naming modules outside the graph.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// File identifiers contributing to this module, declaring file first.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Total byte size of [`Module::files`].
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Providers registered on this module, in discovery order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Whether a declaring `angular.module(name, [...])` call was seen.
    pub const fn is_declared(&self) -> bool {
        self.declared
    }

    /// Whether `name` appears in the declared dependency list.
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == name)
    }

    fn has_file(&self, file: &str) -> bool {
        self.files.iter().any(|existing| existing == file)
    }
}

/// All modules of a scan, keyed by name in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModulesStructure {
    modules: IndexMap<String, Module>,
}

impl ModulesStructure {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a module by name.
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Whether a module with this name was seen.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Iterate modules in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the graph has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Record `angular.module(name, dependencies)` found in `file`.
    ///
    /// The dependency list is replaced wholesale (a later declaration wins) and
    /// `file` is moved to the front of the file list. `size` is only added when
    /// the file was not yet part of the module.
    pub fn declare_module(&mut self, name: &str, dependencies: Vec<String>, file: &str, size: u64) {
        let module = self.entry(name);
        if module.declared {
            tracing::debug!("Module '{name}' declared again in {file}; replacing its dependencies");
        }

        module.dependencies = dependencies;
        module.declared = true;

        match module.files.iter().position(|existing| existing == file) {
            Some(index) => {
                let declaring = module.files.remove(index);
                module.files.insert(0, declaring);
            }
            None => {
                module.files.insert(0, file.to_string());
                module.size += size;
            }
        }
    }

    /// Record `angular.module(name)` found in `file`.
    ///
    /// Creates an undeclared placeholder when the module is new. The file is
    /// appended once; dependencies are never touched.
    pub fn reference_module(&mut self, name: &str, file: &str, size: u64) {
        let module = self.entry(name);
        if !module.has_file(file) {
            module.files.push(file.to_string());
            module.size += size;
        }
    }

    /// Register `provider` on `module`.
    ///
    /// Returns `false` without modifying the graph when the module is unknown or
    /// already registers a provider of the same name. Decorators wrap an
    /// existing name rather than registering one, so they are never rejected.
    pub fn add_provider(&mut self, module: &str, provider: Provider) -> bool {
        let Some(target) = self.modules.get_mut(module) else {
            return false;
        };

        if provider.kind.registers_name()
            && target
                .providers
                .iter()
                .any(|existing| existing.kind.registers_name() && existing.name == provider.name)
        {
            return false;
        }

        target.providers.push(provider);
        true
    }

    fn entry(&mut self, name: &str) -> &mut Module {
        self.modules
            .entry(name.to_string())
            .or_insert_with(|| Module::new(name))
    }
}

impl<'g> IntoIterator for &'g ModulesStructure {
    type Item = &'g Module;
    type IntoIter = indexmap::map::Values<'g, String, Module>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.values()
    }
}
