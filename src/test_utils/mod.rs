//! Test utilities for ngdeps
//!
//! Helpers shared by unit tests and the integration suite (through the
//! `test-utils` feature):
//!
//! - [`init_test_logging`] - One-time tracing setup that writes into test output
//! - [`graph_from`] - Build a [`ModulesStructure`] from `(module, deps)` pairs
//! - [`SourceTree`] - A temporary directory of source and template files
//!
//! # Example
//!
//! ```rust,no_run
//! use ngdeps_cli::test_utils::{SourceTree, graph_from};
//!
//! let tree = SourceTree::new();
//! tree.write("src/app.js", "angular.module('app', []);");
//!
//! let graph = graph_from(&[("app", &["core"]), ("core", &[])]);
//! assert_eq!(graph.len(), 2);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::graph::ModulesStructure;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` when set, otherwise leaves
/// logging off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=ngdeps_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Build a graph where every module is declared in `<name>.js` (size 1).
pub fn graph_from(modules: &[(&str, &[&str])]) -> ModulesStructure {
    let mut graph = ModulesStructure::new();
    for (name, dependencies) in modules {
        let dependencies = dependencies.iter().map(|dep| (*dep).to_string()).collect();
        graph.declare_module(name, dependencies, &format!("{name}.js"), 1);
    }
    graph
}

/// A temporary project directory, removed on drop.
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    /// Create an empty tree.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the tree.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics on any I/O failure.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent directory");
        }
        std::fs::write(&path, content).expect("failed to write file");
        path
    }

    /// Read `relative` back as a string.
    ///
    /// # Panics
    ///
    /// Panics when the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.join(relative)).expect("failed to read file")
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}
