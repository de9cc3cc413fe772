//! ngdeps - static AngularJS module resolver and script tag injector
//!
//! AngularJS applications split into many `angular.module(...)` declarations
//! spread over many files, and every file has to be loaded by a `<script>`
//! tag in the right order. ngdeps reads the sources without executing them,
//! builds the module dependency graph and rewrites marked regions of HTML
//! templates with the tags a root module needs, dependencies first.
//!
//! # Pipeline
//!
//! 1. [`extractor`] parses each file with oxc and reports module declarations,
//!    module references and provider registrations in source order
//! 2. [`graph`] folds those declarations into a [`graph::ModulesStructure`],
//!    mapping each file to the identifier templates should reference
//! 3. [`graph::resolve`] orders a root module's transitive dependencies and
//!    [`graph::find_cycle`] reports cycles
//! 4. [`validate`] checks that providers only inject names from modules their
//!    module depends on
//! 5. [`templating`] renders one tag per file into each marker region
//!
//! # Configuration
//!
//! A project is described by `ngdeps.toml`:
//!
//! ```toml
//! [[roots]]
//! path = "src"
//! strip_prefix = "src"
//! prefix = "/static"
//!
//! [[templates]]
//! path = "index.html"
//! ```
//!
//! See [`config`] for every key.
//!
//! # Library use
//!
//! ```rust,no_run
//! use ngdeps_cli::graph::{BuildOptions, GraphBuilder, SourceRoot, files_for};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let outcome = GraphBuilder::build(BuildOptions::default(), &[SourceRoot::new("src")]).await?;
//! for file in files_for("app", &outcome.graph)? {
//!     println!("{file}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod extractor;
pub mod graph;
pub mod templating;
pub mod utils;
pub mod validate;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
