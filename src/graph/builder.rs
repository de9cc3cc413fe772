//! Scanning source roots into a [`ModulesStructure`].
//!
//! A scan walks each [`SourceRoot`] in turn. Inside one root the files are
//! visited in sorted path order and their declarations are applied to the
//! graph strictly sequentially, because two pieces of state carry over from
//! one file to the next:
//!
//! - the *current module*, which receives providers registered on a chain
//!   whose module was set by an earlier statement or file, and
//! - the [`ChainScope`] of variables bound to module chains.
//!
//! Both live in an explicit traversal state that is reset when a new root
//! starts, so roots never leak state into each other. File contents are read
//! concurrently; only the merge is sequential.
//!
//! Non-fatal findings are collected as [`BuildIssue`]s next to the graph. A
//! missing root directory is the only fatal scan error.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use glob::Pattern;
use serde::Serialize;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{ModulesStructure, Provider};
use crate::constants::{DEFAULT_EXTENSION, MAX_CONCURRENT_READS};
use crate::core::NgdepsError;
use crate::extractor::{self, ChainScope, Constructor, Declaration, ProviderKind};
use crate::utils::to_slash_path;

/// Maps a source file path to the identifier stored in the graph.
///
/// Identifiers are what end up in generated tags, so a mapper typically turns
/// a file system path into a URL path. Any `Fn(&Path) -> String` closure is a
/// mapper.
pub trait FileNameMapper: Send + Sync {
    /// Identifier for the file at `path`.
    fn map_path(&self, path: &Path) -> String;
}

impl<F> FileNameMapper for F
where
    F: Fn(&Path) -> String + Send + Sync,
{
    fn map_path(&self, path: &Path) -> String {
        self(path)
    }
}

/// A directory tree to scan.
pub struct SourceRoot {
    path: PathBuf,
    mapper: Option<Box<dyn FileNameMapper>>,
    exclude: Vec<Pattern>,
}

impl SourceRoot {
    /// Scan `path` with `/`-separated paths as file identifiers.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mapper: None,
            exclude: Vec::new(),
        }
    }

    /// Use `mapper` to compute file identifiers.
    #[must_use]
    pub fn with_mapper(mut self, mapper: impl FileNameMapper + 'static) -> Self {
        self.mapper = Some(Box::new(mapper));
        self
    }

    /// Skip files whose path relative to the root matches any pattern.
    #[must_use]
    pub fn with_exclude(mut self, patterns: Vec<Pattern>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier recorded in the graph for the file at `path`.
    pub fn file_id(&self, path: &Path) -> String {
        match &self.mapper {
            Some(mapper) => mapper.map_path(path),
            None => to_slash_path(path),
        }
    }

    /// Matching files under the root in sorted path order.
    fn discover(&self, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.path).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to walk source root: {}", self.path.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let matches_extension = path.extension().and_then(OsStr::to_str).is_some_and(|ext| {
                extensions.iter().any(|wanted| wanted.trim_start_matches('.') == ext)
            });
            if !matches_extension {
                continue;
            }

            let relative = to_slash_path(path.strip_prefix(&self.path).unwrap_or(path));
            if self.exclude.iter().any(|pattern| pattern.matches(&relative)) {
                tracing::trace!("Excluding {relative}");
                continue;
            }

            files.push(path.to_path_buf());
        }

        Ok(files)
    }
}

impl fmt::Debug for SourceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRoot")
            .field("path", &self.path)
            .field("mapper", &self.mapper.is_some())
            .field("exclude", &self.exclude)
            .finish()
    }
}

/// Knobs for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// File extensions to scan, without the leading dot
    pub extensions: Vec<String>,
    /// Report providers whose constructor is not minify-ready
    pub require_minify_ready: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            require_minify_ready: true,
        }
    }
}

/// A non-fatal finding collected while building the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildIssue {
    /// The constructor cannot survive minification.
    #[error("{provider_kind} '{provider}' in module '{module}' ({file}) is not minify-ready: {reason}")]
    NotMinifyReady {
        /// Owning module
        module: String,
        /// Provider name
        provider: String,
        /// Registration method
        provider_kind: ProviderKind,
        /// File identifier
        file: String,
        /// What is wrong with the constructor
        reason: String,
    },

    /// A second registration of the same name in the same module.
    #[error("{provider_kind} '{provider}' is registered twice in module '{module}'; ignoring the one in {file}")]
    DuplicateProvider {
        /// Owning module
        module: String,
        /// Provider name
        provider: String,
        /// Registration method of the ignored registration
        provider_kind: ProviderKind,
        /// File identifier of the ignored registration
        file: String,
    },

    /// A registration seen before any module in its source root.
    #[error("{provider_kind} '{provider}' in {file} is not attached to any module")]
    OrphanProvider {
        /// Provider name
        provider: String,
        /// Registration method
        provider_kind: ProviderKind,
        /// File identifier
        file: String,
    },

    /// A module that is referenced but never declared with a dependency list.
    #[error("module '{module}' is referenced but never declared")]
    UndeclaredModule {
        /// Module name
        module: String,
    },
}

/// Result of a completed scan.
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// The assembled module graph
    pub graph: ModulesStructure,
    /// Advisory findings in discovery order
    pub issues: Vec<BuildIssue>,
    /// Number of source files read
    pub files_scanned: usize,
}

/// Per-root state threaded through the files of one source root.
#[derive(Debug, Default)]
struct TraversalState {
    current_module: Option<String>,
    scope: ChainScope,
}

/// Incrementally applies declarations to a [`ModulesStructure`].
///
/// [`GraphBuilder::build`] is the usual entry point. The incremental methods
/// exist for callers that already hold source text in memory.
///
/// ```rust
/// use ngdeps_cli::graph::{BuildOptions, GraphBuilder};
///
/// let mut builder = GraphBuilder::new(BuildOptions::default());
/// builder.begin_root();
/// builder.add_source("app.js", "angular.module('app', ['core']);");
/// builder.add_source("core.js", "angular.module('core', []);");
///
/// let outcome = builder.finish();
/// assert_eq!(outcome.graph.len(), 2);
/// assert!(outcome.issues.is_empty());
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    options: BuildOptions,
    graph: ModulesStructure,
    issues: Vec<BuildIssue>,
    state: TraversalState,
    files_scanned: usize,
}

impl GraphBuilder {
    /// Create a builder with an empty graph.
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            graph: ModulesStructure::new(),
            issues: Vec::new(),
            state: TraversalState::default(),
            files_scanned: 0,
        }
    }

    /// Scan every root in order and return the finished graph.
    ///
    /// # Errors
    ///
    /// Fails with [`NgdepsError::RootNotFound`] when a root is not a directory,
    /// or when a file under a root cannot be read.
    pub async fn build(options: BuildOptions, roots: &[SourceRoot]) -> Result<BuildOutcome> {
        let mut builder = Self::new(options);
        for root in roots {
            builder.scan_root(root).await?;
        }
        Ok(builder.finish())
    }

    /// Scan one root, starting from a fresh traversal state.
    pub async fn scan_root(&mut self, root: &SourceRoot) -> Result<()> {
        if !root.path().is_dir() {
            return Err(NgdepsError::RootNotFound {
                path: root.path().display().to_string(),
            }
            .into());
        }

        self.begin_root();
        let files = root.discover(&self.options.extensions)?;
        tracing::debug!("Scanning {} file(s) under {}", files.len(), root.path().display());

        let contents: Vec<Vec<u8>> = stream::iter(files.iter().map(|path| async move {
            tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read source file: {}", path.display()))
        }))
        .buffered(MAX_CONCURRENT_READS)
        .try_collect()
        .await?;

        for (path, bytes) in files.iter().zip(contents) {
            let source = String::from_utf8_lossy(&bytes);
            self.apply_source(&root.file_id(path), bytes.len() as u64, &source);
        }

        Ok(())
    }

    /// Reset the traversal state before the first file of a new root.
    pub fn begin_root(&mut self) {
        self.state = TraversalState::default();
    }

    /// Apply one in-memory file, sized by its byte length.
    pub fn add_source(&mut self, file: &str, source: &str) {
        self.apply_source(file, source.len() as u64, source);
    }

    fn apply_source(&mut self, file: &str, size: u64, source: &str) {
        let declarations = extractor::extract(source, &mut self.state.scope);
        tracing::trace!("{file}: {} declaration(s)", declarations.len());

        for declaration in declarations {
            self.apply(file, size, declaration);
        }
        self.files_scanned += 1;
    }

    fn apply(&mut self, file: &str, size: u64, declaration: Declaration) {
        match declaration {
            Declaration::Module {
                name,
                dependencies: Some(dependencies),
            } => {
                self.graph.declare_module(&name, dependencies, file, size);
                self.state.current_module = Some(name);
            }
            Declaration::Module {
                name,
                dependencies: None,
            } => {
                self.graph.reference_module(&name, file, size);
                self.state.current_module = Some(name);
            }
            Declaration::DynamicModule => {
                self.state.current_module = None;
            }
            Declaration::Provider {
                kind,
                name,
                constructor,
            } => self.apply_provider(file, kind, name, constructor),
        }
    }

    fn apply_provider(&mut self, file: &str, kind: ProviderKind, name: String, constructor: Constructor) {
        let Some(module) = self.state.current_module.clone() else {
            self.issues.push(BuildIssue::OrphanProvider {
                provider: name,
                provider_kind: kind,
                file: file.to_string(),
            });
            return;
        };

        let injects = match constructor {
            Constructor::Annotated(names) => names,
            Constructor::Bare {
                params,
            } => {
                self.report_not_minify_ready(
                    &module,
                    &name,
                    kind,
                    file,
                    format!("constructor takes {params} parameter(s) without an annotation array"),
                );
                Vec::new()
            }
            Constructor::Missing {
                reason,
            } => {
                self.report_not_minify_ready(&module, &name, kind, file, reason);
                Vec::new()
            }
            Constructor::Opaque => Vec::new(),
        };

        let provider = Provider::new(kind, name.clone(), injects, file);
        if !self.graph.add_provider(&module, provider) {
            self.issues.push(BuildIssue::DuplicateProvider {
                module,
                provider: name,
                provider_kind: kind,
                file: file.to_string(),
            });
        }
    }

    fn report_not_minify_ready(
        &mut self,
        module: &str,
        provider: &str,
        kind: ProviderKind,
        file: &str,
        reason: String,
    ) {
        if !self.options.require_minify_ready {
            return;
        }
        self.issues.push(BuildIssue::NotMinifyReady {
            module: module.to_string(),
            provider: provider.to_string(),
            provider_kind: kind,
            file: file.to_string(),
            reason,
        });
    }

    /// Finish the scan, adding an issue for every module never declared.
    pub fn finish(mut self) -> BuildOutcome {
        let undeclared = self
            .graph
            .iter()
            .filter(|module| !module.is_declared())
            .map(|module| BuildIssue::UndeclaredModule {
                module: module.name().to_string(),
            });
        self.issues.extend(undeclared);

        BuildOutcome {
            graph: self.graph,
            issues: self.issues,
            files_scanned: self.files_scanned,
        }
    }
}
