//! Injecting script and style tags into template files.
//!
//! This is the last step of a run: for each template file, every marker
//! region names a root module, the module's files are resolved in load order
//! ([`crate::graph::files_for`]), and one tag per file is rendered into the
//! region.
//!
//! Writing is split from rendering. [`TemplateInjector::prepare`] renders
//! every template in memory and fails before anything touches the disk;
//! [`write_prepared`] then writes only the templates whose content changed,
//! each atomically.
//!
//! # Template variables
//!
//! Tag templates are tera templates with two variables:
//!
//! - `path`: the file identifier without the `!async` token
//! - `async`: `true` when the identifier carried the `!async` token
//!
//! # Example
//!
//! ```rust
//! use ngdeps_cli::graph::ModulesStructure;
//! use ngdeps_cli::templating::{Markers, TagRenderer, TemplateInjector};
//!
//! let mut graph = ModulesStructure::new();
//! graph.declare_module("core", vec![], "core.js", 1);
//! graph.declare_module("app", vec!["core".into()], "app.js", 1);
//!
//! let injector = TemplateInjector::new(&graph, TagRenderer::with_defaults()?, Markers::default());
//! let html = injector.render("index.html", "<!-- ngdeps:begin app -->\n<!-- ngdeps:end -->\n")?;
//! assert!(html.contains("<script src=\"core.js\"></script>\n<script src=\"app.js\"></script>\n"));
//! # Ok::<(), ngdeps_cli::core::NgdepsError>(())
//! ```

mod markers;
mod tags;

pub use markers::{Markers, inject_markers};
pub use tags::{TagRenderer, split_async};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::NgdepsError;
use crate::graph::{ModulesStructure, files_for};
use crate::utils::{atomic_write, to_slash_path};

/// Renders marker regions against one module graph.
#[derive(Debug)]
pub struct TemplateInjector<'g> {
    graph: &'g ModulesStructure,
    renderer: TagRenderer,
    markers: Markers,
}

/// A template rendered in memory, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTemplate {
    /// Template file on disk
    pub path: PathBuf,
    /// Content read from disk
    pub original: String,
    /// Content after injection
    pub rendered: String,
}

impl PreparedTemplate {
    /// Whether writing would change the file.
    pub fn is_changed(&self) -> bool {
        self.original != self.rendered
    }
}

impl<'g> TemplateInjector<'g> {
    /// Create an injector for `graph`.
    pub fn new(graph: &'g ModulesStructure, renderer: TagRenderer, markers: Markers) -> Self {
        Self {
            graph,
            renderer,
            markers,
        }
    }

    /// Rewrite every marker region of `content`.
    ///
    /// `file` is only used in error messages.
    pub fn render(&self, file: &str, content: &str) -> Result<String, NgdepsError> {
        inject_markers(content, file, &self.markers, |root| {
            files_for(root, self.graph)?
                .iter()
                .map(|entry| self.renderer.render(entry))
                .collect()
        })
    }

    /// Read and render every template, stopping at the first failure.
    pub fn prepare(&self, paths: &[PathBuf]) -> Result<Vec<PreparedTemplate>> {
        paths.iter().map(|path| self.prepare_file(path)).collect()
    }

    /// Read and render a single template.
    pub fn prepare_file(&self, path: &Path) -> Result<PreparedTemplate> {
        let original = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template: {}", path.display()))?;
        let rendered = self
            .render(&to_slash_path(path), &original)
            .with_context(|| format!("Failed to inject tags into {}", path.display()))?;
        Ok(PreparedTemplate {
            path: path.to_path_buf(),
            original,
            rendered,
        })
    }
}

/// Write every changed template; returns how many files were written.
pub fn write_prepared(prepared: &[PreparedTemplate]) -> Result<usize> {
    let mut written = 0;
    for template in prepared {
        if !template.is_changed() {
            tracing::debug!("{} is up to date", template.path.display());
            continue;
        }
        atomic_write(&template.path, template.rendered.as_bytes())?;
        tracing::info!("Updated {}", template.path.display());
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SourceTree, graph_from};

    fn injector(graph: &ModulesStructure) -> TemplateInjector<'_> {
        TemplateInjector::new(graph, TagRenderer::with_defaults().unwrap(), Markers::default())
    }

    #[test]
    fn test_render_uses_load_order_files() {
        let mut graph = graph_from(&[("app", &["core", "ngRoute"]), ("core", &[])]);
        graph.reference_module("app", "app/ctrl.js!async", 1);

        let html = injector(&graph)
            .render("index.html", "  <!-- ngdeps:begin app -->\n  <!-- ngdeps:end -->\n")
            .unwrap();
        assert_eq!(
            html,
            "  <!-- ngdeps:begin app -->\n  <script src=\"core.js\"></script>\n  <script src=\"app.js\"></script>\n  <script src=\"app/ctrl.js\" async></script>\n  <!-- ngdeps:end -->\n"
        );
    }

    #[test]
    fn test_render_cycle_is_fatal() {
        let graph = graph_from(&[("app", &["core"]), ("core", &["app"])]);
        let err = injector(&graph)
            .render("index.html", "<!-- ngdeps:begin app -->\n<!-- ngdeps:end -->")
            .unwrap_err();
        assert!(matches!(err, NgdepsError::CircularDependency { .. }));
    }

    #[test]
    fn test_prepare_fails_before_any_write() {
        let tree = SourceTree::new();
        tree.write("good.html", "<!-- ngdeps:begin app -->\n<!-- ngdeps:end -->\n");
        tree.write("bad.html", "<!-- ngdeps:begin ghost -->\n<!-- ngdeps:end -->\n");
        let graph = graph_from(&[("app", &[])]);

        let paths = vec![tree.path().join("good.html"), tree.path().join("bad.html")];
        let err = injector(&graph).prepare(&paths).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NgdepsError>(),
            Some(NgdepsError::UnknownModule { name }) if name == "ghost"
        ));
        assert_eq!(tree.read("good.html"), "<!-- ngdeps:begin app -->\n<!-- ngdeps:end -->\n");
    }

    #[test]
    fn test_write_skips_unchanged_templates() {
        let tree = SourceTree::new();
        tree.write("index.html", "<!-- ngdeps:begin app -->\n<!-- ngdeps:end -->\n");
        let graph = graph_from(&[("app", &[])]);
        let paths = vec![tree.path().join("index.html")];

        let prepared = injector(&graph).prepare(&paths).unwrap();
        assert_eq!(write_prepared(&prepared).unwrap(), 1);
        assert!(tree.read("index.html").contains("<script src=\"app.js\"></script>"));

        let prepared = injector(&graph).prepare(&paths).unwrap();
        assert!(!prepared[0].is_changed());
        assert_eq!(write_prepared(&prepared).unwrap(), 0);
    }
}
