//! Load-order resolution for a root module.
//!
//! [`resolve`] answers "which modules must be loaded before `root`, and in
//! which order". Dependencies are walked depth first in declaration order and
//! emitted after their own dependencies (post-order), so every module appears
//! after everything it depends on. Each module is emitted once, at its first
//! completed visit.
//!
//! Dependencies that name modules missing from the graph are assumed to be
//! provided externally (a vendor bundle, a CDN) and are skipped. A cycle
//! reachable from the root is an error rather than a truncated order.

use std::collections::HashSet;

use super::cycle::format_trail;
use super::{Module, ModulesStructure};
use crate::core::NgdepsError;

/// Modules `root` depends on, transitively, in load order. `root` itself is
/// not included.
///
/// # Errors
///
/// - [`NgdepsError::UnknownModule`] when `root` is not in the graph
/// - [`NgdepsError::CircularDependency`] when a cycle is reachable from `root`
///
/// # Examples
///
/// ```rust
/// use ngdeps_cli::graph::{ModulesStructure, resolve};
///
/// let mut graph = ModulesStructure::new();
/// graph.declare_module("app", vec!["b".into(), "c".into()], "app.js", 1);
/// graph.declare_module("b", vec!["c".into()], "b.js", 1);
/// graph.declare_module("c", vec!["ngAnimate".into()], "c.js", 1);
///
/// assert_eq!(resolve("app", &graph)?, ["c", "b"]);
/// # Ok::<(), ngdeps_cli::core::NgdepsError>(())
/// ```
pub fn resolve(root: &str, graph: &ModulesStructure) -> Result<Vec<String>, NgdepsError> {
    let module = graph.get(root).ok_or_else(|| NgdepsError::UnknownModule {
        name: root.to_string(),
    })?;

    let mut walk = Walk {
        graph,
        trail: vec![module.name()],
        finished: HashSet::new(),
        order: Vec::new(),
    };
    walk.dependencies_of(module)?;

    Ok(walk.order)
}

/// [`resolve`] followed by `root` itself.
pub fn load_order(root: &str, graph: &ModulesStructure) -> Result<Vec<String>, NgdepsError> {
    let mut order = resolve(root, graph)?;
    order.push(root.to_string());
    Ok(order)
}

/// The files of every module in [`load_order`], concatenated.
///
/// Within a module the declaring file comes first. A file shared by two
/// modules is listed once per module.
pub fn files_for(root: &str, graph: &ModulesStructure) -> Result<Vec<String>, NgdepsError> {
    let files = load_order(root, graph)?
        .iter()
        .filter_map(|name| graph.get(name))
        .flat_map(|module| module.files().iter().cloned())
        .collect();
    Ok(files)
}

struct Walk<'g> {
    graph: &'g ModulesStructure,
    trail: Vec<&'g str>,
    finished: HashSet<&'g str>,
    order: Vec<String>,
}

impl<'g> Walk<'g> {
    fn dependencies_of(&mut self, module: &'g Module) -> Result<(), NgdepsError> {
        for dependency in module.dependencies() {
            let Some(target) = self.graph.get(dependency) else {
                tracing::trace!("'{}' depends on external module '{dependency}'", module.name());
                continue;
            };
            let name = target.name();

            if let Some(start) = self.trail.iter().position(|entry| *entry == name) {
                let mut chain = self.trail[start..].to_vec();
                chain.push(name);
                return Err(NgdepsError::CircularDependency {
                    chain: format_trail(&chain),
                });
            }

            if self.finished.contains(name) {
                continue;
            }

            self.trail.push(name);
            self.dependencies_of(target)?;
            self.trail.pop();

            self.finished.insert(name);
            self.order.push(name.to_string());
        }

        Ok(())
    }
}
