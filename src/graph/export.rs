//! Text renderings of the module graph.

use std::collections::HashSet;
use std::fmt::Write;

use super::ModulesStructure;

/// Render the graph in Graphviz DOT format.
///
/// Every module becomes a node; every dependency on a module present in the
/// graph becomes an edge. External dependencies are left out.
pub fn to_dot(graph: &ModulesStructure) -> String {
    let mut dot = String::from("digraph modules {\n");
    dot.push_str("    rankdir=LR;\n");

    for module in graph {
        let _ = writeln!(dot, "    {};", quote(module.name()));
    }
    for module in graph {
        for dependency in module.dependencies().iter().filter(|dep| graph.contains(dep)) {
            let _ = writeln!(dot, "    {} -> {};", quote(module.name()), quote(dependency));
        }
    }

    dot.push_str("}\n");
    dot
}

fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render the dependency tree below `root`.
///
/// A module already on the path above it is marked `(circular reference)`.
/// A module already expanded elsewhere in the tree is marked `(*)` and not
/// expanded again. External dependencies are marked `(external)`.
///
/// ```text
/// app
/// ├── core
/// │   └── ngRoute (external)
/// └── widgets
///     └── core (*)
/// ```
pub fn to_tree_string(graph: &ModulesStructure, root: &str) -> String {
    let mut result = format!("{root}\n");
    let mut path = vec![root.to_string()];
    let mut expanded = HashSet::new();
    expanded.insert(root.to_string());
    build_tree_string(graph, root, &mut result, "", &mut path, &mut expanded);
    result
}

fn build_tree_string(
    graph: &ModulesStructure,
    name: &str,
    result: &mut String,
    prefix: &str,
    path: &mut Vec<String>,
    expanded: &mut HashSet<String>,
) {
    let Some(module) = graph.get(name) else {
        return;
    };

    let deps = module.dependencies();
    for (i, dep) in deps.iter().enumerate() {
        let is_last = i == deps.len() - 1;
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };

        let marker = if !graph.contains(dep) {
            Some(" (external)")
        } else if path.contains(dep) {
            Some(" (circular reference)")
        } else if expanded.contains(dep) {
            Some(" (*)")
        } else {
            None
        };

        let _ = writeln!(result, "{prefix}{connector}{dep}{}", marker.unwrap_or_default());
        if marker.is_some() {
            continue;
        }

        expanded.insert(dep.clone());
        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        path.push(dep.clone());
        build_tree_string(graph, dep, result, &child_prefix, path, expanded);
        path.pop();
    }
}
