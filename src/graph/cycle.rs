//! Cycle detection over module dependencies.
//!
//! The search is a depth-first walk from every module in first-seen order
//! with white/gray/black marking. A gray node is on the current trail, so an
//! edge into a gray node closes a cycle. Black nodes are fully explored and
//! cannot lead back into the trail, which keeps the walk linear without
//! changing which cycle is reported first.

use std::collections::HashMap;

use super::ModulesStructure;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited
    White,
    /// On the current trail
    Gray,
    /// Completely explored
    Black,
}

/// Find the first dependency cycle, if any.
///
/// The cycle is returned as a closed walk whose first and last entries are the
/// same module: `["a", "b", "a"]`. Dependencies naming modules outside the
/// graph are not followed.
///
/// ```rust
/// use ngdeps_cli::graph::{ModulesStructure, find_cycle};
///
/// let mut graph = ModulesStructure::new();
/// graph.declare_module("a", vec!["b".into()], "a.js", 1);
/// graph.declare_module("b", vec!["a".into(), "external".into()], "b.js", 1);
///
/// assert_eq!(find_cycle(&graph), Some(vec!["a".into(), "b".into(), "a".into()]));
/// ```
pub fn find_cycle(graph: &ModulesStructure) -> Option<Vec<String>> {
    let mut colors: HashMap<&str, Color> = HashMap::with_capacity(graph.len());
    let mut trail = Vec::new();

    for module in graph {
        if color_of(&colors, module.name()) == Color::White
            && let Some(cycle) = visit(graph, module.name(), &mut colors, &mut trail)
        {
            return Some(cycle);
        }
    }

    None
}

fn visit<'g>(
    graph: &'g ModulesStructure,
    name: &'g str,
    colors: &mut HashMap<&'g str, Color>,
    trail: &mut Vec<&'g str>,
) -> Option<Vec<String>> {
    colors.insert(name, Color::Gray);
    trail.push(name);

    let dependencies = graph.get(name).map(|module| module.dependencies()).unwrap_or_default();
    for dependency in dependencies {
        let Some(target) = graph.get(dependency) else {
            continue;
        };
        let target = target.name();

        match color_of(colors, target) {
            Color::Gray => {
                let start = trail.iter().position(|entry| *entry == target)?;
                let mut cycle: Vec<String> = trail[start..].iter().map(ToString::to_string).collect();
                cycle.push(target.to_string());
                return Some(cycle);
            }
            Color::White => {
                if let Some(cycle) = visit(graph, target, colors, trail) {
                    return Some(cycle);
                }
            }
            Color::Black => {}
        }
    }

    trail.pop();
    colors.insert(name, Color::Black);
    None
}

fn color_of(colors: &HashMap<&str, Color>, name: &str) -> Color {
    colors.get(name).copied().unwrap_or(Color::White)
}

/// Render a module trail as `a -> b -> a`.
pub fn format_trail<S: AsRef<str>>(trail: &[S]) -> String {
    trail.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::graph_from;
    use petgraph::algo::is_cyclic_directed;
    use petgraph::graph::DiGraph;
    use proptest::prelude::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn test_acyclic_graph() {
        let graph = graph_from(&[("A", &["B", "C"]), ("B", &["C"]), ("C", &[])]);
        assert_eq!(find_cycle(&graph), None);
    }

    #[test]
    fn test_two_node_cycle() {
        let graph = graph_from(&[("A", &["B"]), ("B", &["A"])]);
        assert_eq!(find_cycle(&graph), Some(strings(&["A", "B", "A"])));
    }

    #[test]
    fn test_self_dependency() {
        let graph = graph_from(&[("A", &["A"])]);
        assert_eq!(find_cycle(&graph), Some(strings(&["A", "A"])));
    }

    #[test]
    fn test_cycle_below_entry_point_is_sliced() {
        let graph = graph_from(&[("A", &["B"]), ("B", &["C"]), ("C", &["B"])]);
        assert_eq!(find_cycle(&graph), Some(strings(&["B", "C", "B"])));
    }

    #[test]
    fn test_dangling_dependencies_ignored() {
        let graph = graph_from(&[("A", &["ngRoute", "B"]), ("B", &["ui.router"])]);
        assert_eq!(find_cycle(&graph), None);
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let graph = graph_from(&[("A", &["B", "C"]), ("B", &["D"]), ("C", &["D"]), ("D", &[])]);
        assert_eq!(find_cycle(&graph), None);
    }

    #[test]
    fn test_format_trail() {
        assert_eq!(format_trail(&["a", "b", "a"]), "a -> b -> a");
        assert_eq!(format_trail::<&str>(&[]), "");
    }

    /// Random graphs over a small name space, with some edges pointing outside.
    fn arb_graph() -> impl Strategy<Value = Vec<(usize, Vec<usize>)>> {
        prop::collection::vec(prop::collection::vec(0usize..8, 0..4), 1..7)
            .prop_map(|deps| deps.into_iter().enumerate().collect())
    }

    proptest! {
        #[test]
        fn prop_detects_exactly_the_cyclic_graphs(edges in arb_graph()) {
            let names: Vec<String> = (0..8).map(|i| format!("m{i}")).collect();
            let mut graph = ModulesStructure::new();
            let mut oracle = DiGraph::<(), ()>::new();
            let nodes: Vec<_> = edges.iter().map(|_| oracle.add_node(())).collect();

            for (index, deps) in &edges {
                let dependencies = deps.iter().map(|dep| names[*dep].clone()).collect();
                graph.declare_module(&names[*index], dependencies, &format!("{index}.js"), 1);
                for dep in deps {
                    if *dep < edges.len() {
                        oracle.add_edge(nodes[*index], nodes[*dep], ());
                    }
                }
            }

            let cycle = find_cycle(&graph);
            prop_assert_eq!(cycle.is_some(), is_cyclic_directed(&oracle));

            if let Some(cycle) = cycle {
                prop_assert!(cycle.len() >= 2);
                prop_assert_eq!(cycle.first(), cycle.last());
                for pair in cycle.windows(2) {
                    let module = graph.get(&pair[0]).unwrap();
                    prop_assert!(module.depends_on(&pair[1]));
                }
            }
        }
    }
}
