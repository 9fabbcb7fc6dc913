//! Dependency graph over asset kinds.
//!
//! This module provides the graph data structure and algorithms the resolver
//! needs: cycle detection, topological ordering so dependencies are computed
//! before their dependents, and a printable tree for the `graph` command.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

use crate::asset::AssetKind;
use crate::core::ManifestError;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is currently being visited (in the DFS stack).
    Gray,
    /// Node has been fully visited.
    Black,
}

/// Dependency graph between assets.
///
/// An edge `from -> to` means `from` depends on `to`, so `to` must be
/// computed first.
pub struct DependencyGraph {
    /// The underlying directed graph.
    graph: DiGraph<AssetKind, ()>,
    /// Map from asset kinds to their graph indices.
    node_map: HashMap<AssetKind, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a node to the graph if it doesn't already exist.
    ///
    /// Returns the node index in the graph.
    pub fn add_node(&mut self, node: AssetKind) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node) {
            index
        } else {
            let index = self.graph.add_node(node);
            self.node_map.insert(node, index);
            index
        }
    }

    /// Add a dependency relationship to the graph.
    ///
    /// `from` depends on `to`, meaning `to` must be computed before `from`.
    pub fn add_dependency(&mut self, from: AssetKind, to: AssetKind) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Detect cycles in the dependency graph using DFS with colors.
    ///
    /// Returns [`ManifestError::CircularDependency`] with the cycle path if one
    /// is found.
    pub fn detect_cycles(&self) -> Result<(), ManifestError> {
        let mut colors: HashMap<NodeIndex, Color> = HashMap::new();
        let mut path: Vec<AssetKind> = Vec::new();

        for node in self.graph.node_indices() {
            colors.insert(node, Color::White);
        }

        for node in self.graph.node_indices() {
            if matches!(colors.get(&node), Some(Color::White))
                && let Some(cycle) = self.dfs_visit(node, &mut colors, &mut path)
            {
                let chain = cycle.iter().map(|kind| kind.name()).collect::<Vec<_>>().join(" → ");
                return Err(ManifestError::CircularDependency {
                    chain,
                });
            }
        }

        Ok(())
    }

    /// DFS visit for cycle detection.
    ///
    /// Returns `Some(cycle_path)` if a cycle is detected, None otherwise.
    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<AssetKind>,
    ) -> Option<Vec<AssetKind>> {
        colors.insert(node, Color::Gray);
        path.push(self.graph[node]);

        for neighbor in self.graph.neighbors(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    let target = self.graph[neighbor];
                    let cycle_start = path.iter().position(|n| *n == target).unwrap_or(0);
                    let mut cycle = path[cycle_start..].to_vec();
                    cycle.push(target);
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Get the computation order.
    ///
    /// Returns nodes in an order where all dependencies come before their
    /// dependents, or [`ManifestError::CircularDependency`] naming the full
    /// cycle when there is none.
    pub fn topological_order(&self) -> Result<Vec<AssetKind>, ManifestError> {
        match toposort(&self.graph, None) {
            // Reverse so dependencies come first
            Ok(indices) => Ok(indices.into_iter().rev().map(|idx| self.graph[idx]).collect()),
            Err(cycle) => {
                self.detect_cycles()?;
                Err(ManifestError::CircularDependency {
                    chain: self.graph[cycle.node_id()].name().to_string(),
                })
            }
        }
    }

    /// Get direct dependencies for a given node, in declaration order.
    pub fn get_direct_deps(&self, node: AssetKind) -> Vec<AssetKind> {
        if let Some(&node_idx) = self.node_map.get(&node) {
            // petgraph yields the most recently added edge first
            let mut deps: Vec<_> =
                self.graph.neighbors(node_idx).map(|idx| self.graph[idx]).collect();
            deps.reverse();
            deps
        } else {
            Vec::new()
        }
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the total number of edges (dependencies) in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Build a human-readable dependency tree rooted at `root`.
    ///
    /// Assets reached a second time are printed once more but not expanded.
    pub fn to_tree_string(&self, root: AssetKind) -> String {
        let mut result = String::new();
        let mut visited = HashSet::new();
        self.build_tree_string(root, &mut result, "", true, &mut visited);
        result
    }

    fn build_tree_string(
        &self,
        node: AssetKind,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<AssetKind>,
    ) {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        result.push_str(&format!("{}{}{}\n", prefix, connector, node.name()));

        if !visited.insert(node) {
            return;
        }

        let deps = self.get_direct_deps(node);
        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        for (i, dep) in deps.iter().enumerate() {
            let is_last_child = i == deps.len() - 1;
            self.build_tree_string(*dep, result, &child_prefix, is_last_child, visited);
        }
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
