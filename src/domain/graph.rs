//! Indexed dependency graph for one snapshot
//!
//! Builds the id lookup plus forward (`dependsOn`) and reverse
//! (`dependents`) adjacency. References to ids outside the snapshot and
//! self references are dropped: partial snapshots are expected, so a bad
//! edge means "no edge" rather than an error. Uses petgraph for cycle
//! detection.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

use super::node::Node;
use super::snapshot::Snapshot;

/// A validated, indexed view over a snapshot's nodes
#[derive(Debug, Default)]
pub struct GraphModel {
    /// Nodes in snapshot order
    nodes: Vec<Node>,

    /// Map from node id to position in `nodes`
    node_map: HashMap<String, usize>,

    /// Existing dependencies per node, declared order, deduplicated
    dependencies: Vec<Vec<usize>>,

    /// Existing dependents per node, declared order, deduplicated
    dependents: Vec<Vec<usize>>,

    /// Prerequisite edges: dependency -> dependent
    graph: DiGraph<usize, ()>,
}

impl GraphModel {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph for a snapshot
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::from_nodes(&snapshot.nodes)
    }

    /// Builds a graph from a collection of nodes
    ///
    /// A repeated id keeps its first occurrence.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut model = Self::new();

        // First pass: add all nodes
        for node in nodes {
            if model.node_map.contains_key(&node.id) {
                continue;
            }
            let idx = model.nodes.len();
            model.node_map.insert(node.id.clone(), idx);
            model.nodes.push(node.clone());
            model.graph.add_node(idx);
        }

        // Second pass: resolve edges against the id set
        let resolve = |own: usize, ids: &[String], node_map: &HashMap<String, usize>| {
            let mut seen = HashSet::new();
            ids.iter()
                .filter_map(|id| node_map.get(id).copied())
                .filter(|&idx| idx != own && seen.insert(idx))
                .collect::<Vec<_>>()
        };

        for (idx, node) in model.nodes.iter().enumerate() {
            let deps = resolve(idx, &node.depends_on, &model.node_map);
            for &dep in &deps {
                model
                    .graph
                    .add_edge(NodeIndex::new(dep), NodeIndex::new(idx), ());
            }
            model.dependencies.push(deps);
            model
                .dependents
                .push(resolve(idx, &node.dependents, &model.node_map));
        }

        model
    }

    /// Looks up a node by id
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.node_map.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Returns true if the graph contains the node
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Returns the number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns all nodes in snapshot order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns all node ids in snapshot order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Returns the existing direct dependencies of a node
    pub fn dependencies(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, &self.dependencies)
    }

    /// Returns the existing direct dependents of a node, as declared on it
    pub fn dependents(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, &self.dependents)
    }

    fn neighbors<'a>(&'a self, id: &str, adjacency: &'a [Vec<usize>]) -> Vec<&'a str> {
        match self.node_map.get(id) {
            Some(&idx) => adjacency[idx]
                .iter()
                .map(|&n| self.nodes[n].id.as_str())
                .collect(),
            None => vec![],
        }
    }

    /// Iterates over prerequisite edges as `(dependency, dependent)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dependencies.iter().enumerate().flat_map(move |(idx, deps)| {
            deps.iter()
                .map(move |&dep| (self.nodes[dep].id.as_str(), self.nodes[idx].id.as_str()))
        })
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.node_map.get(id).copied()
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn dependency_indices(&self, idx: usize) -> &[usize] {
        &self.dependencies[idx]
    }

    /// Finds dependency cycles
    ///
    /// Returns every strongly connected component with more than one
    /// member. Members are sorted by id and the list is sorted, so the
    /// result does not depend on snapshot order.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut ids: Vec<String> = component
                    .into_iter()
                    .filter_map(|ni| self.graph.node_weight(ni))
                    .map(|&idx| self.nodes[idx].id.clone())
                    .collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }
}
