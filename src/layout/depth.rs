//! Longest-prerequisite-chain depth
//!
//! `depth(n) = 0` when n has no existing dependency, otherwise
//! `1 + max(depth(d))` over its dependencies. Computed with a memoized
//! depth-first walk on an explicit stack. A dependency that is already on
//! the active chain counts as depth 0 for that branch only, so members of a
//! cycle get an approximate depth that depends on which member the walk
//! entered first. Walks start from nodes in ascending id order and follow
//! edges in declared order, which makes that approximation deterministic.

use std::collections::HashMap;

use crate::domain::GraphModel;

/// Depths for every node of one graph
///
/// Built from a single [`GraphModel`]; a new snapshot needs a new map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthMap {
    depths: Vec<usize>,
    by_id: HashMap<String, usize>,
    max_depth: usize,
}

struct Frame {
    idx: usize,
    next: usize,
    deepest: Option<usize>,
}

impl Frame {
    fn new(idx: usize) -> Self {
        Self {
            idx,
            next: 0,
            deepest: None,
        }
    }

    fn observe(&mut self, depth: usize) {
        self.deepest = Some(self.deepest.map_or(depth, |d| d.max(depth)));
    }
}

impl DepthMap {
    /// Resolves the depth of every node in the graph
    pub fn resolve(graph: &GraphModel) -> Self {
        let n = graph.len();
        let mut memo: Vec<Option<usize>> = vec![None; n];
        let mut on_stack = vec![false; n];

        let mut starts: Vec<usize> = (0..n).collect();
        starts.sort_by(|&a, &b| graph.node_at(a).id.cmp(&graph.node_at(b).id));

        let mut stack: Vec<Frame> = Vec::new();
        for start in starts {
            if memo[start].is_some() {
                continue;
            }
            on_stack[start] = true;
            stack.push(Frame::new(start));

            while let Some(frame) = stack.last_mut() {
                let deps = graph.dependency_indices(frame.idx);
                if frame.next < deps.len() {
                    let dep = deps[frame.next];
                    frame.next += 1;
                    if let Some(depth) = memo[dep] {
                        frame.observe(depth);
                    } else if on_stack[dep] {
                        // Back edge: re-entry counts as depth 0
                        frame.observe(0);
                    } else {
                        on_stack[dep] = true;
                        stack.push(Frame::new(dep));
                    }
                    continue;
                }

                let depth = frame.deepest.map_or(0, |d| d + 1);
                let idx = frame.idx;
                memo[idx] = Some(depth);
                on_stack[idx] = false;
                stack.pop();
                if let Some(parent) = stack.last_mut() {
                    parent.observe(depth);
                }
            }
        }

        let depths: Vec<usize> = memo.into_iter().map(|d| d.unwrap_or(0)).collect();
        let by_id = graph
            .nodes()
            .iter()
            .zip(&depths)
            .map(|(node, &depth)| (node.id.clone(), depth))
            .collect();
        let max_depth = depths.iter().copied().max().unwrap_or(0);

        Self {
            depths,
            by_id,
            max_depth,
        }
    }

    /// Returns the depth of a node, or `None` if it is not in the graph
    pub fn get(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn at(&self, idx: usize) -> usize {
        self.depths[idx]
    }

    /// Deepest depth in the graph (0 for an empty graph)
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}
