//! Blocked-by queries
//!
//! A node is blocked by its direct dependencies that are not done yet.
//! Only one hop is considered.

use crate::domain::GraphModel;

/// Returns the direct, not-done dependencies of a node in declared order
///
/// Unknown nodes yield an empty list. Dependency ids that are not in the
/// graph never block.
pub fn blocked_by<'a>(graph: &'a GraphModel, id: &str) -> Vec<&'a str> {
    graph
        .dependencies(id)
        .into_iter()
        .filter(|dep| {
            graph
                .get(dep)
                .map(|node| !node.status.is_done())
                .unwrap_or(false)
        })
        .collect()
}

/// Returns true if the node has at least one not-done dependency
pub fn is_blocked(graph: &GraphModel, id: &str) -> bool {
    !blocked_by(graph, id).is_empty()
}
