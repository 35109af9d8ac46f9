//! Query commands (focus, blocked)

use std::path::Path;

use anyhow::Result;

use super::graph_cmd::load_snapshot;
use super::output::Output;
use crate::domain::GraphModel;
use crate::query::{blocked_by, FocusView};

/// Show what focusing a node highlights
pub fn focus(output: &Output, path: &Path, id: &str) -> Result<()> {
    let snapshot = load_snapshot(output, path)?;
    let graph = GraphModel::from_snapshot(&snapshot);

    if !graph.contains(id) {
        output.warn(&format!("Node not found: {}", id));
    }

    let view = FocusView::resolve(&graph, Some(id));
    let dimmed = view.dimmed_nodes(&graph);
    output.verbose_ctx(
        "focus",
        &format!(
            "{} dependencies, {} dependents, {} dimmed",
            view.dependencies.len(),
            view.dependents.len(),
            dimmed.len()
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "focusId": view.focus,
            "highlightedDependencyIds": view.dependencies,
            "highlightedDependentIds": view.dependents,
            "dimmedNodeIds": dimmed,
        }));
    } else if view.has_focus() {
        println!("Focus: {}", id);
        println!("Depends on ({}):", view.dependencies.len());
        print_nodes(&graph, &view.dependencies);
        println!("Dependents ({}):", view.dependents.len());
        print_nodes(&graph, &view.dependents);
        println!("Dimmed: {}", dimmed.len());
    } else {
        println!("Nothing to highlight.");
    }

    Ok(())
}

/// Show the direct, not-done prerequisites of a node
pub fn blocked(output: &Output, path: &Path, id: &str) -> Result<()> {
    let snapshot = load_snapshot(output, path)?;
    let graph = GraphModel::from_snapshot(&snapshot);

    if !graph.contains(id) {
        output.warn(&format!("Node not found: {}", id));
    }

    let blockers: Vec<String> = blocked_by(&graph, id)
        .into_iter()
        .map(str::to_string)
        .collect();
    output.verbose_ctx("blocked", &format!("Found {} blockers", blockers.len()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "blockedByIds": blockers,
        }));
    } else if blockers.is_empty() {
        println!("{} is not blocked.", id);
    } else {
        println!("{} is blocked by ({}):", id, blockers.len());
        print_nodes(&graph, &blockers);
    }

    Ok(())
}

fn print_nodes(graph: &GraphModel, ids: &[String]) {
    for id in ids {
        if let Some(node) = graph.get(id) {
            println!(
                "  {} {:<20} {:<30} {}",
                node.status.indicator(),
                id,
                node.title,
                node.status
            );
        }
    }
}
